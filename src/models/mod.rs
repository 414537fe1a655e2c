pub mod chat;
pub mod event;

pub use chat::{ApiKey, AssistantReply, ChatMessage, ChatRequest, UpstreamResponse};
pub use event::InboundEvent;
