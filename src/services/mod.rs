pub mod chat;
pub mod credentials;

pub use chat::ChatHandler;
pub use credentials::{StoreCredentialResolver, decode_secret};
