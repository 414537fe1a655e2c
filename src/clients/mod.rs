pub mod openai;
pub mod secrets;

pub use openai::OpenAiUpstream;
pub use secrets::SecretsManagerStore;
