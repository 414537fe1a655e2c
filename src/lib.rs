pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod traits;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::ChatHandler;
