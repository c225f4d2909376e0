pub mod config;
pub mod documentation;

pub use config::{ApiKey, AppConfig};
pub use documentation::ApiDocumentation;
