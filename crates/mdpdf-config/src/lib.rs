pub mod config;
pub mod error;
mod parse;
pub mod renderer;
pub mod server;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
