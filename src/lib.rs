pub mod backend;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod keygen;
pub mod reply;
pub mod server;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

/// Version reported by the `version` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
