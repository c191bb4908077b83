pub mod config;
pub mod logger;
pub mod network;

pub use config::EnvLoader;
pub use config::*;
pub use logger::*;
pub use network::*;
