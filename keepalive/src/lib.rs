pub mod config;
pub mod pinger;

pub use config::{Environment, KeepAliveConfig};
pub use pinger::{KeepAlive, PING_INTERVAL};
