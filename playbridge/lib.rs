pub mod config;
pub mod dispatch;
pub mod error;
pub mod player;
pub mod protocol;
pub mod relay;
pub mod server;
