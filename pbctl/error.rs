use std::io::Error as IoError;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

#[derive(Error, Debug)]
pub enum App {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
    #[error("I/O operation failed")]
    Io(#[from] IoError),
    #[error("Data parsing error: {0}")]
    DataParsing(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No response to {0} within {1} seconds")]
    Timeout(String, u64),
    #[error("playbridge closed the connection")]
    Closed,
    #[error("{0} failed: {1}")]
    CommandFailed(String, String),
}
