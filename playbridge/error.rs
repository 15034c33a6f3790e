use flexi_logger::FlexiLoggerError;
use glib::BoolError;
use std::io;
use thiserror::Error;
use tokio::task::JoinError;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug, Clone)]
pub enum App {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Environment variable error: {0}")]
    EnvVar(String),

    #[error("TOML parsing error: {0}")]
    TomlParsing(String),

    #[error("Logger initialization error: {0}")]
    Logger(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Join task error: {0}")]
    JoinTask(String),

    #[error("GStreamer initialization error: {0}")]
    Init(String),

    #[error("GStreamer element error: {0}")]
    Element(String),
}

impl From<io::Error> for App {
    fn from(error: io::Error) -> Self {
        App::Io(error.to_string())
    }
}

impl From<std::env::VarError> for App {
    fn from(error: std::env::VarError) -> Self {
        App::EnvVar(error.to_string())
    }
}

impl From<toml::de::Error> for App {
    fn from(error: toml::de::Error) -> Self {
        App::TomlParsing(error.to_string())
    }
}

impl From<FlexiLoggerError> for App {
    fn from(error: FlexiLoggerError) -> Self {
        App::Logger(error.to_string())
    }
}

impl From<tungstenite::Error> for App {
    fn from(error: tungstenite::Error) -> Self {
        App::WebSocket(error.to_string())
    }
}

impl From<JoinError> for App {
    fn from(error: JoinError) -> Self {
        App::JoinTask(error.to_string())
    }
}

impl From<glib::Error> for App {
    fn from(error: glib::Error) -> Self {
        App::Init(error.to_string())
    }
}

impl From<BoolError> for App {
    fn from(error: BoolError) -> Self {
        App::Element(error.to_string())
    }
}

// Reported in-band as `success: false`, never returned from the server
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Player {
    #[error("Player element not found")]
    NoElement,

    #[error("Track list is empty")]
    EmptyPlaylist,

    #[error("Player is not running")]
    NotRunning,

    #[error("Playback error: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    #[error("Invalid URL pattern {0:?}: {1}")]
    InvalidPattern(String, &'static str),

    #[error("Invalid tab URL {0:?}: {1}")]
    InvalidUrl(String, String),
}

impl From<BoolError> for Player {
    fn from(error: BoolError) -> Self {
        Player::Backend(error.to_string())
    }
}

impl From<gstreamer::StateChangeError> for Player {
    fn from(error: gstreamer::StateChangeError) -> Self {
        Player::Backend(error.to_string())
    }
}
