pub mod background;
pub mod browser;
pub mod content;
pub mod pattern;

use serde::{Deserialize, Serialize};
use url::Url;

pub use background::Background;
pub use content::ContentScript;
pub use pattern::UrlPattern;

pub const DEFAULT_TAB_PATTERNS: [&str; 2] = ["file:///*", "http://localhost:3000/*"];
pub const EXTENSION_COMMAND_EVENT: &str = "extensionCommand";

pub type TabId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDetail {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEvent {
    pub name: String,
    pub detail: CommandDetail,
}

impl PageEvent {
    #[must_use]
    pub fn extension_command(command: String) -> Self {
        Self {
            name: EXTENSION_COMMAND_EVENT.to_string(),
            detail: CommandDetail { command },
        }
    }
}

pub trait TabSource {
    // Tabs matching any of `patterns`, in tab order
    fn query(&self, patterns: &[UrlPattern]) -> Vec<Tab>;
}

// Fire and forget, delivery failures are not reported
pub trait TabMessenger {
    fn send_message(&self, tab_id: TabId, message: RelayMessage);
}
