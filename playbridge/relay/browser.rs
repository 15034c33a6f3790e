use super::{ContentScript, PageEvent, RelayMessage, Tab, TabId, TabMessenger, TabSource, UrlPattern};
use crate::error::Relay;
use log::debug;
use tokio::sync::broadcast;
use url::Url;

// Open tabs, each with its own content script
#[derive(Debug, Default)]
pub struct InProcessBrowser {
    tabs: Vec<(Tab, ContentScript)>,
    next_id: TabId,
}

impl InProcessBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tab(&mut self, url: &str) -> Result<TabId, Relay> {
        let url = Url::parse(url).map_err(|e| Relay::InvalidUrl(url.to_string(), e.to_string()))?;
        self.next_id += 1;
        let id = self.next_id;
        self.tabs.push((Tab { id, url }, ContentScript::new()));
        Ok(id)
    }

    pub fn close_tab(&mut self, id: TabId) {
        self.tabs.retain(|(tab, _)| tab.id != id);
    }

    #[must_use]
    pub fn subscribe(&self, id: TabId) -> Option<broadcast::Receiver<PageEvent>> {
        self.tabs
            .iter()
            .find(|(tab, _)| tab.id == id)
            .map(|(_, content)| content.subscribe())
    }
}

impl TabSource for InProcessBrowser {
    fn query(&self, patterns: &[UrlPattern]) -> Vec<Tab> {
        self.tabs
            .iter()
            .map(|(tab, _)| tab)
            .filter(|tab| patterns.iter().any(|pattern| pattern.matches(&tab.url)))
            .cloned()
            .collect()
    }
}

impl TabMessenger for InProcessBrowser {
    fn send_message(&self, tab_id: TabId, message: RelayMessage) {
        match self.tabs.iter().find(|(tab, _)| tab.id == tab_id) {
            Some((_, content)) => content.on_message(message),
            None => debug!("Tab {tab_id} is gone, message dropped"),
        }
    }
}
