use super::{RelayMessage, TabId, TabMessenger, TabSource, UrlPattern, DEFAULT_TAB_PATTERNS};
use crate::error::Relay;
use log::info;

pub struct Background<B> {
    browser: B,
    patterns: Vec<UrlPattern>,
}

impl<B> Background<B>
where
    B: TabSource + TabMessenger,
{
    pub fn new(browser: B) -> Result<Self, Relay> {
        let patterns = DEFAULT_TAB_PATTERNS
            .iter()
            .map(|pattern| UrlPattern::parse(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_patterns(browser, patterns))
    }

    pub fn with_patterns(browser: B, patterns: Vec<UrlPattern>) -> Self {
        Self { browser, patterns }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    // `None` when no tab matched and the command was dropped
    pub fn on_command(&self, command: &str) -> Option<TabId> {
        let tabs = self.browser.query(&self.patterns);
        let Some(tab) = tabs.first() else {
            info!("No matching tab open");
            return None;
        };
        info!("Relaying {command} to tab {}", tab.id);
        self.browser.send_message(
            tab.id,
            RelayMessage {
                command: command.to_string(),
            },
        );
        Some(tab.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::Tab;
    use std::cell::RefCell;
    use url::Url;

    #[derive(Default)]
    struct MockBrowser {
        tabs: Vec<Tab>,
        sent: RefCell<Vec<(TabId, RelayMessage)>>,
    }

    impl MockBrowser {
        fn with_tabs(urls: &[&str]) -> Self {
            let tabs = urls
                .iter()
                .zip(1..)
                .map(|(url, id)| Tab {
                    id,
                    url: Url::parse(url).unwrap(),
                })
                .collect();
            Self {
                tabs,
                sent: RefCell::default(),
            }
        }
    }

    impl TabSource for MockBrowser {
        fn query(&self, patterns: &[UrlPattern]) -> Vec<Tab> {
            self.tabs
                .iter()
                .filter(|tab| patterns.iter().any(|p| p.matches(&tab.url)))
                .cloned()
                .collect()
        }
    }

    impl TabMessenger for MockBrowser {
        fn send_message(&self, tab_id: TabId, message: RelayMessage) {
            self.sent.borrow_mut().push((tab_id, message));
        }
    }

    #[test]
    fn no_matching_tab_sends_nothing() {
        let background =
            Background::new(MockBrowser::with_tabs(&["https://example.com/"])).unwrap();
        assert_eq!(background.on_command("play_pause"), None);
        assert!(background.browser().sent.borrow().is_empty());
    }

    #[test]
    fn no_tabs_at_all_sends_nothing() {
        let background = Background::new(MockBrowser::default()).unwrap();
        assert_eq!(background.on_command("next"), None);
        assert!(background.browser().sent.borrow().is_empty());
    }

    #[test]
    fn only_the_first_match_receives_the_command() {
        let background = Background::new(MockBrowser::with_tabs(&[
            "https://example.com/",
            "http://localhost:3000/player",
            "file:///home/me/test.html",
        ]))
        .unwrap();
        assert_eq!(background.on_command("next"), Some(2));
        let sent = background.browser().sent.borrow();
        assert_eq!(
            *sent,
            vec![(
                2,
                RelayMessage {
                    command: "next".into()
                }
            )]
        );
    }

    #[test]
    fn custom_patterns_replace_the_defaults() {
        let patterns = vec![UrlPattern::parse("https://example.com/*").unwrap()];
        let background = Background::with_patterns(
            MockBrowser::with_tabs(&["http://localhost:3000/", "https://example.com/a"]),
            patterns,
        );
        assert_eq!(background.on_command("forward"), Some(2));
    }
}
