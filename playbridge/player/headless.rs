use super::MediaElement;
use crate::error::Player;
use log::debug;

#[derive(Debug, Clone)]
pub struct HeadlessElement {
    source: Option<String>,
    paused: bool,
    position: f64,
}

impl Default for HeadlessElement {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            position: 0.0,
        }
    }
}

impl HeadlessElement {
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl MediaElement for HeadlessElement {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<(), Player> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Player> {
        self.paused = true;
        Ok(())
    }

    fn set_source(&mut self, source: &str) -> Result<(), Player> {
        debug!("Headless source set to {source}");
        self.source = Some(source.to_string());
        self.paused = true;
        self.position = 0.0;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<f64, Player> {
        self.position = seconds.max(0.0);
        Ok(self.position)
    }
}
