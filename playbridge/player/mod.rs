pub mod gst_logic;
pub mod headless;
pub mod playlist;

use crate::config::{Backend, Config};
use crate::error::{App, Player};
use gst_logic::GstElement;
use headless::HeadlessElement;
use log::{error, info, warn};
use playlist::Playlist;

pub const NO_TRANSCRIPTION: &str = "No transcription available";
pub const DEFAULT_SEEK_STEP: f64 = 10.0;

// Shaped after an HTML audio element: a paused flag, a source, a position in seconds
pub trait MediaElement: Send {
    fn is_paused(&self) -> bool;

    fn play(&mut self) -> Result<(), Player>;

    fn pause(&mut self) -> Result<(), Player>;

    // Leaves the element paused at the start of the new source
    fn set_source(&mut self, source: &str) -> Result<(), Player>;

    fn current_time(&self) -> f64;

    // Returns the position actually applied after clamping
    fn set_current_time(&mut self, seconds: f64) -> Result<f64, Player>;
}

pub struct PlayerState {
    element: Option<Box<dyn MediaElement>>,
    playlist: Playlist,
    seek_step: f64,
    transcription: Option<String>,
}

impl PlayerState {
    #[must_use]
    pub fn new(playlist: Playlist) -> Self {
        Self {
            element: None,
            playlist,
            seek_step: DEFAULT_SEEK_STEP,
            transcription: None,
        }
    }

    // Cues the current track, paused
    #[must_use]
    pub fn with_element(mut self, element: Box<dyn MediaElement>) -> Self {
        self.element = Some(element);
        if !self.playlist.is_empty() {
            if let Err(e) = self.cue_current_track() {
                error!("Failed to load the first track: {e}");
            }
        }
        self
    }

    #[must_use]
    pub fn with_seek_step(mut self, seek_step: f64) -> Self {
        self.seek_step = seek_step;
        self
    }

    pub fn set_transcription(&mut self, text: impl Into<String>) {
        self.transcription = Some(text.into());
    }

    #[must_use]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    fn element(&mut self) -> Result<&mut Box<dyn MediaElement>, Player> {
        self.element.as_mut().ok_or(Player::NoElement)
    }

    pub fn toggle_play_pause(&mut self) -> Result<bool, Player> {
        let element = self.element()?;
        if element.is_paused() {
            element.play()?;
        } else {
            element.pause()?;
        }
        Ok(!element.is_paused())
    }

    pub fn next_track(&mut self) -> Result<String, Player> {
        self.element()?;
        let previous_index = self.playlist.current_index();
        self.playlist.move_to_next_track()?;
        self.play_current_track(previous_index)
    }

    pub fn previous_track(&mut self) -> Result<String, Player> {
        self.element()?;
        let previous_index = self.playlist.current_index();
        self.playlist.move_to_previous_track()?;
        self.play_current_track(previous_index)
    }

    fn cue_current_track(&mut self) -> Result<String, Player> {
        let track = self.playlist.get_current_track()?.to_string();
        self.element()?.set_source(&track)?;
        Ok(track)
    }

    // The index only stays moved once the element has accepted the new source
    fn play_current_track(&mut self, previous_index: usize) -> Result<String, Player> {
        let track = self.playlist.get_current_track()?.to_string();
        let element = self.element.as_mut().ok_or(Player::NoElement)?;
        if let Err(e) = element.set_source(&track) {
            self.playlist.set_current_track_index(previous_index)?;
            return Err(e);
        }
        element.play()?;
        info!("Now playing {track}");
        Ok(track)
    }

    pub fn seek_by(&mut self, steps: f64) -> Result<f64, Player> {
        let delta = steps * self.seek_step;
        let element = self.element()?;
        let target = (element.current_time() + delta).max(0.0);
        element.set_current_time(target)
    }

    #[must_use]
    pub fn transcription(&self) -> &str {
        match self.transcription.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_TRANSCRIPTION,
        }
    }
}

pub async fn build_player_state(config: &Config) -> PlayerState {
    if config.tracks.is_empty() {
        warn!("Track list is empty");
    }
    let playlist = Playlist::new(config.tracks.clone());
    let mut state = PlayerState::new(playlist).with_seek_step(config.seek_step);

    match create_element(config.backend) {
        Ok(element) => state = state.with_element(element),
        Err(e) => error!("No player element available, commands will fail: {}", e),
    }

    if let Some(path) = &config.transcription_file {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => state.set_transcription(text),
            Err(e) => warn!("Failed to read transcription {}: {}", path.display(), e),
        }
    }
    state
}

fn create_element(backend: Backend) -> Result<Box<dyn MediaElement>, App> {
    match backend {
        Backend::Gstreamer => {
            let element = GstElement::new()?;
            element.listen_to_bus()?;
            Ok(Box::new(element))
        }
        Backend::Headless => {
            info!("Using headless player element");
            Ok(Box::new(HeadlessElement::default()))
        }
    }
}
