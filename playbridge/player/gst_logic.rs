use super::MediaElement;
use crate::error::{App, Player};
use futures_util::stream::StreamExt;
use gstreamer::prelude::*;
use gstreamer::{ClockTime, Element, MessageView, SeekFlags, State};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task;
use url::Url;

// `paused` flips as soon as a state change is accepted. `ended` is set from
// the bus task when the stream stops on its own.
#[derive(Debug)]
pub struct GstElement {
    playbin: Element,
    paused: bool,
    ended: Arc<AtomicBool>,
}

impl GstElement {
    pub fn new() -> Result<Self, App> {
        gstreamer::init()?;
        let playbin = gstreamer::ElementFactory::make("playbin")
            .name("player")
            .build()?;
        info!("GStreamer created successfully.");
        Ok(Self {
            playbin,
            paused: true,
            ended: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn listen_to_bus(&self) -> Result<(), App> {
        let bus = self
            .playbin
            .bus()
            .ok_or_else(|| App::Element("Failed to get GStreamer bus".to_string()))?;

        let ended = Arc::clone(&self.ended);
        task::spawn(bus.stream().for_each(move |msg| {
            apply_bus_message(&msg, &ended);
            futures_util::future::ready(())
        }));
        Ok(())
    }
}

fn apply_bus_message(msg: &gstreamer::Message, ended: &AtomicBool) {
    match msg.view() {
        MessageView::Eos(_) => {
            info!("Track finished playing.");
            ended.store(true, Ordering::SeqCst);
        }
        MessageView::Error(err) => {
            error!(
                "Error from GStreamer pipeline: {} ({:?})",
                err.error(),
                err.debug()
            );
            ended.store(true, Ordering::SeqCst);
        }
        _ => (),
    }
}

impl Drop for GstElement {
    fn drop(&mut self) {
        if let Err(e) = self.playbin.set_state(State::Null) {
            error!("Failed to stop pipeline: {}", e);
        }
    }
}

// URIs pass through, anything else is a local path
pub fn track_uri(track: &str) -> Result<String, Player> {
    if let Ok(url) = Url::parse(track) {
        if url.scheme().len() > 1 {
            return Ok(url.to_string());
        }
    }
    let path = std::path::absolute(track)
        .map_err(|e| Player::Backend(format!("Invalid track location {track}: {e}")))?;
    Url::from_file_path(&path)
        .map(|url| url.to_string())
        .map_err(|()| Player::Backend(format!("Invalid track location {track}")))
}

#[allow(clippy::cast_precision_loss)]
fn to_seconds(time: ClockTime) -> f64 {
    time.mseconds() as f64 / 1000.0
}

impl MediaElement for GstElement {
    fn is_paused(&self) -> bool {
        self.paused || self.ended.load(Ordering::SeqCst)
    }

    fn play(&mut self) -> Result<(), Player> {
        // Playing an ended track starts it over
        if self.ended.swap(false, Ordering::SeqCst) {
            self.playbin
                .seek_simple(SeekFlags::FLUSH | SeekFlags::KEY_UNIT, ClockTime::ZERO)?;
        }
        self.playbin.set_state(State::Playing)?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Player> {
        self.playbin.set_state(State::Paused)?;
        self.paused = true;
        Ok(())
    }

    fn set_source(&mut self, source: &str) -> Result<(), Player> {
        let uri = track_uri(source)?;
        self.playbin.set_state(State::Null)?;
        self.playbin.set_property("uri", uri.as_str());
        self.playbin.set_state(State::Paused)?;
        self.paused = true;
        self.ended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.playbin
            .query_position::<ClockTime>()
            .map_or(0.0, to_seconds)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_current_time(&mut self, seconds: f64) -> Result<f64, Player> {
        let mut target = seconds.max(0.0);
        if let Some(duration) = self.playbin.query_duration::<ClockTime>() {
            target = target.min(to_seconds(duration));
        }
        let position = ClockTime::from_mseconds((target * 1000.0) as u64);
        self.playbin
            .seek_simple(SeekFlags::FLUSH | SeekFlags::KEY_UNIT, position)?;
        Ok(target)
    }
}
