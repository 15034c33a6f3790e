use crate::error::Player;
use crate::player::PlayerState;
use crate::protocol::{Command, Details, Response};
use log::{info, warn};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task;

pub type Handler = fn(&mut PlayerState) -> Result<Details, Player>;

#[derive(Debug)]
pub struct Job {
    pub command: Option<Value>,
    pub reply: oneshot::Sender<Response>,
}

pub struct Dispatcher {
    handlers: HashMap<&'static str, Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let handlers = Command::ALL
            .into_iter()
            .map(|command| (command.name(), handler_for(command)))
            .collect();
        Self { handlers }
    }

    pub fn dispatch(&self, state: &mut PlayerState, command: Option<Value>) -> Response {
        let handler = command
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|name| self.handlers.get(name));
        let Some(handler) = handler else {
            warn!("Unknown command {command:?}");
            return Response::unknown(command);
        };
        match handler(state) {
            Ok(details) => Response::succeeded(command, details),
            Err(e) => {
                warn!("Command {command:?} failed: {e}");
                Response::failed(command, e.to_string())
            }
        }
    }
}

fn handler_for(command: Command) -> Handler {
    match command {
        Command::PlayPause => play_pause,
        Command::Next => next,
        Command::Previous => previous,
        Command::Forward => forward,
        Command::Backward => backward,
        Command::GetTranscription => get_transcription,
    }
}

fn play_pause(state: &mut PlayerState) -> Result<Details, Player> {
    let is_playing = state.toggle_play_pause()?;
    info!("{}", if is_playing { "Resume playback" } else { "Pause" });
    Ok(Details::Playback { is_playing })
}

fn next(state: &mut PlayerState) -> Result<Details, Player> {
    info!("Play next track");
    let current_file = state.next_track()?;
    Ok(Details::Track { current_file })
}

fn previous(state: &mut PlayerState) -> Result<Details, Player> {
    info!("Play previous track");
    let current_file = state.previous_track()?;
    Ok(Details::Track { current_file })
}

fn forward(state: &mut PlayerState) -> Result<Details, Player> {
    let current_time = state.seek_by(1.0)?;
    info!("Seek forward to {current_time:.1}s");
    Ok(Details::Position { current_time })
}

fn backward(state: &mut PlayerState) -> Result<Details, Player> {
    let current_time = state.seek_by(-1.0)?;
    info!("Seek backward to {current_time:.1}s");
    Ok(Details::Position { current_time })
}

#[allow(clippy::unnecessary_wraps)]
fn get_transcription(state: &mut PlayerState) -> Result<Details, Player> {
    Ok(Details::Transcription {
        transcription: state.transcription().to_string(),
    })
}

pub fn spawn_player_task(mut state: PlayerState, capacity: usize) -> mpsc::Sender<Job> {
    let (job_sender, mut job_receiver) = mpsc::channel::<Job>(capacity);
    task::spawn(async move {
        let dispatcher = Dispatcher::new();
        while let Some(job) = job_receiver.recv().await {
            let response = dispatcher.dispatch(&mut state, job.command);
            if job.reply.send(response).is_err() {
                warn!("Connection closed before its response was ready");
            }
        }
        info!("Player task stopped");
    });
    job_sender
}

/// Queue a command on the player task and wait for its response.
pub async fn submit(jobs: &mpsc::Sender<Job>, command: Option<Value>) -> Response {
    let (reply, response) = oneshot::channel();
    let job = Job {
        command: command.clone(),
        reply,
    };
    if jobs.send(job).await.is_err() {
        return Response::failed(command, Player::NotRunning.to_string());
    }
    response
        .await
        .unwrap_or_else(|_| Response::failed(command, Player::NotRunning.to_string()))
}
