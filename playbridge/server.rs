use crate::dispatch::{self, Job};
use crate::error::App;
use crate::protocol::{Inbound, MessageType, Outbound};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio::task;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub struct Server {
    listener: TcpListener,
    jobs: mpsc::Sender<Job>,
}

impl Server {
    pub async fn bind(address: &str, jobs: mpsc::Sender<Job>) -> Result<Self, App> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self { listener, jobs })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, App> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self, mut stop_receiver: watch::Receiver<()>) -> Result<(), App> {
        info!("Control channel listening on ws://{}", self.local_addr()?);
        loop {
            tokio::select! {
                _ = stop_receiver.changed() => {
                    info!("Stop signal received, shutting down control channel...");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let jobs = self.jobs.clone();
                        task::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, jobs).await {
                                error!("Connection {} failed: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => error!("Accept error: {}", e),
                }
            }
        }
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    jobs: mpsc::Sender<Job>,
) -> Result<(), App> {
    let ws_stream = accept_async(stream).await?;
    info!("Native app connected via WebSocket from {}", peer);

    let (mut sink, mut source) = ws_stream.split();
    let mut result = Ok(());
    while let Some(message) = source.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    error!("WebSocket message error from {}: {}", peer, e);
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                result = Err(e.into());
                break;
            }
        };
        if let Some(reply) = handle_message(&text, &jobs).await {
            if let Err(e) = sink.send(Message::Text(reply)).await {
                result = Err(e.into());
                break;
            }
        }
    }

    info!("Native app {} disconnected from WebSocket", peer);
    result
}

// `None` when nothing should be sent back
pub async fn handle_message(text: &str, jobs: &mpsc::Sender<Job>) -> Option<String> {
    let inbound: Inbound = match serde_json::from_str(text) {
        Ok(inbound) => inbound,
        Err(e) => {
            error!("WebSocket message error: {}", e);
            return None;
        }
    };
    debug!("Received from native app: {:?}", inbound);

    let outbound = match inbound.kind {
        MessageType::Heartbeat => Outbound::heartbeat(),
        MessageType::Command => Outbound::Response(dispatch::submit(jobs, inbound.command).await),
        MessageType::Other => {
            debug!("Ignoring message without a known type");
            return None;
        }
    };

    match serde_json::to_string(&outbound) {
        Ok(reply) => Some(reply),
        Err(e) => {
            warn!("Failed to encode reply: {}", e);
            None
        }
    }
}
