use crate::broadcast::{BroadcastService, Subscription};
use crate::state::Snapshot;
use crate::subscription::protocol::LiveDataMessage;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Manages a single WebSocket connection as a broadcast subscriber
pub struct ConnectionManager {
    service: Arc<BroadcastService>,

    /// Upper bound on one socket write
    send_timeout: Duration,
}

impl ConnectionManager {
    pub fn new(service: Arc<BroadcastService>, send_timeout: Duration) -> Self {
        Self {
            service,
            send_timeout,
        }
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Registers on entry, forwards every queued snapshot, and deregisters
    /// on close, socket error, failed write or when the service drops us.
    pub async fn handle(self, mut socket: WebSocket) {
        let Subscription { id, mut rx } = self.service.connect();
        info!(subscriber_id = %id, "WebSocket connection established");

        loop {
            tokio::select! {
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            info!(subscriber_id = %id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = self.send(&mut socket, Message::Pong(data)).await {
                                warn!(subscriber_id = %id, error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Viewers have nothing to say; ignore text, binary, pong
                        }
                        Some(Err(e)) => {
                            warn!(subscriber_id = %id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                next = rx.recv() => {
                    match next {
                        Some(snapshot) => {
                            if let Err(e) = self.send_snapshot(&mut socket, &snapshot).await {
                                warn!(subscriber_id = %id, error = %e, "Failed to send snapshot");
                                break;
                            }
                        }
                        None => {
                            warn!(subscriber_id = %id, "Dropped by broadcast service");
                            break;
                        }
                    }
                }
            }
        }

        self.service.on_disconnect(&id);
        info!(subscriber_id = %id, "WebSocket connection closed");
    }

    /// Send one snapshot as a `liveData` text frame
    async fn send_snapshot(&self, socket: &mut WebSocket, snapshot: &Snapshot) -> anyhow::Result<()> {
        let json = match serde_json::to_string(&LiveDataMessage::from(snapshot)) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize snapshot");
                return Err(e.into());
            }
        };
        self.send(socket, Message::Text(json)).await
    }

    async fn send(&self, socket: &mut WebSocket, msg: Message) -> anyhow::Result<()> {
        match timeout(self.send_timeout, socket.send(msg)).await {
            Ok(result) => Ok(result?),
            Err(_) => anyhow::bail!("send timed out after {} ms", self.send_timeout.as_millis()),
        }
    }
}
