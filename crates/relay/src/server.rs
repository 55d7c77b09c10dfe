//! The TCP side of the relay: one task per connection, one line per message.

use crate::lobby::{ClientId, JoinOutcome, Lobby};
use engine::protocol::{ClientMessage, ServerMessage};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Shared relay state: the lobby plus an outbox per connected client.
#[derive(Default)]
pub struct Relay {
    inner: Mutex<RelayState>,
}

#[derive(Default)]
struct RelayState {
    lobby: Lobby,
    clients: HashMap<ClientId, Outbox>,
}

impl RelayState {
    fn send(&self, client: &str, msg: ServerMessage) {
        match self.clients.get(client) {
            Some(outbox) => {
                if outbox.send(msg).is_err() {
                    debug!("client {} is already gone", client);
                }
            }
            None => debug!("no outbox for client {}", client),
        }
    }
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    async fn connect(&self, id: &str, outbox: Outbox) {
        self.inner.lock().await.clients.insert(id.to_string(), outbox);
    }

    async fn handle(&self, id: &str, msg: ClientMessage) {
        let mut state = self.inner.lock().await;
        match msg {
            ClientMessage::JoinRequest => match state.lobby.join(id) {
                JoinOutcome::Waiting => {
                    info!("client {} waiting for an opponent", id);
                    state.send(id, ServerMessage::Waiting);
                }
                JoinOutcome::AlreadySeated(room_id) => {
                    warn!("client {} is already playing in room {}, join ignored", id, room_id);
                }
                JoinOutcome::Paired(pairing) => {
                    info!("game started in room {}", pairing.room_id);
                    for (client, color, opponent) in pairing.assignments() {
                        state.send(
                            &client,
                            ServerMessage::GameStart {
                                color,
                                room_id: pairing.room_id.clone(),
                                opponent_id: opponent,
                            },
                        );
                    }
                }
            },
            ClientMessage::MoveMade { room_id, payload } => {
                for peer in state.lobby.recipients(id, &room_id) {
                    state.send(
                        &peer,
                        ServerMessage::OpponentMove {
                            payload: payload.clone(),
                        },
                    );
                }
            }
        }
    }

    async fn disconnect(&self, id: &str) {
        let mut state = self.inner.lock().await;
        state.clients.remove(id);
        if let Some(partner) = state.lobby.leave(id) {
            info!("client {} left, notifying {}", id, partner);
            state.send(&partner, ServerMessage::OpponentLeft);
        }
    }
}

/// Accepts connections forever, serving each on its own task.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let relay = Arc::new(Relay::new());
    loop {
        let (stream, addr) = listener.accept().await?;
        let relay = Arc::clone(&relay);
        tokio::spawn(async move {
            handle_connection(relay, stream, addr).await;
        });
    }
}

async fn handle_connection(relay: Arc<Relay>, stream: TcpStream, addr: SocketAddr) {
    let id = Uuid::new_v4().to_string();
    info!("client {} connected from {}", id, addr);

    let (reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    relay.connect(&id, tx).await;

    let writer_id = id.clone();
    let writer_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let line = match msg.to_line() {
                Ok(line) => line,
                Err(e) => {
                    warn!("could not encode message for {}: {}", writer_id, e);
                    continue;
                }
            };
            if let Err(e) = writer.write_all(format!("{}\n", line).as_bytes()).await {
                debug!("write to {} failed: {}", writer_id, e);
                break;
            }
        }
    });

    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match ClientMessage::from_line(&line) {
                Ok(msg) => relay.handle(&id, msg).await,
                Err(e) => warn!("ignoring line from {}: {}", id, e),
            },
            Ok(None) => break,
            Err(e) => {
                debug!("read from {} failed: {}", id, e);
                break;
            }
        }
    }

    info!("client {} disconnected", id);
    relay.disconnect(&id).await;
    writer_task.abort();
}
