//! Pairing and room bookkeeping for the relay.
//!
//! The queue holds at most one waiting client. The next client to join is
//! paired with it immediately; the one that waited plays White.

use engine::Color;
use std::collections::HashMap;

pub type ClientId = String;

/// Result of a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Nobody was waiting, the client now is.
    Waiting,
    /// Two clients were put into a new room.
    Paired(Pairing),
    /// The client already plays in this room; the request is dropped.
    AlreadySeated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub room_id: String,
    pub white: ClientId,
    pub black: ClientId,
}

impl Pairing {
    /// The color and opponent for each of the two members.
    pub fn assignments(&self) -> [(ClientId, Color, ClientId); 2] {
        [
            (self.white.clone(), Color::White, self.black.clone()),
            (self.black.clone(), Color::Black, self.white.clone()),
        ]
    }
}

#[derive(Debug, Default)]
pub struct Lobby {
    waiting: Option<ClientId>,
    rooms: HashMap<String, [ClientId; 2]>,
    room_of: HashMap<ClientId, String>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting(&self) -> Option<&str> {
        self.waiting.as_deref()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Queues `client` or pairs it with the client already waiting.
    /// A client that is already waiting stays queued instead of meeting itself,
    /// and a client seated in a room cannot join a second one.
    pub fn join(&mut self, client: &str) -> JoinOutcome {
        if let Some(room_id) = self.room_of.get(client) {
            return JoinOutcome::AlreadySeated(room_id.clone());
        }
        match self.waiting.take() {
            Some(waiting) if waiting != client => {
                let room_id = format!("{}#{}", waiting, client);
                let pairing = Pairing {
                    room_id: room_id.clone(),
                    white: waiting.clone(),
                    black: client.to_string(),
                };
                self.room_of.insert(waiting.clone(), room_id.clone());
                self.room_of.insert(client.to_string(), room_id.clone());
                self.rooms.insert(room_id, [waiting, client.to_string()]);
                JoinOutcome::Paired(pairing)
            }
            _ => {
                self.waiting = Some(client.to_string());
                JoinOutcome::Waiting
            }
        }
    }

    /// Members of `room_id` other than `sender`. Senders are trusted: the
    /// room is not required to contain them.
    pub fn recipients(&self, sender: &str, room_id: &str) -> Vec<ClientId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().filter(|m| *m != sender).cloned().collect())
            .unwrap_or_default()
    }

    /// Forgets `client`. Returns the room partner that is left behind, if any.
    pub fn leave(&mut self, client: &str) -> Option<ClientId> {
        if self.waiting.as_deref() == Some(client) {
            self.waiting = None;
        }
        let room_id = self.room_of.remove(client)?;
        let members = self.rooms.remove(&room_id)?;
        let partner = members.into_iter().find(|m| m != client)?;
        self.room_of.remove(&partner);
        Some(partner)
    }
}
