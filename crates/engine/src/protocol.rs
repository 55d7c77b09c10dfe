//! Messages exchanged with the relay server.
//!
//! Every message is one line of JSON tagged by `"event"`. The relay treats
//! move payloads as opaque JSON and forwards them untouched; only the
//! clients interpret them as a [`WireMove`].

use crate::board::Square;
use crate::constants::Color;
use crate::error::{ProtocolError, ProtocolResult};
use crate::r#move::Move;
use crate::session::{Session, Transition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Client → server messages.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Enter the matchmaking queue.
    JoinRequest,
    /// A move to forward to the other member of `room_id`.
    MoveMade {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "move")]
        payload: Value,
    },
}

/// Server → client messages.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// No opponent was queued; wait for the next joiner.
    Waiting,
    /// Sent to both players once paired.
    GameStart {
        color: Color,
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "opponentId")]
        opponent_id: String,
    },
    /// A move played by the other room member, as they sent it.
    OpponentMove {
        #[serde(rename = "move")]
        payload: Value,
    },
    /// The other room member disconnected.
    OpponentLeft,
}

/// The move payload clients put on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireMove {
    pub from_row: i32,
    pub from_col: i32,
    pub to_row: i32,
    pub to_col: i32,
}

impl WireMove {
    /// Origin and destination, if both lie on the board.
    pub fn squares(&self) -> Option<(Square, Square)> {
        Some((
            Square::checked(self.from_row, self.from_col)?,
            Square::checked(self.to_row, self.to_col)?,
        ))
    }

    pub fn to_payload(&self) -> Value {
        // A struct of four integers always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_payload(payload: &Value) -> ProtocolResult<Self> {
        serde_json::from_value(payload.clone()).map_err(|e| ProtocolError::InvalidMove {
            reason: e.to_string(),
        })
    }
}

impl From<Move> for WireMove {
    fn from(mv: Move) -> Self {
        Self {
            from_row: mv.from.row as i32,
            from_col: mv.from.col as i32,
            to_row: mv.to.row as i32,
            to_col: mv.to.col as i32,
        }
    }
}

impl ClientMessage {
    pub fn to_line(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Builds the message announcing a locally played move.
    pub fn move_made(room_id: &str, mv: Move) -> Self {
        ClientMessage::MoveMade {
            room_id: room_id.to_string(),
            payload: WireMove::from(mv).to_payload(),
        }
    }
}

impl ServerMessage {
    pub fn to_line(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

/// The effect of a server message on the local session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Still queued for an opponent.
    Waiting,
    /// A new game started; the session was replaced.
    Started { color: Color, room_id: String },
    /// The opponent's move was applied.
    Applied(Transition),
    /// The opponent's move could not be applied and was dropped.
    Rejected,
    /// The opponent left; the session is no longer active.
    OpponentLeft,
}

/// Maps one incoming relay message onto the session.
pub fn dispatch(session: &mut Session, msg: ServerMessage) -> Dispatch {
    match msg {
        ServerMessage::Waiting => Dispatch::Waiting,
        ServerMessage::GameStart {
            color,
            room_id,
            opponent_id,
        } => {
            info!("game started in room {} against {}, playing {}", room_id, opponent_id, color);
            *session = Session::online(color, room_id.clone());
            Dispatch::Started { color, room_id }
        }
        ServerMessage::OpponentMove { payload } => {
            let applied = WireMove::from_payload(&payload)
                .ok()
                .and_then(|wire| session.apply_remote(wire));
            match applied {
                Some(transition) => Dispatch::Applied(transition),
                None => {
                    warn!("dropping opponent move {}", payload);
                    Dispatch::Rejected
                }
            }
        }
        ServerMessage::OpponentLeft => {
            session.deactivate();
            Dispatch::OpponentLeft
        }
    }
}
