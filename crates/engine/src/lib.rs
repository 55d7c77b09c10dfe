pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod move_gen;
pub mod movelist;
pub mod r#move;
pub mod protocol;
pub mod session;

pub use board::{Board, Square};
pub use config::{Config, Difficulty};
pub use constants::{Cell, Color};
pub use engine::Engine;
pub use r#move::{Move, MoveKind};
pub use session::{GameMode, Outcome, Phase, Session, Transition, TurnResult};
