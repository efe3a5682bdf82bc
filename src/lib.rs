//! Chess rules with hit points: a capture only lands once the target's health runs out.

pub mod autoplay;
pub mod board;
pub mod combat;
pub mod console;
pub mod events;
pub mod game;
pub mod move_validator;
pub mod piece;
pub mod selection;

pub use board::{Board, BoardError, Square};
pub use events::GameEventSink;
pub use game::{ClickOutcome, Game, GameState};
pub use piece::{Color, Piece, PieceKind};
