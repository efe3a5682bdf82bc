use log::info;

use crate::{board::Square, piece::Color};

/// Receives the notifications a presentation layer reacts to: haptics on hits, audio and UI on game over.
pub trait GameEventSink {
    fn on_combat_hit(&mut self, square: Square, remaining_health: u8);

    fn on_game_over(&mut self, winner: Color);
}

#[derive(Debug, Default)]
pub struct NoopEventSink;

impl GameEventSink for NoopEventSink {
    fn on_combat_hit(&mut self, _square: Square, _remaining_health: u8) {}

    fn on_game_over(&mut self, _winner: Color) {}
}

/// Sends every event to the log.
#[derive(Debug, Default)]
pub struct LoggingEventSink;

impl GameEventSink for LoggingEventSink {
    fn on_combat_hit(&mut self, square: Square, remaining_health: u8) {
        info!("hit on {square}, {remaining_health} health left");
    }

    fn on_game_over(&mut self, winner: Color) {
        info!("game over, {winner} wins");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CombatHit { square: Square, remaining_health: u8 },
    GameOver { winner: Color },
}

/// Keeps every event in order. Used by self-play statistics and tests.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    pub events: Vec<GameEvent>,
}

impl RecordingEventSink {
    pub fn game_over_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    pub fn hit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::CombatHit { .. }))
            .count()
    }
}

impl GameEventSink for RecordingEventSink {
    fn on_combat_hit(&mut self, square: Square, remaining_health: u8) {
        self.events.push(GameEvent::CombatHit {
            square,
            remaining_health,
        });
    }

    fn on_game_over(&mut self, winner: Color) {
        self.events.push(GameEvent::GameOver { winner });
    }
}
