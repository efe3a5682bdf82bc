use std::time::Instant;

use log::{debug, info, warn};
use num_format::{Locale, ToFormattedString};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    board::Square,
    combat::CaptureOutcome,
    events::NoopEventSink,
    game::{ClickOutcome, Game},
    piece::Color,
};

pub const DEFAULT_SEED: u64 = 0x88d885d4bb51ffc2;
pub const DEFAULT_MAX_PLIES: u32 = 2000;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AutoplayStats {
    pub games: u64,
    pub plies: u64,
    pub hits: u64,
    pub defeats: u64,
    pub white_wins: u64,
    pub black_wins: u64,
    /// Stopped at the ply cap or because the side to move had nothing legal.
    pub unfinished: u64,
}

impl AutoplayStats {
    pub fn summary(&self) -> String {
        format!(
            "games {} plies {} hits {} defeats {} white wins {} black wins {} unfinished {}",
            self.games.to_formatted_string(&Locale::en),
            self.plies.to_formatted_string(&Locale::en),
            self.hits.to_formatted_string(&Locale::en),
            self.defeats.to_formatted_string(&Locale::en),
            self.white_wins.to_formatted_string(&Locale::en),
            self.black_wins.to_formatted_string(&Locale::en),
            self.unfinished.to_formatted_string(&Locale::en),
        )
    }
}

/// Plays `games` games of random legal moves through the click interface.
pub fn run(games: u64, seed: u64, max_plies: u32) -> AutoplayStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = AutoplayStats::default();

    let start_time = Instant::now();
    for game_index in 0..games {
        play_one(&mut rng, max_plies, &mut stats);
        debug!("finished autoplay game {}", game_index + 1);
    }
    let elapsed = start_time.elapsed();

    info!("autoplay in {elapsed:#?}. {}", stats.summary());

    stats
}

fn play_one(rng: &mut StdRng, max_plies: u32, stats: &mut AutoplayStats) {
    let mut game = Game::new(NoopEventSink);
    stats.games += 1;

    for _ in 0..max_plies {
        let movable: Vec<Square> = game
            .board()
            .pieces()
            .filter(|(_, piece)| piece.color == game.active_color())
            .map(|(square, _)| square)
            .filter(|&square| !game.legal_destinations(square).is_empty())
            .collect();

        let Some(&from) = movable.choose(rng) else {
            warn!("{} has no legal move, stopping the game", game.active_color());
            stats.unfinished += 1;
            return;
        };
        let destinations = game.legal_destinations(from);
        let Some(&to) = destinations.choose(rng) else {
            stats.unfinished += 1;
            return;
        };

        game.click(from);
        let ClickOutcome::Committed(report) = game.click(to) else {
            warn!("autoplay move {} -> {} was not committed", from, to);
            stats.unfinished += 1;
            return;
        };

        stats.plies += 1;
        match report.capture {
            Some(CaptureOutcome::Wounded { .. }) => stats.hits += 1,
            Some(CaptureOutcome::Defeated { .. }) => {
                stats.hits += 1;
                stats.defeats += 1;
            }
            None => {}
        }

        match report.winner {
            Some(Color::White) => {
                stats.white_wins += 1;
                return;
            }
            Some(Color::Black) => {
                stats.black_wins += 1;
                return;
            }
            None => {}
        }
    }

    stats.unfinished += 1;
}
