use log::{debug, error};

use crate::{
    board::{Board, Square},
    piece::Piece,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The defender survived with this much health. Neither piece moved.
    Wounded { remaining_health: u8 },
    /// Finishing blow: the defender is gone and the attacker now stands on its cell.
    Defeated { defender: Piece },
}

/// Deals one point of damage from the piece on `attacker` to the enemy piece on `defender`.
///
/// Only a finishing blow moves anything: the defender is removed and the attacker takes its cell.
/// Otherwise the board keeps both pieces where they were and only the defender's health changes.
/// Both cells must hold pieces of opposite colors, which the move validator guarantees.
pub fn resolve_capture(board: &mut Board, attacker: Square, defender: Square) -> CaptureOutcome {
    let attacker_color = match board.get(attacker) {
        Some(piece) => piece.color,
        None => {
            error!("resolve_capture: no attacking piece on {:?}. {:#?}", attacker, board);
            panic!("resolve_capture called without an attacking piece");
        }
    };

    let target = match board.get_mut(defender) {
        Some(piece) if piece.color != attacker_color => piece,
        _ => {
            error!("resolve_capture: no enemy piece on {:?}. {:#?}", defender, board);
            panic!("resolve_capture called without an enemy defender");
        }
    };

    let remaining_health = target.take_hit();
    if remaining_health > 0 {
        debug!("{} on {} hit, {remaining_health} health left", target.kind, defender);
        return CaptureOutcome::Wounded { remaining_health };
    }

    let defeated = *target;
    board.clear(defender);
    board.move_piece(attacker, defender);
    debug!("{} {} on {} defeated", defeated.color, defeated.kind, defender);

    CaptureOutcome::Defeated { defender: defeated }
}
