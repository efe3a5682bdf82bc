use log::trace;
use tinyvec::ArrayVec;

use crate::{
    board::{Board, Square},
    piece::{Color, Piece, PieceKind},
};

/// A queen in the middle of an empty board reaches 27 squares, nothing reaches more.
pub const MAX_DESTINATIONS: usize = 32;

pub type Destinations = ArrayVec<[Square; MAX_DESTINATIONS]>;

/// Decides whether the piece on `from` may go to `to` on `active_color`'s turn.
///
/// Landing on an enemy piece counts as legal; what happens to the two pieces afterwards is up to
/// [crate::combat::resolve_capture]. Nothing here looks at check, so a king may step next to an attacker.
pub fn is_legal(board: &Board, from: Square, to: Square, active_color: Color) -> bool {
    if from == to {
        return false;
    }

    let piece = match board.get(from) {
        Some(p) => p,
        None => return false,
    };

    if piece.color != active_color {
        return false;
    }

    let target = board.get(to);
    if target.is_some_and(|t| t.color == piece.color) {
        return false;
    }

    let d_row = to.row() as i8 - from.row() as i8;
    let d_col = to.col() as i8 - from.col() as i8;

    let legal = match piece.kind {
        PieceKind::Pawn => is_legal_pawn_move(board, piece, from, d_row, d_col, target),
        PieceKind::Rook => (d_row == 0 || d_col == 0) && is_path_clear(board, from, to),
        PieceKind::Knight => {
            (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
        }
        PieceKind::Bishop => d_row.abs() == d_col.abs() && is_path_clear(board, from, to),
        PieceKind::Queen => {
            (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs()) && is_path_clear(board, from, to)
        }
        PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
    };

    trace!("{} {:?} -> {:?} legal: {legal}", piece.kind, from, to);

    legal
}

fn is_legal_pawn_move(board: &Board, pawn: &Piece, from: Square, d_row: i8, d_col: i8, target: Option<&Piece>) -> bool {
    let dir = pawn.color.pawn_direction();

    if d_col == 0 && target.is_none() {
        if d_row == dir {
            return true;
        }

        if d_row == 2 * dir && from.row() == pawn.color.pawn_home_row() {
            return from.offset(dir, 0).is_some_and(|intermediate| board.is_empty(intermediate));
        }

        return false;
    }

    // Diagonal steps are only ever captures. Same-color targets were rejected by the caller.
    d_col.abs() == 1 && d_row == dir && target.is_some()
}

/// True if every cell strictly between `from` and `to` is empty.
///
/// Only meaningful when the two squares share a row, a column or a diagonal. Callers check the geometry first.
pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let d_row = (to.row() as i8 - from.row() as i8).signum();
    let d_col = (to.col() as i8 - from.col() as i8).signum();
    debug_assert!(
        from.row() == to.row()
            || from.col() == to.col()
            || (to.row() as i8 - from.row() as i8).abs() == (to.col() as i8 - from.col() as i8).abs(),
        "is_path_clear called for {:?} -> {:?} which is not a straight line",
        from,
        to
    );

    let mut current = from;
    loop {
        current = match current.offset(d_row, d_col) {
            Some(next) => next,
            None => return true,
        };

        if current == to {
            return true;
        }

        if !board.is_empty(current) {
            return false;
        }
    }
}

/// Every square the piece on `from` could legally go to, in row-major order.
pub fn legal_destinations(board: &Board, from: Square, active_color: Color) -> Destinations {
    let mut destinations = Destinations::new();
    for to in Square::all() {
        if is_legal(board, from, to, active_color) {
            destinations.push(to);
        }
    }

    destinations
}

#[cfg(test)]
mod move_validator_tests {
    use crate::board::STARTING_PLACEMENT;

    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn legal(placement: &str, from: &str, to: &str, color: Color) -> bool {
        let board = Board::from_placement(placement).unwrap();
        is_legal(&board, sq(from), sq(to), color)
    }

    macro_rules! legality_test {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (placement, from, to, color, expected) = $value;
                    assert_eq!(expected, legal(placement, from, to, color));
                }
            )*
        }
    }

    legality_test! {
        pawn_single_step: (STARTING_PLACEMENT, "e2", "e3", Color::White, true),
        pawn_double_step_from_home: (STARTING_PLACEMENT, "e2", "e4", Color::White, true),
        black_pawn_double_step_from_home: (STARTING_PLACEMENT, "d7", "d5", Color::Black, true),
        pawn_triple_step: (STARTING_PLACEMENT, "e2", "e5", Color::White, false),
        pawn_backwards: ("4k3/8/8/8/4P3/8/8/4K3", "e4", "e3", Color::White, false),
        pawn_sideways: ("4k3/8/8/8/4P3/8/8/4K3", "e4", "d4", Color::White, false),
        pawn_double_step_off_home_row: ("4k3/8/8/8/8/4P3/8/4K3", "e3", "e5", Color::White, false),
        pawn_double_step_blocked_intermediate: ("4k3/8/8/8/8/4n3/4P3/4K3", "e2", "e4", Color::White, false),
        pawn_double_step_blocked_destination: ("4k3/8/8/8/4n3/8/4P3/4K3", "e2", "e4", Color::White, false),
        pawn_single_step_blocked_by_enemy: ("4k3/8/8/8/8/4n3/4P3/4K3", "e2", "e3", Color::White, false),
        pawn_diagonal_capture: ("4k3/8/8/8/8/3n4/4P3/4K3", "e2", "d3", Color::White, true),
        pawn_diagonal_without_target: (STARTING_PLACEMENT, "e2", "d3", Color::White, false),
        pawn_diagonal_onto_own_piece: ("4k3/8/8/8/8/3N4/4P3/4K3", "e2", "d3", Color::White, false),
        black_pawn_diagonal_capture: ("4k3/8/8/3p4/4P3/8/8/4K3", "d5", "e4", Color::Black, true),
        white_pawn_captures_toward_black: ("4k3/8/8/3p4/2P5/8/8/4K3", "c4", "d5", Color::White, true),
        rook_open_file: ("4k3/8/8/8/8/8/8/R3K3", "a1", "a8", Color::White, true),
        rook_blocked: ("4k3/8/8/8/p7/8/8/R3K3", "a1", "a8", Color::White, false),
        rook_captures_first_blocker: ("4k3/8/8/8/p7/8/8/R3K3", "a1", "a4", Color::White, true),
        rook_diagonal: ("4k3/8/8/8/8/8/8/R3K3", "a1", "b2", Color::White, false),
        rook_blocked_by_own_queen: ("4k3/8/8/8/8/8/8/R2Q2K1", "a1", "e1", Color::White, false),
        knight_jumps_over_pieces: (STARTING_PLACEMENT, "g1", "f3", Color::White, true),
        knight_wide_l: ("4k3/8/8/8/8/8/8/1N2K3", "b1", "d2", Color::White, true),
        knight_straight: ("4k3/8/8/8/8/8/8/1N2K3", "b1", "b3", Color::White, false),
        bishop_diagonal: ("4k3/8/8/8/8/8/8/2B1K3", "c1", "h6", Color::White, true),
        bishop_blocked: ("4k3/8/8/8/8/8/3p4/2B1K3", "c1", "h6", Color::White, false),
        bishop_straight: ("4k3/8/8/8/8/8/8/2B1K3", "c1", "c5", Color::White, false),
        queen_straight: ("4k3/8/8/8/8/8/8/3QK3", "d1", "d8", Color::White, true),
        queen_diagonal: ("4k3/8/8/8/8/8/8/3QK3", "d1", "h5", Color::White, true),
        queen_knight_shape: ("4k3/8/8/8/8/8/8/3QK3", "d1", "e3", Color::White, false),
        queen_blocked_diagonal: ("4k3/8/8/8/8/8/4P3/3QK3", "d1", "h5", Color::White, false),
        king_step: ("4k3/8/8/8/8/8/8/4K3", "e1", "f2", Color::White, true),
        king_two_steps: ("4k3/8/8/8/8/8/8/4K3", "e1", "e3", Color::White, false),
        king_steps_next_to_attacker: ("4k3/8/8/8/8/8/3r4/4K3", "e1", "e2", Color::White, true),
        king_attacks_adjacent_enemy: ("4k3/8/8/8/8/8/3r4/4K3", "e1", "d2", Color::White, true),
        wrong_color_to_move: (STARTING_PLACEMENT, "e7", "e5", Color::White, false),
        empty_origin: (STARTING_PLACEMENT, "e4", "e5", Color::White, false),
        zero_move: (STARTING_PLACEMENT, "e2", "e2", Color::White, false),
    }

    #[test]
    pub fn never_lands_on_own_piece() {
        let board = Board::from_placement("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR").unwrap();
        for (from, piece) in board.pieces() {
            for to in Square::all() {
                if board.get(to).is_some_and(|t| t.color == piece.color) {
                    assert!(!is_legal(&board, from, to, piece.color), "{:?} -> {:?}", from, to);
                }
            }
        }
    }

    #[test]
    pub fn sliding_pieces_never_pass_a_blocker() {
        let board = Board::from_placement("4k3/8/8/2p1p3/2pQp3/2p1p3/8/4K3").unwrap();
        let queen = sq("d4");
        let destinations = legal_destinations(&board, queen, Color::White);

        assert!(destinations.contains(&sq("e4")));
        assert!(destinations.contains(&sq("c5")));
        assert!(!destinations.contains(&sq("f4")));
        assert!(!destinations.contains(&sq("b6")));
        assert!(!destinations.contains(&sq("a1")));
        assert!(destinations.contains(&sq("d8")));
        assert!(destinations.contains(&sq("d1")));
    }

    #[test]
    pub fn path_clear_excludes_endpoints() {
        let board = Board::from_placement("r3k3/8/8/8/8/8/8/R3K3").unwrap();
        assert!(is_path_clear(&board, sq("a1"), sq("a8")));
        assert!(is_path_clear(&board, sq("a1"), sq("a2")));
        assert!(!is_path_clear(&board, sq("a1"), sq("f1")));
        assert!(is_path_clear(&board, sq("h8"), sq("a1")));
    }

    #[test]
    pub fn starting_position_destination_counts() {
        let board = Board::starting_position();
        assert_eq!(2, legal_destinations(&board, sq("e2"), Color::White).len());
        assert_eq!(2, legal_destinations(&board, sq("b1"), Color::White).len());
        assert_eq!(0, legal_destinations(&board, sq("a1"), Color::White).len());
        assert_eq!(0, legal_destinations(&board, sq("d1"), Color::White).len());
        assert_eq!(0, legal_destinations(&board, sq("e7"), Color::White).len());
        assert_eq!(2, legal_destinations(&board, sq("e7"), Color::Black).len());
    }

    #[test]
    pub fn lone_queen_reaches_27_squares() {
        let board = Board::from_placement("7k/8/8/8/3Q4/8/8/K7").unwrap();
        // a1 and h8 hold the kings; the queen sees h8 as a capture and a1 is its own king
        assert_eq!(26, legal_destinations(&board, sq("d4"), Color::White).len());
    }
}
