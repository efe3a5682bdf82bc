use log::{debug, error};

use crate::{
    board::{Board, Square},
    move_validator::is_legal,
    piece::Color,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(Square),
}

/// What a click asks the game to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStep {
    /// Click while idle on an empty cell or an enemy piece.
    Ignore,
    Select(Square),
    /// Legal target: the move must be carried out and the turn handed over.
    Commit { from: Square, to: Square },
    /// Any target that is not legal, including the selected piece itself.
    Deselect(Square),
}

/// Two-phase click handling: first pick one of your pieces, then pick where it goes.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> SelectionController {
        SelectionController::default()
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn selected(&self) -> Option<Square> {
        match self.state {
            Selection::Idle => None,
            Selection::Selected(square) => Some(square),
        }
    }

    pub fn clear(&mut self) {
        self.state = Selection::Idle;
    }

    pub fn on_click(&mut self, board: &Board, clicked: Square, active_color: Color) -> SelectionStep {
        match self.state {
            Selection::Idle => match board.get(clicked) {
                Some(piece) if piece.color == active_color => {
                    debug!("selected {} {} on {}", piece.color, piece.kind, clicked);
                    self.state = Selection::Selected(clicked);
                    SelectionStep::Select(clicked)
                }
                _ => SelectionStep::Ignore,
            },
            Selection::Selected(from) => {
                self.state = Selection::Idle;

                if !board.get(from).is_some_and(|p| p.color == active_color) {
                    error!("selection {:?} does not hold a {active_color} piece. {:#?}", from, board);
                    debug_assert!(false, "selection points at a cell without an active piece");
                    return SelectionStep::Deselect(from);
                }

                if is_legal(board, from, clicked, active_color) {
                    SelectionStep::Commit { from, to: clicked }
                } else {
                    debug!("{} is not a legal target for {}, deselecting", clicked, from);
                    SelectionStep::Deselect(from)
                }
            }
        }
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    pub fn idle_ignores_empty_and_enemy_cells() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        assert_eq!(SelectionStep::Ignore, controller.on_click(&board, sq("e4"), Color::White));
        assert_eq!(SelectionStep::Ignore, controller.on_click(&board, sq("e7"), Color::White));
        assert_eq!(Selection::Idle, controller.state());
    }

    #[test]
    pub fn selecting_own_piece() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        assert_eq!(SelectionStep::Select(sq("e7")), controller.on_click(&board, sq("e7"), Color::Black));
        assert_eq!(Some(sq("e7")), controller.selected());
    }

    #[test]
    pub fn legal_target_commits() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        controller.on_click(&board, sq("g1"), Color::White);
        assert_eq!(
            SelectionStep::Commit {
                from: sq("g1"),
                to: sq("f3")
            },
            controller.on_click(&board, sq("f3"), Color::White)
        );
        assert_eq!(Selection::Idle, controller.state());
    }

    #[test]
    pub fn reclicking_selected_piece_deselects() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        controller.on_click(&board, sq("e2"), Color::White);
        assert_eq!(SelectionStep::Deselect(sq("e2")), controller.on_click(&board, sq("e2"), Color::White));
        assert_eq!(None, controller.selected());
    }

    #[test]
    pub fn clicking_another_own_piece_deselects_instead_of_switching() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        controller.on_click(&board, sq("e2"), Color::White);
        assert_eq!(SelectionStep::Deselect(sq("e2")), controller.on_click(&board, sq("d2"), Color::White));
        assert_eq!(Selection::Idle, controller.state());
    }

    #[test]
    pub fn illegal_target_deselects() {
        let board = Board::starting_position();
        let mut controller = SelectionController::new();

        controller.on_click(&board, sq("a1"), Color::White);
        assert_eq!(SelectionStep::Deselect(sq("a1")), controller.on_click(&board, sq("a5"), Color::White));
    }
}
