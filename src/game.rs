use array_macro::array;
use log::{debug, info};

use crate::{
    board::{BOARD_SIZE, Board, BoardError, Square},
    combat::{CaptureOutcome, resolve_capture},
    events::GameEventSink,
    move_validator::{Destinations, legal_destinations},
    piece::{Color, HealthBand, PieceKind},
    selection::{SelectionController, SelectionStep},
};

/// Whose turn it is. White always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnManager {
    white_turn: bool,
}

impl TurnManager {
    pub fn new() -> TurnManager {
        TurnManager { white_turn: true }
    }

    pub fn starting_with(color: Color) -> TurnManager {
        TurnManager {
            white_turn: color == Color::White,
        }
    }

    pub fn is_white_turn(&self) -> bool {
        self.white_turn
    }

    pub fn active_color(&self) -> Color {
        if self.white_turn { Color::White } else { Color::Black }
    }

    pub fn advance(&mut self) {
        self.white_turn = !self.white_turn;
    }
}

impl Default for TurnManager {
    fn default() -> Self {
        TurnManager::new()
    }
}

/// Returns the winner once a king is missing from the board.
///
/// White's king is looked for first, so a board without either king reports black as the winner.
pub fn check_game_over(board: &Board) -> Option<Color> {
    if !board.has_king(Color::White) {
        Some(Color::Black)
    } else if !board.has_king(Color::Black) {
        Some(Color::White)
    } else {
        None
    }
}

/// Everything a game session owns.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub turn: TurnManager,
    pub selection: SelectionController,
    pub winner: Option<Color>,
}

impl GameState {
    pub fn new() -> GameState {
        GameState::from_board(Board::starting_position(), Color::White)
    }

    pub fn from_board(board: Board, active_color: Color) -> GameState {
        GameState {
            board,
            turn: TurnManager::starting_with(active_color),
            selection: SelectionController::new(),
            winner: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

/// Result of a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    pub mover: PieceKind,
    /// Set when the move landed on an enemy piece.
    pub capture: Option<CaptureOutcome>,
    pub winner: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing changed: out of range, empty or enemy cell while idle, or the game is already over.
    Ignored,
    Selected(Square),
    Deselected(Square),
    Committed(MoveReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceView {
    pub kind: PieceKind,
    pub color: Color,
    pub current_health: u8,
    pub max_health: u8,
    pub health_band: HealthBand,
}

/// Read-only copy of the board for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub cells: [[Option<PieceView>; BOARD_SIZE]; BOARD_SIZE],
}

impl BoardView {
    pub fn get(&self, square: Square) -> Option<&PieceView> {
        self.cells[square.row() as usize][square.col() as usize].as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Move,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub square: Square,
    pub kind: HighlightKind,
}

/// The rule engine. Feed it cell clicks; it notifies `sink` about hits and the end of the game.
pub struct Game<S: GameEventSink> {
    state: GameState,
    sink: S,
}

impl<S: GameEventSink> Game<S> {
    pub fn new(sink: S) -> Game<S> {
        Game {
            state: GameState::new(),
            sink,
        }
    }

    pub fn from_state(state: GameState, sink: S) -> Game<S> {
        Game { state, sink }
    }

    pub fn reset(&mut self) {
        info!("resetting to the starting position");
        self.state = GameState::new();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn active_color(&self) -> Color {
        self.state.turn.active_color()
    }

    pub fn selected_cell(&self) -> Option<Square> {
        self.state.selection.selected()
    }

    pub fn winner(&self) -> Option<Color> {
        self.state.winner
    }

    pub fn is_over(&self) -> bool {
        self.state.winner.is_some()
    }

    /// Entry point for the input layer. Coordinates off the board are ignored.
    pub fn handle_cell_click(&mut self, row: i32, col: i32) -> ClickOutcome {
        match Square::new(row, col) {
            Ok(square) => self.click(square),
            Err(BoardError::OutOfRange { row, col }) => {
                debug!("ignoring click outside the board at ({row}, {col})");
                ClickOutcome::Ignored
            }
            Err(e) => {
                debug!("ignoring click: {e}");
                ClickOutcome::Ignored
            }
        }
    }

    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if self.is_over() {
            debug!("game is over, ignoring click on {}", square);
            return ClickOutcome::Ignored;
        }

        let active_color = self.active_color();
        match self.state.selection.on_click(&self.state.board, square, active_color) {
            SelectionStep::Ignore => ClickOutcome::Ignored,
            SelectionStep::Select(square) => ClickOutcome::Selected(square),
            SelectionStep::Deselect(square) => ClickOutcome::Deselected(square),
            SelectionStep::Commit { from, to } => ClickOutcome::Committed(self.commit_move(from, to)),
        }
    }

    fn commit_move(&mut self, from: Square, to: Square) -> MoveReport {
        let board = &mut self.state.board;
        let mover = board.get(from).map(|p| p.kind).unwrap_or_default();

        let capture = if board.is_empty(to) {
            board.move_piece(from, to);
            debug!("{} {} moved {} -> {}", self.state.turn.active_color(), mover, from, to);
            None
        } else {
            let outcome = resolve_capture(board, from, to);
            let remaining_health = match outcome {
                CaptureOutcome::Wounded { remaining_health } => remaining_health,
                CaptureOutcome::Defeated { .. } => 0,
            };
            self.sink.on_combat_hit(to, remaining_health);
            Some(outcome)
        };

        self.state.turn.advance();

        let winner = check_game_over(&self.state.board);
        if let Some(color) = winner {
            info!("{color} wins, the opposing king fell on {to}");
            self.state.winner = Some(color);
            self.sink.on_game_over(color);
        }

        MoveReport {
            from,
            to,
            mover,
            capture,
            winner,
        }
    }

    pub fn legal_destinations(&self, from: Square) -> Destinations {
        if self.is_over() {
            return Destinations::new();
        }

        legal_destinations(&self.state.board, from, self.active_color())
    }

    /// Legal destinations of the current selection, split into quiet moves and attacks.
    pub fn highlights(&self) -> Vec<Highlight> {
        let Some(from) = self.selected_cell() else {
            return Vec::new();
        };

        self.legal_destinations(from)
            .iter()
            .map(|&square| Highlight {
                square,
                kind: if self.state.board.is_empty(square) {
                    HighlightKind::Move
                } else {
                    HighlightKind::Capture
                },
            })
            .collect()
    }

    pub fn current_board_view(&self) -> BoardView {
        let board = &self.state.board;
        BoardView {
            cells: array![r => array![c => {
                board.get(Square::new(r as i32, c as i32).unwrap_or_default()).map(|piece| PieceView {
                    kind: piece.kind,
                    color: piece.color,
                    current_health: piece.current_health,
                    max_health: piece.max_health,
                    health_band: piece.health_band(),
                })
            }; BOARD_SIZE]; BOARD_SIZE],
        }
    }
}
