use std::fmt::{Debug, Display};

use array_macro::array;
use thiserror::Error;

use crate::piece::{Color, Piece, PieceKind};

pub const BOARD_SIZE: usize = 8;

pub static STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

static BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the 8x8 board")]
    OutOfRange { row: i32, col: i32 },
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),
}

/// A cell on the board. Row 0 is black's back rank, row 7 is white's.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: i32, col: i32) -> Result<Square, BoardError> {
        if !(0..BOARD_SIZE as i32).contains(&row) || !(0..BOARD_SIZE as i32).contains(&col) {
            return Err(BoardError::OutOfRange { row, col });
        }

        Ok(Square {
            row: row as u8,
            col: col as u8,
        })
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// The square `d_row`, `d_col` away, if it is still on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        Square::new(self.row as i32 + d_row as i32, self.col as i32 + d_col as i32).ok()
    }

    /// All 64 squares, row by row starting at row 0.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Square { row, col }))
    }

    /// Parses a square like `e2`. File a is column 0, rank 1 is row 7.
    pub fn from_algebraic(s: &str) -> Result<Square, BoardError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !(b'1'..=b'8').contains(&bytes[1]) {
            return Err(BoardError::InvalidPlacement(format!("'{s}' is not a square name")));
        }

        Ok(Square {
            row: b'8' - bytes[1],
            col: bytes[0] - b'a',
        })
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, BOARD_SIZE as u8 - self.row)
    }
}

impl Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self, self.row, self.col)
    }
}

/// Storage only. Legality and combat are decided before anything here is called.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        board.squares[0] = array![c => Some(Piece::new(BACK_RANK[c], Color::Black)); BOARD_SIZE];
        board.squares[1] = [Some(Piece::new(PieceKind::Pawn, Color::Black)); BOARD_SIZE];
        board.squares[6] = [Some(Piece::new(PieceKind::Pawn, Color::White)); BOARD_SIZE];
        board.squares[7] = array![c => Some(Piece::new(BACK_RANK[c], Color::White)); BOARD_SIZE];
        board
    }

    /// Builds a board from the piece placement field of a FEN string, e.g.
    /// `4k3/8/8/8/8/8/8/4K3`. The first rank listed is row 0. Every piece starts at full health.
    pub fn from_placement(placement: &str) -> Result<Board, BoardError> {
        if !placement.is_ascii() {
            return Err(BoardError::InvalidPlacement(String::from(
                "Expected placement to only contain ASCII characters",
            )));
        }

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE {
            return Err(BoardError::InvalidPlacement(format!(
                "Expected 8 '/'-delimited ranks but there were {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col: usize = 0;
            for c in rank.chars() {
                match c {
                    '1'..='8' => {
                        col += c as usize - '0' as usize;
                    }
                    _ => {
                        let (kind, color) = PieceKind::from_letter(c).ok_or_else(|| {
                            BoardError::InvalidPlacement(format!(
                                "Encountered unexpected character {c} in rank {}",
                                row + 1
                            ))
                        })?;
                        if col >= BOARD_SIZE {
                            return Err(BoardError::InvalidPlacement(format!(
                                "Rank {} '{rank}' has more than 8 cells",
                                row + 1
                            )));
                        }
                        board.squares[row][col] = Some(Piece::new(kind, color));
                        col += 1;
                    }
                }
            }

            if col != BOARD_SIZE {
                return Err(BoardError::InvalidPlacement(format!(
                    "Rank {} '{rank}' describes {col} cells instead of 8",
                    row + 1
                )));
            }
        }

        Ok(board)
    }

    /// Bounds-checked lookup for raw coordinates coming from an input layer.
    pub fn piece_at(&self, row: i32, col: i32) -> Result<Option<&Piece>, BoardError> {
        let square = Square::new(row, col)?;
        Ok(self.get(square))
    }

    pub fn get(&self, square: Square) -> Option<&Piece> {
        self.squares[square.row as usize][square.col as usize].as_ref()
    }

    pub fn get_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares[square.row as usize][square.col as usize].as_mut()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    pub fn place(&mut self, square: Square, piece: Piece) {
        self.squares[square.row as usize][square.col as usize] = Some(piece);
    }

    /// Empties the cell and hands back whatever was on it.
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize].take()
    }

    /// Relocates the piece on `from` to `to`, overwriting anything on `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.clear(from) {
            self.place(to, piece);
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    pub fn has_king(&self, color: Color) -> bool {
        self.pieces()
            .any(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pretty_squares = self
            .squares
            .iter()
            .map(|rank| {
                rank.iter()
                    .map(|cell| match cell {
                        Some(piece) => format!("{}{}/{}", piece.letter(), piece.current_health, piece.max_health),
                        None => String::from("----"),
                    })
                    .collect::<Vec<String>>()
                    .join(", ")
            })
            .collect::<Vec<String>>()
            .join("\n");

        writeln!(f, "Board\nsquares: \n{}", pretty_squares)
    }
}
