use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Row delta a pawn of this color moves by. White starts at the bottom (row 6) and moves up.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub const fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PieceKind {
    #[default]
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Hit points a freshly set up piece of this kind starts with.
    pub const fn starting_health(self) -> u8 {
        match self {
            PieceKind::Pawn => 3,
            PieceKind::Rook => 5,
            PieceKind::Knight => 4,
            PieceKind::Bishop => 4,
            PieceKind::Queen => 5,
            PieceKind::King => 10,
        }
    }

    /// Uppercase letter for the piece; the board printer lowercases it for black.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };

        Some((kind, color))
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{name}")
    }
}

/// Coarse health bucket used to draw the border around a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    /// At least 75% of max health
    Healthy,
    /// At least 40% of max health
    Wounded,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub max_health: u8,
    pub current_health: u8,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        let health = kind.starting_health();
        Piece {
            kind,
            color,
            max_health: health,
            current_health: health,
        }
    }

    /// A piece that has already taken damage. `current_health` is clamped to `1..=max_health`.
    pub fn with_health(kind: PieceKind, color: Color, current_health: u8) -> Piece {
        let mut piece = Piece::new(kind, color);
        piece.current_health = current_health.clamp(1, piece.max_health);
        piece
    }

    pub const fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Takes one point of damage and returns the health left.
    pub fn take_hit(&mut self) -> u8 {
        self.current_health = self.current_health.saturating_sub(1);
        self.current_health
    }

    pub fn health_band(&self) -> HealthBand {
        // Integer form of ratio >= 0.75 and ratio >= 0.4
        let current = self.current_health as u32;
        let max = self.max_health as u32;
        if current * 4 >= max * 3 {
            HealthBand::Healthy
        } else if current * 5 >= max * 2 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    pub fn letter(&self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }
}
