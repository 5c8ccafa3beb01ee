use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Number of cells occupied by every tetromino in every rotation state.
pub const PIECE_CELLS: usize = 4;

/// An RGB color attached to a piece kind and to the cells it leaves on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A Tetris piece (tetromino) with position, rotation, and type.
///
/// Unlike a board cell, a piece may hang partially above the visible area
/// (negative rows) while it is still falling.
///
/// Movement and rotation mutate the piece in place without any validation.
/// Callers check the result against a [`Board`](super::board::Board) and
/// restore the previous value when the placement is rejected.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, RotationDirection};
///
/// let mut piece = Piece::spawn(PieceKind::T, 10);
/// piece.translate(1, 0);
/// piece.rotate(RotationDirection::Clockwise);
/// assert_eq!(piece.occupied_positions().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        )
    }
}

impl Piece {
    /// Creates a piece in its spawn rotation with its anchor at `position`.
    #[must_use]
    pub const fn new(kind: PieceKind, position: PiecePosition) -> Self {
        Self {
            position,
            rotation: PieceRotation::SPAWN,
            kind,
        }
    }

    /// Creates a piece at the top-center spawn anchor of a board `board_width` columns wide.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        Self::new(kind, kind.spawn_position(board_width))
    }

    #[must_use]
    pub const fn with_rotation(self, rotation: PieceRotation) -> Self {
        Self {
            rotation: rotation.normalized(self.kind),
            ..self
        }
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Returns the absolute board coordinates `(column, row)` of the four occupied cells.
    #[must_use]
    pub fn occupied_positions(&self) -> ArrayVec<(i32, i32), PIECE_CELLS> {
        self.kind
            .occupied_positions(self.rotation)
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
            .collect()
    }

    /// Advances or retreats the rotation index, wrapping around the kind's state count.
    pub fn rotate(&mut self, direction: RotationDirection) {
        self.rotation = self.rotation.rotated(self.kind, direction);
    }

    /// Shifts the anchor by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.translated(dx, dy);
    }
}

/// Anchor of a piece on the board.
///
/// The anchor is the top-left corner of the current rotation state's matrix.
///
/// - (0, 0) is the top-left cell of the visible board
/// - X increases rightward (columns)
/// - Y increases downward (rows), and may be negative above the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Direction of a single rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    /// Next rotation state (index + 1).
    Clockwise,
    /// Previous rotation state (index - 1).
    CounterClockwise,
}

/// Rotation index of a piece.
///
/// `0` is the spawn orientation. The index wraps modulo the number of
/// rotation states the piece kind defines (1, 2 or 4).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn rotated(self, kind: PieceKind, direction: RotationDirection) -> Self {
        let count = kind.rotation_count();
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % count),
            RotationDirection::CounterClockwise => Self((self.0 + count - 1) % count),
        }
    }

    const fn normalized(self, kind: PieceKind) -> Self {
        Self(self.0 % kind.rotation_count())
    }
}

/// Enum representing the type of piece.
///
/// The declaration order is the catalog order and determines each kind's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Draws each of the seven kinds with equal probability.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in catalog order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the ordered rotation states of this kind.
    #[must_use]
    pub const fn rotations(self) -> &'static [PieceShape] {
        PIECE_ROTATIONS[self as usize]
    }

    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn rotation_count(self) -> u8 {
        self.rotations().len() as u8
    }

    /// Returns the occupancy matrix of the given rotation state (wrapped to a valid index).
    #[must_use]
    pub const fn shape(self, rotation: PieceRotation) -> PieceShape {
        let rotations = self.rotations();
        rotations[rotation.index() % rotations.len()]
    }

    #[must_use]
    pub const fn color(self) -> Color {
        PIECE_COLORS[self as usize]
    }

    /// Returns `(width, height)` of the given rotation state's matrix.
    #[must_use]
    pub const fn size(self, rotation: PieceRotation) -> (usize, usize) {
        let shape = self.shape(rotation);
        (shape[0].len(), shape.len())
    }

    #[must_use]
    pub fn is_occupied(self, rotation: PieceRotation, (x, y): (usize, usize)) -> bool {
        self.shape(rotation)
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Returns an iterator of occupied local positions `(dx, dy)` in the given rotation.
    pub fn occupied_positions(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        self.shape(rotation)
            .iter()
            .zip(0..)
            .flat_map(|(row, dy)| {
                row.iter()
                    .zip(0..)
                    .filter(|(cell, _)| **cell)
                    .map(move |(_, dx)| (dx, dy))
            })
    }

    /// Spawn anchor on a board `board_width` columns wide: centered on the
    /// spawn-rotation width, top row.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn spawn_position(self, board_width: u8) -> PiecePosition {
        let (width, _) = self.size(PieceRotation::SPAWN);
        PiecePosition::new(board_width as i32 / 2 - width as i32 / 2, 0)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Occupancy matrix of one rotation state, row-major, `true` = occupied.
pub type PieceShape = &'static [&'static [bool]];

const PIECE_COLORS: [Color; PieceKind::LEN] = [
    Color::rgb(0, 255, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 165, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(128, 0, 128),
    Color::rgb(255, 0, 0),
];

const PIECE_ROTATIONS: [&[PieceShape]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    [
        // I-piece
        &[&[&[C, C, C, C]], &[&[C], &[C], &[C], &[C]]],
        // J-piece
        &[
            &[&[C, E, E], &[C, C, C]],
            &[&[C, C], &[C, E], &[C, E]],
            &[&[C, C, C], &[E, E, C]],
            &[&[E, C], &[E, C], &[C, C]],
        ],
        // L-piece
        &[
            &[&[E, E, C], &[C, C, C]],
            &[&[C, E], &[C, E], &[C, C]],
            &[&[C, C, C], &[C, E, E]],
            &[&[C, C], &[E, C], &[E, C]],
        ],
        // O-piece
        &[&[&[C, C], &[C, C]]],
        // S-piece
        &[&[&[E, C, C], &[C, C, E]], &[&[C, E], &[C, C], &[E, C]]],
        // T-piece
        &[
            &[&[E, C, E], &[C, C, C]],
            &[&[C, E], &[C, C], &[C, E]],
            &[&[C, C, C], &[E, C, E]],
            &[&[E, C], &[C, C], &[E, C]],
        ],
        // Z-piece
        &[&[&[C, C, E], &[E, C, C]], &[&[E, C], &[C, C], &[C, E]]],
    ]
};
