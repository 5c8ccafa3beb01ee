use std::{collections::BTreeMap, mem};

use super::piece::{Color, Piece};

/// Locked cells of the playfield.
///
/// The board keeps a sparse mapping from `(column, row)` to the color of the
/// piece that left the cell there. The dense grid needed for rendering is
/// derived on demand by [`Board::snapshot`], so there is only ever one copy of
/// the locked state.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell of the visible board
/// - Locked rows are always within `0..height`
/// - Rows above the board (negative) only exist on falling pieces
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::new(10, 20);
/// let mut piece = Piece::spawn(PieceKind::O, board.width());
/// piece.translate(0, 18);
/// assert!(board.is_valid_placement(&piece));
///
/// board.lock(&piece);
/// assert_eq!(board.clear_full_rows(), 0);
/// assert!(!board.is_lost());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    locked: BTreeMap<(i32, i32), Color>,
    topped_out: bool,
}

impl Board {
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            locked: BTreeMap::new(),
            topped_out: false,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    fn columns(&self) -> i32 {
        i32::from(self.width)
    }

    fn rows(&self) -> i32 {
        i32::from(self.height)
    }

    /// Returns the color of the locked cell at `(x, y)`, if any.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Color> {
        self.locked.get(&(x, y)).copied()
    }

    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.locked.len()
    }

    /// Places a single locked cell, bypassing piece geometry.
    ///
    /// Cells outside the visible board are ignored.
    pub fn fill_cell(&mut self, x: i32, y: i32, color: Color) {
        if (0..self.columns()).contains(&x) && (0..self.rows()).contains(&y) {
            self.locked.insert((x, y), color);
        }
    }

    /// Tests whether `piece` may occupy its current cells.
    ///
    /// A cell on the visible board is rejected when its column is outside the
    /// board, when it is below the last row, or when it overlaps a locked
    /// cell. Cells above the board (negative rows) are always accepted, even
    /// when their column is out of range, so pieces can enter from above.
    #[must_use]
    pub fn is_valid_placement(&self, piece: &Piece) -> bool {
        piece.occupied_positions().iter().all(|&(x, y)| {
            y < 0
                || ((0..self.columns()).contains(&x)
                    && y < self.rows()
                    && !self.locked.contains_key(&(x, y)))
        })
    }

    /// Fixes every cell of `piece` onto the board with the piece's color.
    ///
    /// Existing cells at the same coordinates are overwritten. Cells above the
    /// visible board are not stored; instead the board is marked as topped
    /// out, which [`Self::is_lost`] reports.
    pub fn lock(&mut self, piece: &Piece) {
        let color = piece.color();
        for (x, y) in piece.occupied_positions() {
            if y < 0 {
                self.topped_out = true;
                continue;
            }
            debug_assert!(y < self.rows(), "locked cell below the board: {piece}");
            self.locked.insert((x, y), color);
        }
    }

    /// A board without columns has no full rows.
    #[must_use]
    pub fn is_row_full(&self, y: i32) -> bool {
        self.width > 0 && (0..self.columns()).all(|x| self.locked.contains_key(&(x, y)))
    }

    /// Clears full rows and returns the number of rows cleared.
    ///
    /// Rows are scanned from the bottom up. When a row is full its cells are
    /// removed and every locked cell above it moves down one row; the same
    /// row index is then examined again, since it now holds the row that was
    /// above it. Adjacent full rows are therefore all cleared in one call.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.rows() - 1;
        while y >= 0 {
            if self.is_row_full(y) {
                self.remove_row(y);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    fn remove_row(&mut self, row: i32) {
        self.locked = mem::take(&mut self.locked)
            .into_iter()
            .filter(|&((_, y), _)| y != row)
            .map(|((x, y), color)| if y < row { ((x, y + 1), color) } else { ((x, y), color) })
            .collect();
    }

    /// Returns `true` when a locked cell sits on the top row or above it.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.topped_out || self.locked.keys().any(|&(_, y)| y < 1)
    }

    /// Returns the lowest valid position `piece` reaches by falling straight down.
    #[must_use]
    pub fn drop_position(&self, piece: &Piece) -> Piece {
        let mut dropped = *piece;
        loop {
            let mut next = dropped;
            next.translate(0, 1);
            if !self.is_valid_placement(&next) {
                return dropped;
            }
            dropped = next;
        }
    }

    /// Builds the dense grid of locked cells for rendering.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::empty(self.width, self.height);
        for (&(x, y), &color) in &self.locked {
            snapshot.set(x, y, Some(color));
        }
        snapshot
    }

    /// Removes all locked cells.
    pub fn reset(&mut self) {
        self.locked.clear();
        self.topped_out = false;
    }
}

/// Read-only dense view of the board: one `Option<Color>` per cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl BoardSnapshot {
    #[must_use]
    pub fn empty(width: u8, height: u8) -> Self {
        let width = usize::from(width);
        let height = usize::from(height);
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    /// Returns the cell at `(x, y)`; out-of-range coordinates read as empty.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    fn set(&mut self, x: i32, y: i32, cell: Option<Color>) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Paints the visible cells of `piece` with its color.
    ///
    /// Used to overlay the falling piece on top of the locked cells.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_positions() {
            self.set(x, y, Some(piece.color()));
        }
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PieceKind, PiecePosition, PieceRotation};

    const WIDTH: u8 = 10;
    const HEIGHT: u8 = 20;
    const GRAY: Color = Color::rgb(128, 128, 128);

    fn fill_row(board: &mut Board, y: i32) {
        for x in 0..i32::from(WIDTH) {
            board.fill_cell(x, y, GRAY);
        }
    }

    fn piece_at(kind: PieceKind, x: i32, y: i32) -> Piece {
        Piece::new(kind, PiecePosition::new(x, y))
    }

    #[test]
    fn test_spawn_is_valid_for_every_kind() {
        let board = Board::new(WIDTH, HEIGHT);
        for kind in PieceKind::ALL {
            assert!(board.is_valid_placement(&Piece::spawn(kind, WIDTH)), "{kind:?}");
        }
    }

    #[test]
    fn test_walls_and_floor_reject() {
        let board = Board::new(WIDTH, HEIGHT);
        assert!(!board.is_valid_placement(&piece_at(PieceKind::I, -1, 0)));
        assert!(!board.is_valid_placement(&piece_at(PieceKind::I, 7, 0)));
        assert!(board.is_valid_placement(&piece_at(PieceKind::I, 6, 0)));
        assert!(board.is_valid_placement(&piece_at(PieceKind::O, 0, 18)));
        assert!(!board.is_valid_placement(&piece_at(PieceKind::O, 0, 19)));
    }

    #[test]
    fn test_rows_above_board_ignore_column_bounds() {
        let board = Board::new(WIDTH, HEIGHT);
        assert!(board.is_valid_placement(&piece_at(PieceKind::I, 3, -1)));
        assert!(board.is_valid_placement(&piece_at(PieceKind::I, 8, -1)));
        assert!(board.is_valid_placement(&piece_at(PieceKind::I, -3, -1)));

        // Vertical I hanging over the left edge: only its visible cells count.
        let vertical = piece_at(PieceKind::I, -1, -3).with_rotation(PieceRotation::new(1));
        assert!(!board.is_valid_placement(&vertical));
        let hidden = piece_at(PieceKind::I, -1, -4).with_rotation(PieceRotation::new(1));
        assert!(board.is_valid_placement(&hidden));
    }

    #[test]
    fn test_locked_cells_reject_overlap() {
        let mut board = Board::new(WIDTH, HEIGHT);
        board.fill_cell(5, 10, GRAY);
        assert!(!board.is_valid_placement(&piece_at(PieceKind::O, 4, 9)));
        assert!(board.is_valid_placement(&piece_at(PieceKind::O, 6, 9)));
    }

    #[test]
    fn test_lock_then_snapshot_shows_piece() {
        let mut board = Board::new(WIDTH, HEIGHT);
        let piece = piece_at(PieceKind::T, 2, 17);
        board.lock(&piece);

        let snapshot = board.snapshot();
        assert_eq!(snapshot.filled_count(), 4);
        for (x, y) in piece.occupied_positions() {
            assert_eq!(snapshot.get(x, y), Some(PieceKind::T.color()));
        }
        assert_eq!(snapshot.get(2, 17), None);
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new(WIDTH, HEIGHT);
        for x in 0..i32::from(WIDTH) - 1 {
            board.fill_cell(x, 19, GRAY);
        }
        board.fill_cell(4, 12, GRAY);
        let before = board.clone();

        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_bottom_row_shifts_cells_above() {
        let mut board = Board::new(WIDTH, HEIGHT);
        fill_row(&mut board, 19);
        board.fill_cell(0, 18, GRAY);
        board.fill_cell(3, 15, PieceKind::S.color());

        assert_eq!(board.clear_full_rows(), 1);
        assert!(!board.is_row_full(19));
        assert_eq!(board.locked_count(), 2);
        assert_eq!(board.cell(0, 19), Some(GRAY));
        assert_eq!(board.cell(3, 16), Some(PieceKind::S.color()));
        assert_eq!(board.cell(3, 15), None);
    }

    #[test]
    fn test_clear_two_adjacent_rows() {
        let mut board = Board::new(WIDTH, HEIGHT);
        fill_row(&mut board, 18);
        fill_row(&mut board, 19);
        board.fill_cell(7, 17, GRAY);
        board.fill_cell(2, 10, GRAY);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.locked_count(), 2);
        assert_eq!(board.cell(7, 19), Some(GRAY));
        assert_eq!(board.cell(2, 12), Some(GRAY));
    }

    #[test]
    fn test_clear_split_rows() {
        let mut board = Board::new(WIDTH, HEIGHT);
        fill_row(&mut board, 19);
        board.fill_cell(1, 18, GRAY);
        fill_row(&mut board, 17);
        board.fill_cell(5, 16, GRAY);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.locked_count(), 2);
        assert_eq!(board.cell(1, 19), Some(GRAY));
        assert_eq!(board.cell(5, 18), Some(GRAY));
    }

    #[test]
    fn test_clear_four_rows() {
        let mut board = Board::new(WIDTH, HEIGHT);
        for y in 16..20 {
            fill_row(&mut board, y);
        }
        assert_eq!(board.clear_full_rows(), 4);
        assert_eq!(board.locked_count(), 0);
    }

    #[test]
    fn test_loss_detection() {
        let mut board = Board::new(WIDTH, HEIGHT);
        board.fill_cell(4, 1, GRAY);
        board.fill_cell(4, 19, GRAY);
        assert!(!board.is_lost());

        board.fill_cell(4, 0, GRAY);
        assert!(board.is_lost());
    }

    #[test]
    fn test_zero_width_board_has_no_full_rows() {
        let mut board = Board::new(0, HEIGHT);
        assert!(!board.is_row_full(i32::from(HEIGHT) - 1));
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.snapshot().rows().count(), 0);
    }

    #[test]
    fn test_lock_above_board_tops_out() {
        let mut board = Board::new(WIDTH, HEIGHT);
        let piece = piece_at(PieceKind::I, 3, -3).with_rotation(PieceRotation::new(1));
        board.lock(&piece);
        // Only the cell on row 0 is stored.
        assert_eq!(board.locked_count(), 1);
        assert!(board.is_lost());

        board.reset();
        assert_eq!(board.locked_count(), 0);
        assert!(!board.is_lost());
    }

    #[test]
    fn test_drop_position() {
        let mut board = Board::new(WIDTH, HEIGHT);
        let piece = Piece::spawn(PieceKind::I, WIDTH);
        assert_eq!(board.drop_position(&piece).position(), PiecePosition::new(3, 19));

        board.fill_cell(5, 10, GRAY);
        assert_eq!(board.drop_position(&piece).position(), PiecePosition::new(3, 9));
    }

    #[test]
    fn test_snapshot_fill_piece_skips_hidden_cells() {
        let board = Board::new(WIDTH, HEIGHT);
        let mut snapshot = board.snapshot();
        let piece = piece_at(PieceKind::I, 0, -2).with_rotation(PieceRotation::new(1));
        snapshot.fill_piece(&piece);
        assert_eq!(snapshot.filled_count(), 2);
        assert_eq!(snapshot.rows().count(), usize::from(HEIGHT));
        assert!(snapshot.rows().all(|row| row.len() == usize::from(WIDTH)));
    }
}
