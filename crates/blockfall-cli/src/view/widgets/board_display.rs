use std::iter;

use blockfall_engine::{BoardSnapshot, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::BlockDisplay;

/// The playfield. Locked cells and the falling piece come from the
/// snapshot; the ghost is drawn only where the snapshot is empty.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a BoardSnapshot,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a BoardSnapshot) -> Self {
        Self {
            board,
            ghost: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::grid_len(self.board.width()) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::grid_len(self.board.height()) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let ghost_cells = self
            .ghost
            .map(|piece| piece.occupied_positions())
            .unwrap_or_default();

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for ((grid_row, row), y) in iter::zip(grid_cells, self.board.rows()).zip(0..) {
            for ((grid_cell, cell), x) in iter::zip(grid_row, row).zip(0..) {
                let block_display = match cell {
                    Some(color) => BlockDisplay::filled(*color),
                    None if ghost_cells.contains(&(x, y)) => BlockDisplay::ghost(),
                    None => BlockDisplay::empty(true),
                };
                block_display.render(grid_cell, buf);
            }
        }
    }
}
