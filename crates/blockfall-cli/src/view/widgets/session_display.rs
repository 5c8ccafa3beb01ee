use blockfall_engine::SessionSnapshot;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// Full game screen: hold and stats on the left, the board in the middle,
/// the next piece on the right, and a popup while paused, after game over, or
/// while a banner is set.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a SessionSnapshot,
    banner: Option<&'a str>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot) -> Self {
        Self {
            snapshot,
            banner: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Short message over the board, e.g. after a four-row clear. The pause
    /// and game-over popups take precedence.
    pub fn banner(self, banner: Option<&'a str>) -> Self {
        Self { banner, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = self.snapshot;
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = if snapshot.game_over {
            color::RED
        } else if snapshot.paused {
            color::YELLOW
        } else {
            color::WHITE
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style)
        };

        let game_board = BoardDisplay::new(&snapshot.board)
            .ghost(snapshot.ghost_piece)
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = PieceDisplay::new()
            .piece(snapshot.held_piece)
            .block(panel("HOLD"));
        let next_panel = PieceDisplay::new()
            .piece(Some(snapshot.next_piece))
            .block(panel("NEXT"));
        let session_stats = SessionStatsDisplay::new(snapshot).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = if snapshot.game_over {
            Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
        } else if snapshot.paused {
            Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
        } else {
            self.banner.map(|text| (text, Style::new().fg(color::BLACK).bg(color::CYAN)))
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blockfall_engine::{GameConfig, GameSession, Intent, PieceSeed};

    use super::*;

    fn render(snapshot: &SessionSnapshot) -> String {
        render_widget(SessionDisplay::new(snapshot))
    }

    fn render_widget(widget: SessionDisplay<'_>) -> String {
        let area = Rect::new(0, 0, 80, 26);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn session() -> GameSession {
        GameSession::with_seed(GameConfig::default(), PieceSeed::from_bytes([3; 16])).unwrap()
    }

    #[test]
    fn test_playing_screen_shows_panels_without_popup() {
        let screen = render(&session().snapshot());
        for label in ["HOLD", "NEXT", "STATS", "SCORE:", "HIGH SCORE:", "LEVEL:", "LINES:"] {
            assert!(screen.contains(label), "missing {label}\n{screen}");
        }
        assert!(screen.contains("[]"), "ghost not drawn\n{screen}");
        assert!(!screen.contains("PAUSED"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_paused_popup() {
        let mut session = session();
        session.tick(Duration::ZERO, [Intent::TogglePause]);
        let screen = render(&session.snapshot());
        assert!(screen.contains("PAUSED"), "{screen}");
    }

    #[test]
    fn test_banner_yields_to_pause() {
        let mut session = session();
        let snapshot = session.snapshot();
        let screen = render_widget(SessionDisplay::new(&snapshot).banner(Some("TETRIS!")));
        assert!(screen.contains("TETRIS!"), "{screen}");

        session.tick(Duration::ZERO, [Intent::TogglePause]);
        let snapshot = session.snapshot();
        let screen = render_widget(SessionDisplay::new(&snapshot).banner(Some("TETRIS!")));
        assert!(screen.contains("PAUSED"), "{screen}");
        assert!(!screen.contains("TETRIS!"), "{screen}");
    }

    #[test]
    fn test_game_over_popup() {
        let mut session = session();
        while !session.session_state().is_game_over() {
            session.tick(Duration::ZERO, [Intent::HardDrop]);
        }
        let screen = render(&session.snapshot());
        assert!(screen.contains("GAME OVER"), "{screen}");
    }
}
