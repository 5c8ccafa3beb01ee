use std::time::Duration;

use blockfall_engine::{
    AudioSink, GameDriver, GameEvent, HighScoreError, HighScoreStore, Intent, SessionSnapshot,
};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    input::{self, KeyAction, SoftDropLatch},
    tui::{App, Runtime},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑", "X"], "Rotate"),
    (&["Z"], "Rotate left"),
    (&["↓"], "Soft drop"),
    (&["Space"], "Hard drop"),
    (&["C"], "Hold"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

const TETRIS_BANNER: &str = "TETRIS!";
const TETRIS_BANNER_DURATION: Duration = Duration::from_secs(1);

/// Interactive play screen: turns key events into intents and feeds them to
/// the driver on every tick.
#[derive(Debug)]
pub(crate) struct PlayApp<A, S> {
    driver: GameDriver<A, S>,
    fps: u16,
    soft_drop: SoftDropLatch,
    pending: Vec<Intent>,
    /// Time left on the four-row clear banner; counts down only while playing.
    banner_remaining: Duration,
    save_error: Option<HighScoreError>,
}

impl<A, S> PlayApp<A, S>
where
    A: AudioSink,
    S: HighScoreStore,
{
    pub(crate) fn new(driver: GameDriver<A, S>, fps: u16) -> Self {
        Self {
            driver,
            fps,
            soft_drop: SoftDropLatch::new(),
            pending: vec![],
            banner_remaining: Duration::ZERO,
            save_error: None,
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.driver.snapshot()
    }

    /// Returns the last high score save failure, if any.
    pub(crate) fn take_save_error(&mut self) -> Option<HighScoreError> {
        self.save_error.take()
    }

    fn banner(&self) -> Option<&'static str> {
        (!self.banner_remaining.is_zero()).then_some(TETRIS_BANNER)
    }

    fn apply_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::Intent(intent) => {
                match intent {
                    Intent::SoftDropOn => self.soft_drop.press(),
                    Intent::SoftDropOff => self.soft_drop.release(),
                    _ => {}
                }
                self.pending.push(intent);
            }
            KeyAction::Restart if self.driver.session().session_state().is_game_over() => {
                self.driver.restart();
                self.pending.clear();
                self.soft_drop = SoftDropLatch::new();
                self.banner_remaining = Duration::ZERO;
            }
            KeyAction::Restart => {}
        }
    }

    fn advance(&mut self, elapsed: Duration) {
        if self.soft_drop.advance(elapsed) {
            self.pending.push(Intent::SoftDropOff);
        }
        if self.driver.session().session_state().is_playing() {
            self.banner_remaining = self.banner_remaining.saturating_sub(elapsed);
        }
        match self.driver.tick(elapsed, self.pending.drain(..)) {
            Ok(events) => {
                if events.contains(&GameEvent::LinesCleared(4)) {
                    self.banner_remaining = TETRIS_BANNER_DURATION;
                }
            }
            Err(err) => self.save_error = Some(err),
        }
    }
}

impl<A, S> App for PlayApp<A, S>
where
    A: AudioSink,
    S: HighScoreStore,
{
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_rate(self.fps);
    }

    fn should_exit(&self) -> bool {
        self.driver.session().quit_requested()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event()
            && let Some(action) = input::key_action(&key)
        {
            self.apply_key(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.driver.snapshot();
        let bindings = if snapshot.game_over {
            GAME_OVER_KEYS
        } else if snapshot.paused {
            PAUSED_KEYS
        } else {
            PLAYING_KEYS
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(
            SessionDisplay::new(&snapshot).banner(self.banner()),
            main_area,
        );
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.advance(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{
        GameConfig, MemoryHighScoreStore, NullAudio, Piece, PieceKind, PiecePosition,
        PieceRotation, PieceSeed,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::*;

    fn app() -> PlayApp<NullAudio, MemoryHighScoreStore> {
        let driver = GameDriver::with_seed(
            GameConfig::default(),
            PieceSeed::from_bytes([5; 16]),
            NullAudio,
            MemoryHighScoreStore::new(0),
        )
        .unwrap();
        PlayApp::new(driver, 60)
    }

    fn press(app: &mut PlayApp<NullAudio, MemoryHighScoreStore>, code: KeyCode) {
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_quit_key_exits_after_tick() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_exit());
        app.advance(Duration::from_millis(16));
        assert!(app.should_exit());
    }

    #[test]
    fn test_soft_drop_released_after_key_goes_quiet() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        app.advance(Duration::ZERO);
        assert!(app.driver.session().is_soft_dropping());

        app.advance(input::SOFT_DROP_HOLD_TIMEOUT);
        assert!(!app.driver.session().is_soft_dropping());
    }

    #[test]
    fn test_reported_release_stops_soft_drop() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        app.advance(Duration::ZERO);
        let release =
            KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release);
        app.handle_event(&mut Runtime::new(), Event::Key(release));
        app.advance(Duration::ZERO);
        assert!(!app.driver.session().is_soft_dropping());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        app.advance(Duration::ZERO);
        assert_eq!(app.snapshot().board.filled_count(), 8);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.snapshot().board.filled_count(), 8);

        while !app.snapshot().game_over {
            press(&mut app, KeyCode::Char(' '));
            app.advance(Duration::ZERO);
        }
        press(&mut app, KeyCode::Char('r'));
        let snapshot = app.snapshot();
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.board.filled_count(), 4);
        assert!(app.take_save_error().is_none());
    }

    #[test]
    fn test_four_line_clear_shows_banner_for_a_while() {
        let mut app = app();
        let bar = |x| {
            Piece::new(PieceKind::I, PiecePosition::new(x, 0)).with_rotation(PieceRotation::new(1))
        };
        // Vertical bars in columns 1..=9 leave a well in column 0.
        for x in (1..10).chain([0]) {
            assert!(app.banner().is_none());
            app.driver.session_mut().set_falling_piece(bar(x)).unwrap();
            press(&mut app, KeyCode::Char(' '));
            app.advance(Duration::ZERO);
        }
        assert_eq!(app.snapshot().lines, 4);
        assert_eq!(app.banner(), Some(TETRIS_BANNER));

        app.advance(TETRIS_BANNER_DURATION / 2);
        assert!(app.banner().is_some());
        app.advance(TETRIS_BANNER_DURATION / 2);
        assert!(app.banner().is_none());
    }
}
