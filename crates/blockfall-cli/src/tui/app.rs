use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// Trait for TUI applications run by [`Runtime::run`].
pub trait App {
    /// Called once before the event loop starts. Use this to configure the tick rate.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application by `elapsed`, the measured time since the previous tick.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}
