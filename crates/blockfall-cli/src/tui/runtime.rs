use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Manages the event loop and runs an [`App`] inside a ratatui terminal.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    report_key_releases: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the terminal to report key releases when it supports the
    /// keyboard enhancement protocol. Other terminals only report presses.
    #[must_use]
    pub fn report_key_releases(self, enabled: bool) -> Self {
        Self {
            report_key_releases: enabled,
            ..self
        }
    }

    /// Sets both the tick rate and the maximum frame rate (Hz).
    pub fn set_rate(&mut self, rate: u16) {
        let interval = Duration::from_secs(1) / u32::from(rate.max(1));
        self.events.set_tick_interval(Some(interval));
        self.events.set_frame_interval(interval);
    }

    /// Runs the application until [`App::should_exit`] returns `true`.
    ///
    /// - `Tick`: calls `app.update()` with the elapsed time
    /// - `Render`: calls `app.draw()`
    /// - terminal events: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            let enhanced = self.report_key_releases && supports_keyboard_enhancement()?;
            if enhanced {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            let result = self.run_loop(terminal, app);

            if enhanced {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn run_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(elapsed) => app.update(self, elapsed),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}
