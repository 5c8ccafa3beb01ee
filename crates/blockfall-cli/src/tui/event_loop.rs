use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Produces tick, render and terminal events in arrival order.
///
/// Ticks fire every `tick_interval` and report the real time elapsed since
/// the previous tick, so a late tick carries a longer duration rather than
/// being dropped. Renders happen after any state change, at most once per
/// `frame_interval`.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Duration,
    last_tick: Option<Instant>,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            frame_interval: Duration::ZERO,
            last_tick: None,
            last_render: past_time,
            dirty: true,
        }
    }

    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Blocks until a tick or render is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval {
                match self.last_tick {
                    None => {
                        // The clock starts at the first tick.
                        self.last_tick = Some(now);
                        self.dirty = true;
                        return Ok(TuiEvent::Tick(Duration::ZERO));
                    }
                    Some(last_tick) if now.duration_since(last_tick) >= tick_interval => {
                        self.last_tick = Some(now);
                        self.dirty = true;
                        return Ok(TuiEvent::Tick(now.duration_since(last_tick)));
                    }
                    Some(_) => {}
                }
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self
            .tick_interval
            .zip(self.last_tick)
            .map(|(interval, last_tick)| last_tick + interval);
        let next_render_at = self.dirty.then(|| self.last_render + self.frame_interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
