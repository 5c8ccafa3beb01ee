use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Game logic update, carrying the wall-clock time since the previous tick.
    #[from(ignore)]
    Tick(Duration),
    Render,
    Crossterm(CrosstermEvent),
}
