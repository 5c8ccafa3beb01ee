//! Keyboard mapping from crossterm events to session intents.

use std::time::Duration;

use blockfall_engine::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks of the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub(crate) enum KeyAction {
    Intent(Intent),
    /// Starts a new game; only honored after game over.
    Restart,
}

/// Maps a key event to an action.
///
/// Releases are ignored except for ↓, which ends a soft drop. Terminals that
/// do not report releases never produce one.
pub(crate) fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return (event.code == KeyCode::Down).then_some(Intent::SoftDropOff.into());
    }

    let intent = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Intent::Quit,
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Up | KeyCode::Char('x' | 'X') => Intent::RotateCw,
        KeyCode::Char('z' | 'Z') => Intent::RotateCcw,
        KeyCode::Down => Intent::SoftDropOn,
        KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Char('c' | 'C') => Intent::Hold,
        KeyCode::Char('p' | 'P') => Intent::TogglePause,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Intent::Quit,
        KeyCode::Char('r' | 'R') => return Some(KeyAction::Restart),
        _ => return None,
    };
    Some(intent.into())
}

/// How long a soft drop lasts after the last ↓ press or repeat when the
/// terminal does not report key releases. Longer than the usual initial
/// auto-repeat delay, so a held key stays down.
pub(crate) const SOFT_DROP_HOLD_TIMEOUT: Duration = Duration::from_millis(500);

/// Tracks whether ↓ is held.
///
/// Once a real release event has been seen the terminal is known to report
/// releases, and the timeout no longer applies.
#[derive(Debug, Default)]
pub(crate) struct SoftDropLatch {
    since_press: Option<Duration>,
    releases_reported: bool,
}

impl SoftDropLatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a press or auto-repeat of ↓.
    pub(crate) fn press(&mut self) {
        self.since_press = Some(Duration::ZERO);
    }

    /// Records a reported release of ↓.
    pub(crate) fn release(&mut self) {
        self.since_press = None;
        self.releases_reported = true;
    }

    /// Advances the latch clock. Returns `true` when the soft drop should be
    /// released because the key has gone quiet.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> bool {
        if self.releases_reported {
            return false;
        }
        let Some(since_press) = &mut self.since_press else {
            return false;
        };
        *since_press = since_press.saturating_add(elapsed);
        if *since_press >= SOFT_DROP_HOLD_TIMEOUT {
            self.since_press = None;
            return true;
        }
        false
    }

    pub(crate) fn is_held(&self) -> bool {
        self.since_press.is_some()
    }
}
