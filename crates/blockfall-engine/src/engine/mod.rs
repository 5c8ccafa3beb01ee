//! Game engine logic and state management.
//!
//! This module builds gameplay on top of the core data structures:
//!
//! - [`GameSession`] - One game: falling piece, next/held pieces, timers and the state machine
//! - [`GameStats`] - Score, level, lines cleared and piece count
//! - [`PieceGenerator`] - Seeded uniform piece generation
//! - [`GameDriver`] - Connects a session to its audio and high-score collaborators
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (or a [`GameDriver`]) from a [`GameConfig`](crate::GameConfig)
//! 2. Call [`GameSession::tick`] every frame with the elapsed time and the player's intents
//! 3. React to the returned [`GameEvent`]s and render [`GameSession::snapshot`]
//! 4. Repeat until [`SessionState::GameOver`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameConfig, GameEvent, GameSession, Intent, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(GameConfig::default(), seed).unwrap();
//!
//! while !session.session_state().is_game_over() {
//!     for event in session.tick(Duration::from_millis(16), [Intent::HardDrop]) {
//!         if let GameEvent::GameOver { score, .. } = event {
//!             println!("game over, score {score}");
//!         }
//!     }
//! }
//! ```

pub use self::{driver::*, game_session::*, game_stats::*, piece_generator::*};

mod driver;
mod game_session;
mod game_stats;
mod piece_generator;
