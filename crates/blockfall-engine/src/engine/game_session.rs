use std::{mem, time::Duration};

use crate::{
    BoardSnapshot, HoldError, PieceCollisionError,
    config::{ConfigError, GameConfig},
    core::{
        board::Board,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::{
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// A discrete player command, produced by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDropOn,
    SoftDropOff,
    HardDrop,
    Hold,
    TogglePause,
    Quit,
}

/// Something that happened during a tick that collaborators may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// One lock removed this many full rows (always at least one).
    LinesCleared(usize),
    /// The session ended with `score`; `new_high_score` is set when it beat
    /// the previous high score.
    GameOver { score: u64, new_high_score: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Rate limiter for held keys: an action is accepted only when the
/// configured delay has elapsed since the previous accepted one.
#[derive(Debug, Clone, Copy, Default)]
struct RepeatGate {
    remaining: Duration,
}

impl RepeatGate {
    fn advance(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.saturating_sub(elapsed);
    }

    fn try_trigger(&mut self, delay: Duration) -> bool {
        if !self.remaining.is_zero() {
            return false;
        }
        self.remaining = delay;
        true
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Locked cells with the falling piece painted on top (omitted after game over).
    pub board: BoardSnapshot,
    pub falling_piece: Option<Piece>,
    /// Where the falling piece would land on a hard drop.
    pub ghost_piece: Option<Piece>,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub lines: usize,
    pub next_piece: PieceKind,
    pub held_piece: Option<PieceKind>,
    pub paused: bool,
    pub game_over: bool,
}

/// A single game from first spawn to game over.
///
/// The session is driven entirely by [`GameSession::tick`]: the caller passes
/// the time elapsed since the previous tick together with the intents read
/// since then, and gets back the events that occurred. The session never reads
/// a clock, so the same seed and the same tick sequence always produce the
/// same game.
///
/// A piece moves through the phases spawning, falling, locking and clearing.
/// Locking happens when gravity (or a hard drop) cannot move the piece further
/// down; the lock clears full rows, updates score and level, and spawns the
/// next piece. The game is over when a lock leaves cells on the top row or
/// when a freshly spawned piece does not fit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameSession, Intent};
///
/// let mut session = GameSession::new(GameConfig::default()).unwrap();
/// session.tick(Duration::from_millis(16), [Intent::MoveLeft]);
/// session.tick(Duration::ZERO, [Intent::HardDrop]);
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert!(session.session_state().is_playing());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    generator: PieceGenerator,
    falling_piece: Piece,
    next_piece: PieceKind,
    held_piece: Option<PieceKind>,
    hold_used: bool,
    stats: GameStats,
    high_score: u64,
    session_state: SessionState,
    soft_drop: bool,
    quit_requested: bool,
    fall_interval: Duration,
    fall_timer: Duration,
    level_timer: Duration,
    move_gate: RepeatGate,
    rotate_gate: RepeatGate,
    play_time: Duration,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates a session with a random piece sequence.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, PieceGenerator::new()))
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible piece sequence.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, PieceGenerator::with_seed(seed)))
    }

    fn from_validated(config: GameConfig, mut generator: PieceGenerator) -> Self {
        let board = Board::new(config.width, config.height);
        let falling_piece = Piece::spawn(generator.next_kind(), config.width);
        let next_piece = generator.next_kind();
        let fall_interval = config.fall_interval(1);
        Self {
            config,
            board,
            generator,
            falling_piece,
            next_piece,
            held_piece: None,
            hold_used: false,
            stats: GameStats::new(),
            high_score: 0,
            session_state: SessionState::Playing,
            soft_drop: false,
            quit_requested: false,
            fall_interval,
            fall_timer: Duration::ZERO,
            level_timer: Duration::ZERO,
            move_gate: RepeatGate::default(),
            rotate_gate: RepeatGate::default(),
            play_time: Duration::ZERO,
            events: Vec::new(),
        }
    }

    /// Sets the high score shown alongside the current score.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Starts a new game on the same configuration, keeping the high score.
    ///
    /// The piece sequence continues from the current generator state.
    pub fn restart(&mut self) {
        self.high_score = self.high_score.max(self.stats.score());
        self.board.reset();
        self.falling_piece = Piece::spawn(self.generator.next_kind(), self.config.width);
        self.next_piece = self.generator.next_kind();
        self.held_piece = None;
        self.hold_used = false;
        self.stats = GameStats::new();
        self.session_state = SessionState::Playing;
        self.soft_drop = false;
        self.fall_interval = self.config.fall_interval(1);
        self.fall_timer = Duration::ZERO;
        self.level_timer = Duration::ZERO;
        self.move_gate = RepeatGate::default();
        self.rotate_gate = RepeatGate::default();
        self.play_time = Duration::ZERO;
        self.events.clear();
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held_piece
    }

    #[must_use]
    pub fn is_hold_used(&self) -> bool {
        self.hold_used
    }

    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    #[must_use]
    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// Returns `true` once a [`Intent::Quit`] has been received.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Current gravity interval, ignoring soft drop.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Unpaused time spent playing.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Returns the position a hard drop would lock the falling piece at.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.board.drop_position(&self.falling_piece)
    }

    /// Replaces the falling piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid_placement(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Advances the session by `elapsed` after applying `intents` in order.
    ///
    /// Timers only run while the game is playing: a tick that pauses, resumes
    /// or ends the game does not advance gravity or the level clock.
    pub fn tick<I>(&mut self, elapsed: Duration, intents: I) -> Vec<GameEvent>
    where
        I: IntoIterator<Item = Intent>,
    {
        let was_playing = self.session_state.is_playing();
        if was_playing {
            self.move_gate.advance(elapsed);
            self.rotate_gate.advance(elapsed);
        }

        for intent in intents {
            self.apply_intent(intent);
        }

        if was_playing && self.session_state.is_playing() {
            self.play_time = self.play_time.saturating_add(elapsed);
            self.advance_level_timer(elapsed);
            self.advance_gravity(elapsed);
        }

        mem::take(&mut self.events)
    }

    fn apply_intent(&mut self, intent: Intent) {
        match (intent, self.session_state) {
            (Intent::Quit, _) => self.quit_requested = true,
            (Intent::SoftDropOff, _) => self.soft_drop = false,
            (Intent::TogglePause, _) => self.toggle_pause(),
            (_, SessionState::Paused | SessionState::GameOver) => {}
            (Intent::MoveLeft, SessionState::Playing) => {
                if self.move_gate.try_trigger(self.config.move_repeat_delay()) {
                    let _ = self.try_move_left();
                }
            }
            (Intent::MoveRight, SessionState::Playing) => {
                if self.move_gate.try_trigger(self.config.move_repeat_delay()) {
                    let _ = self.try_move_right();
                }
            }
            (Intent::RotateCw, SessionState::Playing) => {
                if self.rotate_gate.try_trigger(self.config.move_repeat_delay()) {
                    let _ = self.try_rotate(RotationDirection::Clockwise);
                }
            }
            (Intent::RotateCcw, SessionState::Playing) => {
                if self.rotate_gate.try_trigger(self.config.move_repeat_delay()) {
                    let _ = self.try_rotate(RotationDirection::CounterClockwise);
                }
            }
            (Intent::SoftDropOn, SessionState::Playing) => self.soft_drop = true,
            (Intent::HardDrop, SessionState::Playing) => {
                self.hard_drop_and_complete();
            }
            (Intent::Hold, SessionState::Playing) => {
                let _ = self.try_hold();
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    fn try_update_piece<F>(&mut self, update: F) -> Result<(), PieceCollisionError>
    where
        F: FnOnce(&mut Piece),
    {
        let saved = self.falling_piece;
        update(&mut self.falling_piece);
        if self.board.is_valid_placement(&self.falling_piece) {
            Ok(())
        } else {
            self.falling_piece = saved;
            Err(PieceCollisionError)
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update_piece(|piece| piece.translate(-1, 0))
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update_piece(|piece| piece.translate(1, 0))
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update_piece(|piece| piece.translate(0, 1))
    }

    /// Rotates in place; there are no wall kicks, so a blocked rotation is refused.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), PieceCollisionError> {
        self.try_update_piece(|piece| piece.rotate(direction))
    }

    /// Swaps the falling piece with the held one, once per piece.
    ///
    /// The first hold stashes the falling piece and promotes the next piece;
    /// later holds exchange the falling and held pieces. The piece that comes
    /// in always restarts from the spawn anchor in its spawn rotation.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        if self.hold_used {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let incoming_kind = self.held_piece.unwrap_or(self.next_piece);
        let incoming = Piece::spawn(incoming_kind, self.config.width);
        if !self.board.is_valid_placement(&incoming) {
            return Err(HoldError::PieceCollision(PieceCollisionError));
        }
        if self.held_piece.is_none() {
            self.next_piece = self.generator.next_kind();
        }
        self.held_piece = Some(self.falling_piece.kind());
        self.falling_piece = incoming;
        self.hold_used = true;
        self.fall_timer = Duration::ZERO;
        Ok(())
    }

    /// Drops the falling piece as far as it goes and locks it.
    ///
    /// Returns the number of rows cleared by the lock.
    pub fn hard_drop_and_complete(&mut self) -> usize {
        self.falling_piece = self.simulate_drop_position();
        self.complete_piece_drop()
    }

    /// Moves the falling piece down one row, locking it if it cannot move.
    pub fn auto_drop_and_complete(&mut self) {
        if self.try_soft_drop().is_ok() {
            return;
        }
        self.complete_piece_drop();
    }

    fn effective_fall_interval(&self) -> Duration {
        if self.soft_drop {
            self.fall_interval.min(self.config.soft_drop_interval())
        } else {
            self.fall_interval
        }
    }

    /// Runs at most one gravity step per tick; the timer restarts from zero
    /// whenever a step fires.
    fn advance_gravity(&mut self, elapsed: Duration) {
        self.fall_timer = self.fall_timer.saturating_add(elapsed);
        if self.fall_timer >= self.effective_fall_interval() {
            self.fall_timer = Duration::ZERO;
            self.auto_drop_and_complete();
        }
    }

    /// Raises the level by at most one per tick, restarting the level clock.
    fn advance_level_timer(&mut self, elapsed: Duration) {
        let Some(interval) = self.config.level_progression.level_interval() else {
            return;
        };
        self.level_timer = self.level_timer.saturating_add(elapsed);
        if self.level_timer >= interval {
            self.level_timer = Duration::ZERO;
            self.raise_level(self.stats.level().saturating_add(1));
        }
    }

    fn raise_level(&mut self, level: u32) {
        if self.stats.raise_level(level) {
            self.fall_interval = self.config.fall_interval(self.stats.level());
        }
    }

    fn complete_piece_drop(&mut self) -> usize {
        self.board.lock(&self.falling_piece);
        let cleared_lines = self.board.clear_full_rows();
        self.stats
            .complete_piece_drop(cleared_lines, self.config.score_table);
        if let Some(level) = self
            .config
            .level_progression
            .level_for_lines(self.stats.total_cleared_lines())
        {
            self.raise_level(level);
        }
        if cleared_lines > 0 {
            self.events.push(GameEvent::LinesCleared(cleared_lines));
        }

        if self.board.is_lost() {
            self.finish();
        } else {
            self.spawn_next_piece();
        }
        cleared_lines
    }

    fn spawn_next_piece(&mut self) {
        self.falling_piece = Piece::spawn(self.next_piece, self.config.width);
        self.next_piece = self.generator.next_kind();
        self.hold_used = false;
        self.fall_timer = Duration::ZERO;
        if !self.board.is_valid_placement(&self.falling_piece) {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let score = self.stats.score();
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
        }
        self.session_state = SessionState::GameOver;
        self.soft_drop = false;
        self.events.push(GameEvent::GameOver {
            score,
            new_high_score,
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut board = self.board.snapshot();
        let game_over = self.session_state.is_game_over();
        let (falling_piece, ghost_piece) = if game_over {
            (None, None)
        } else {
            board.fill_piece(&self.falling_piece);
            (Some(self.falling_piece), Some(self.simulate_drop_position()))
        };
        SessionSnapshot {
            board,
            falling_piece,
            ghost_piece,
            score: self.stats.score(),
            high_score: self.high_score,
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            next_piece: self.next_piece,
            held_piece: self.held_piece,
            paused: self.session_state.is_paused(),
            game_over,
        }
    }
}
