use std::time::Duration;

use crate::{
    config::{ConfigError, GameConfig},
    high_score::{HighScoreError, HighScoreStore},
};

use super::{
    game_session::{GameEvent, GameSession, Intent, SessionSnapshot},
    piece_generator::PieceSeed,
};

/// Sound cue played in response to a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    LineClear,
    GameOver,
}

impl AudioCue {
    #[must_use]
    pub const fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::LinesCleared(_) => Self::LineClear,
            GameEvent::GameOver { .. } => Self::GameOver,
        }
    }
}

/// Fire-and-forget sound output. Playback failures are the sink's concern.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn play(&mut self, cue: AudioCue) {
        (**self).play(cue);
    }
}

/// Audio sink that discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Wires a [`GameSession`] to its audio and persistence collaborators.
///
/// The driver loads the stored high score when it starts a session, plays a
/// cue for every event, and saves the score when a game ends with a new best.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameDriver, Intent, MemoryHighScoreStore, NullAudio};
///
/// let store = MemoryHighScoreStore::new(500);
/// let mut driver = GameDriver::new(GameConfig::default(), NullAudio, store).unwrap();
/// assert_eq!(driver.snapshot().high_score, 500);
///
/// driver.tick(Duration::from_millis(16), [Intent::HardDrop]).unwrap();
/// ```
#[derive(Debug)]
pub struct GameDriver<A, S> {
    session: GameSession,
    audio: A,
    store: S,
}

impl<A, S> GameDriver<A, S>
where
    A: AudioSink,
    S: HighScoreStore,
{
    pub fn new(config: GameConfig, audio: A, store: S) -> Result<Self, ConfigError> {
        let session = GameSession::new(config)?;
        Ok(Self::from_session(session, audio, store))
    }

    pub fn with_seed(
        config: GameConfig,
        seed: PieceSeed,
        audio: A,
        store: S,
    ) -> Result<Self, ConfigError> {
        let session = GameSession::with_seed(config, seed)?;
        Ok(Self::from_session(session, audio, store))
    }

    fn from_session(session: GameSession, audio: A, mut store: S) -> Self {
        let high_score = store.load_high_score();
        Self {
            session: session.with_high_score(high_score),
            audio,
            store,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advances the session and dispatches the resulting events.
    ///
    /// Every event triggers its audio cue. On game over with a new best score
    /// the score is saved; a failed save is returned after all cues have played.
    pub fn tick<I>(&mut self, elapsed: Duration, intents: I) -> Result<Vec<GameEvent>, HighScoreError>
    where
        I: IntoIterator<Item = Intent>,
    {
        let events = self.session.tick(elapsed, intents);
        let mut result = Ok(());
        for event in &events {
            self.audio.play(AudioCue::for_event(event));
            if let GameEvent::GameOver {
                score,
                new_high_score: true,
            } = *event
            {
                result = self.store.save_high_score(score);
            }
        }
        result.map(|()| events)
    }

    /// Starts a new game, keeping the configuration and the high score.
    pub fn restart(&mut self) {
        self.session.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryHighScoreStore, Piece, PieceKind, PiecePosition};

    #[derive(Debug, Default)]
    struct RecordingAudio(Vec<AudioCue>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }
    }

    struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn load_high_score(&mut self) -> u64 {
            0
        }

        fn save_high_score(&mut self, _score: u64) -> Result<(), HighScoreError> {
            let path = std::env::temp_dir()
                .join("blockfall-missing-dir")
                .join("score.txt");
            crate::FileHighScoreStore::new(path).save_high_score(0)
        }
    }

    fn driver<S: HighScoreStore>(store: S) -> GameDriver<RecordingAudio, S> {
        GameDriver::with_seed(
            GameConfig::default(),
            PieceSeed::from_bytes([9; 16]),
            RecordingAudio::default(),
            store,
        )
        .unwrap()
    }

    /// Stacks vertical I pieces in column 5 until one locks on the top row.
    fn force_game_over<S: HighScoreStore>(
        driver: &mut GameDriver<RecordingAudio, S>,
    ) -> Result<Vec<GameEvent>, HighScoreError> {
        let bar = Piece::new(PieceKind::I, PiecePosition::new(5, 0))
            .with_rotation(crate::PieceRotation::new(1));
        for _ in 0..4 {
            driver.session.set_falling_piece(bar).unwrap();
            driver.tick(Duration::ZERO, [Intent::HardDrop])?;
        }
        driver.session.set_falling_piece(bar).unwrap();
        driver.tick(Duration::ZERO, [Intent::HardDrop])
    }

    #[test]
    fn test_loads_high_score_on_start() {
        let driver = driver(MemoryHighScoreStore::new(321));
        assert_eq!(driver.snapshot().high_score, 321);
    }

    #[test]
    fn test_game_over_without_new_best_does_not_save() {
        let mut driver = driver(MemoryHighScoreStore::new(10));
        let events = force_game_over(&mut driver).unwrap();

        assert!(matches!(
            events.as_slice(),
            [GameEvent::GameOver {
                new_high_score: false,
                ..
            }]
        ));
        assert_eq!(driver.audio().0, [AudioCue::GameOver]);
        assert_eq!(driver.store().saves(), 0);
    }

    #[test]
    fn test_line_clear_plays_cue_and_new_best_is_saved() {
        let mut driver = driver(MemoryHighScoreStore::new(0));
        for x in 2..10 {
            driver.session.board_mut().fill_cell(x, 19, PieceKind::T.color());
        }
        let square = Piece::new(PieceKind::O, PiecePosition::new(0, 0));
        driver.session.set_falling_piece(square).unwrap();
        let events = driver.tick(Duration::ZERO, [Intent::HardDrop]).unwrap();
        assert_eq!(events, [GameEvent::LinesCleared(1)]);

        force_game_over(&mut driver).unwrap();
        assert_eq!(driver.audio().0, [AudioCue::LineClear, AudioCue::GameOver]);
        assert_eq!(driver.store().score(), 100);
        assert_eq!(driver.store().saves(), 1);

        driver.restart();
        assert_eq!(driver.snapshot().high_score, 100);
        assert!(!driver.snapshot().game_over);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut driver = driver(FailingStore);
        for x in 2..10 {
            driver.session.board_mut().fill_cell(x, 19, PieceKind::T.color());
        }
        let square = Piece::new(PieceKind::O, PiecePosition::new(0, 0));
        driver.session.set_falling_piece(square).unwrap();
        driver.tick(Duration::ZERO, [Intent::HardDrop]).unwrap();

        assert!(force_game_over(&mut driver).is_err());
        assert!(driver.session().session_state().is_game_over());
    }
}
