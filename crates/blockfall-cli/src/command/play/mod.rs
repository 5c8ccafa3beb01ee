use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{FileHighScoreStore, GameDriver, PieceSeed};
use rand::Rng as _;

use crate::{
    audio::{self, AudioMode},
    command::play::app::PlayApp,
    tui::Runtime,
    util,
};

mod app;

const DEFAULT_HIGH_SCORE_FILE: &str = "high_score.txt";
const DEFAULT_SOUND_DIR: &str = "sounds";
const DEFAULT_FPS: u16 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game configuration file (JSON); missing fields use defaults
    #[clap(long)]
    pub(super) config: Option<PathBuf>,
    /// File the high score is read from and written to
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    pub(super) high_score_file: PathBuf,
    /// Piece sequence seed (32 hex digits); random when omitted
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Frames (and game ticks) per second
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u16).range(1..=240))]
    pub(super) fps: u16,
    /// How line clears and game over are announced
    #[clap(long, value_enum, default_value_t = AudioMode::default())]
    pub(super) audio: AudioMode,
    /// Directory holding line_clear.wav and game_over.wav for `--audio sound`
    #[clap(long, default_value = DEFAULT_SOUND_DIR)]
    pub(super) sound_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            config: None,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            seed: None,
            fps: DEFAULT_FPS,
            audio: AudioMode::default(),
            sound_dir: PathBuf::from(DEFAULT_SOUND_DIR),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        config,
        high_score_file,
        seed,
        fps,
        audio,
        sound_dir,
    } = arg;

    let config = util::load_config(config.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let audio = audio::open(*audio, sound_dir);
    let store = FileHighScoreStore::new(high_score_file);
    let driver = GameDriver::with_seed(config, seed, audio, store)
        .context("Failed to start game session")?;

    let mut app = PlayApp::new(driver, *fps);
    Runtime::new()
        .report_key_releases(true)
        .run(&mut app)
        .context("Terminal session failed")?;

    let snapshot = app.snapshot();
    println!(
        "score: {}  high score: {}  level: {}  lines: {}",
        snapshot.score, snapshot.high_score, snapshot.level, snapshot.lines
    );
    println!("seed: {seed}");
    if let Some(err) = app.take_save_error() {
        eprintln!("warning: {:#}", anyhow::Error::from(err));
    }
    Ok(())
}
