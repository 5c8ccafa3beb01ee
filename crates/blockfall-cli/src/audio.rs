//! Audio sinks selectable from the command line.

use std::{
    io::{self, Write},
    path::Path,
};

use blockfall_engine::{AudioCue, AudioSink, NullAudio};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum AudioMode {
    /// No sound
    #[default]
    None,
    /// Terminal bell on line clears and game over
    Bell,
    /// WAV playback (requires the `sound` feature)
    Sound,
}

/// Opens the sink for `mode`. Sound that cannot be set up degrades to
/// silence with a warning.
pub(crate) fn open(mode: AudioMode, sound_dir: &Path) -> Box<dyn AudioSink> {
    match mode {
        AudioMode::None => Box::new(NullAudio),
        AudioMode::Bell => Box::new(BellAudio::new(io::stderr())),
        AudioMode::Sound => open_sound(sound_dir),
    }
}

#[cfg(feature = "sound")]
fn open_sound(sound_dir: &Path) -> Box<dyn AudioSink> {
    match rodio_audio::RodioAudio::load(sound_dir) {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            eprintln!("warning: audio disabled: {err:#}");
            Box::new(NullAudio)
        }
    }
}

#[cfg(not(feature = "sound"))]
fn open_sound(_sound_dir: &Path) -> Box<dyn AudioSink> {
    eprintln!("warning: audio disabled: built without the `sound` feature");
    Box::new(NullAudio)
}

/// Rings the terminal bell for every cue.
#[derive(Debug)]
pub(crate) struct BellAudio<W> {
    out: W,
}

impl<W: Write> BellAudio<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, _cue: AudioCue) {
        // A lost bell is not worth interrupting the game for.
        let _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
    }
}

#[cfg(feature = "sound")]
mod rodio_audio {
    use std::{fs, io::Cursor, path::Path, sync::Arc};

    use anyhow::Context as _;
    use blockfall_engine::{AudioCue, AudioSink};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    const LINE_CLEAR_FILE: &str = "line_clear.wav";
    const GAME_OVER_FILE: &str = "game_over.wav";

    pub(super) struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        line_clear: Arc<[u8]>,
        game_over: Arc<[u8]>,
    }

    impl RodioAudio {
        pub(super) fn load(sound_dir: &Path) -> anyhow::Result<Self> {
            let read = |name: &str| -> anyhow::Result<Arc<[u8]>> {
                let path = sound_dir.join(name);
                let bytes = fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(bytes.into())
            };
            let line_clear = read(LINE_CLEAR_FILE)?;
            let game_over = read(GAME_OVER_FILE)?;
            let (stream, handle) =
                OutputStream::try_default().context("No audio output device")?;
            Ok(Self {
                _stream: stream,
                handle,
                line_clear,
                game_over,
            })
        }
    }

    impl AudioSink for RodioAudio {
        fn play(&mut self, cue: AudioCue) {
            let bytes = match cue {
                AudioCue::LineClear => &self.line_clear,
                AudioCue::GameOver => &self.game_over,
            };
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            let Ok(source) = Decoder::new(Cursor::new(Arc::clone(bytes))) else {
                return;
            };
            sink.append(source);
            sink.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_rings_once_per_cue() {
        let mut audio = BellAudio::new(Vec::new());
        audio.play(AudioCue::LineClear);
        audio.play(AudioCue::GameOver);
        assert_eq!(audio.out, b"\x07\x07");
    }

    #[test]
    fn test_missing_sound_files_fall_back_to_silence() {
        let dir = std::env::temp_dir().join("blockfall-no-such-sound-dir");
        let mut audio = open(AudioMode::Sound, &dir);
        audio.play(AudioCue::LineClear);
    }
}
