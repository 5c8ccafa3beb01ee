use clap::{Parser, Subcommand};

use self::{play::PlayArg, show_config::ShowConfigArg};

mod play;
mod show_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the effective game configuration as JSON
    ShowConfig(#[clap(flatten)] ShowConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::ShowConfig(arg) => show_config::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_play_options() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--fps",
            "30",
            "--audio",
            "bell",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(arg.fps, 30);
        assert_eq!(
            arg.seed.map(|seed| seed.to_string()).as_deref(),
            Some("000102030405060708090a0b0c0d0e0f")
        );
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        assert!(CommandArgs::try_parse_from(["blockfall", "play", "--seed", "xyz"]).is_err());
    }
}
