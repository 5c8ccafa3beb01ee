use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;

use crate::util;

#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct ShowConfigArg {
    /// Game configuration file (JSON) to merge over the defaults
    #[clap(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowConfigArg) -> anyhow::Result<()> {
    let config = util::load_config(arg.config.as_deref())?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &config)
        .context("Failed to write configuration to stdout")?;
    writeln!(stdout).context("Failed to write configuration to stdout")?;
    Ok(())
}
