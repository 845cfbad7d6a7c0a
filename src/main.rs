//! # aja-tools
//!
//! Command-line front end for AJA sputter logfiles.
//!
//! ```bash
//! # Channels, time span and active sources of a log
//! aja-tools info Metals_03012017_090000.dlg
//!
//! # Which recipe steps ran when
//! aja-tools align Metals_03012017_090000.dlg --recipes recipes.toml
//!
//! # Steps of a job, and the logged layers named after them
//! aja-tools job Metals.ajp
//! aja-tools layers Metals_03012017_090000.dlg Metals.ajp
//!
//! # Every log in a folder, newest first
//! aja-tools index logs/ --jobs jobs/
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
