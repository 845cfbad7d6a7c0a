use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod align;
mod index;
mod info;
mod job;
mod layers;

mod config;
mod profile;

pub use profile::Profile;

/// aja-tools - AJA sputter logfile loader and recipe aligner
#[derive(Parser)]
#[command(name = "aja-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Alignment tolerance profile.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ProfileArg {
    /// Every sample must be in range
    Strict,
    /// Bridge short glitches
    #[default]
    Balanced,
    /// Noisy sources or slow logging
    Lenient,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Strict => Profile::Strict,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::Lenient => Profile::Lenient,
        }
    }
}

/// How results are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// One CSV row per interval
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Display channels and time span of a logfile
    Info {
        /// Input logfile path
        #[arg(value_name = "LOG")]
        log: PathBuf,
    },

    /// Match logfile intervals to recipe steps
    Align {
        /// Input logfile path
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Recipe catalog (TOML)
        #[arg(short = 'r', long, value_name = "FILE")]
        recipes: PathBuf,

        /// Only align these recipes (repeatable)
        #[arg(short = 's', long = "select", value_name = "NAME")]
        select: Vec<String>,

        /// Tolerance profile (strict, balanced, lenient)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        // === Advanced tuning flags (hidden from --help) ===
        /// Out-of-range samples bridged inside a match
        #[arg(long, hide = true)]
        dropout_tolerance: Option<usize>,

        /// Fraction by which target ranges are widened
        #[arg(long, hide = true)]
        range_margin: Option<f64>,
    },

    /// List the recipe steps of a job file
    Job {
        /// Input job file path (.ajp)
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Recipe folder; match its .rcp names instead of parsing the layout
        #[arg(long, value_name = "DIR")]
        recipe_dir: Option<PathBuf>,
    },

    /// Split a logfile into layers named after the job's steps
    Layers {
        /// Input logfile path
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Job file the log was recorded with
        #[arg(value_name = "JOB")]
        job: PathBuf,

        /// Output format (text or json)
        #[arg(short = 'f', long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Index every logfile below a folder, newest first
    Index {
        /// Folder to scan for .dlg files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Folder to scan for .ajp job files
        #[arg(long, value_name = "DIR")]
        jobs: Option<PathBuf>,

        /// Recipe folder; count how often each of its recipes was run
        #[arg(long, value_name = "DIR")]
        recipe_dir: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short = 'f', long, default_value = "text", value_enum)]
        format: OutputFormat,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Info { log } => info::run(log, &config),
        Commands::Align {
            log,
            recipes,
            select,
            profile,
            format,
            output,
            dropout_tolerance,
            range_margin,
        } => align::run(
            align::AlignArgs {
                log,
                recipes,
                select,
                profile: Profile::from(profile),
                format,
                output,
                dropout_tolerance,
                range_margin,
            },
            &config,
        ),
        Commands::Job { job, recipe_dir } => job::run(job, recipe_dir),
        Commands::Layers { log, job, format } => layers::run(log, job, format, &config),
        Commands::Index {
            dir,
            jobs,
            recipe_dir,
            format,
        } => index::run(dir, jobs, recipe_dir, format),
    }
}
