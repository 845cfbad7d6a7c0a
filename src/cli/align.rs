use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use aja_tools::align::{align, align_selected, AlignConfig, AlignmentResult};
use aja_tools::logfile::LogfileReader;
use aja_tools::recipe::RecipeCatalog;

use super::config::Config;
use super::{OutputFormat, Profile};

/// Arguments of the align command
pub struct AlignArgs {
    pub log: PathBuf,
    pub recipes: PathBuf,
    pub select: Vec<String>,
    pub profile: Profile,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub dropout_tolerance: Option<usize>,
    pub range_margin: Option<f64>,
}

impl AlignArgs {
    /// Profile, then config file, then flags
    fn align_config(&self, config: &Config) -> AlignConfig {
        let mut align_config = config.align_config(self.profile.align_config());
        if let Some(samples) = self.dropout_tolerance {
            align_config.dropout_tolerance = samples;
        }
        if let Some(margin) = self.range_margin {
            align_config.range_margin = margin;
        }
        align_config
    }
}

/// Align a logfile against a recipe catalog
pub fn run(args: AlignArgs, config: &Config) -> Result<()> {
    let align_config = args.align_config(config);
    info!(
        "Aligning with profile {} (dropout tolerance {}, range margin {})",
        args.profile, align_config.dropout_tolerance, align_config.range_margin
    );

    let timeline = LogfileReader::with_options(config.load_options())
        .load(&args.log)
        .with_context(|| format!("Failed to load logfile {}", args.log.display()))?;
    let catalog = RecipeCatalog::from_file(&args.recipes)
        .with_context(|| format!("Failed to load recipes {}", args.recipes.display()))?;

    let result = if args.select.is_empty() {
        align(&timeline, &catalog, &align_config)
    } else {
        align_selected(&timeline, &catalog, &args.select, &align_config)
    }
    .context("Alignment failed")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_result(&result, args.format, BufWriter::new(file))?;
            info!("Wrote {}", path.display());
        }
        None => write_result(&result, args.format, io::stdout().lock())?,
    }
    Ok(())
}

fn write_result<W: Write>(result: &AlignmentResult, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            #[cfg(feature = "colorized_output")]
            {
                write!(writer, "{}", result.format_colored())?;
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                write!(writer, "{}", result)?;
            }
        }
        OutputFormat::Json => {
            result.write_json(&mut writer)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => result.write_csv(&mut writer)?,
    }
    writer.flush()?;
    Ok(())
}
