use anyhow::{Context, Result};
use std::path::PathBuf;

use aja_tools::job::{annotate_layers, Job};
use aja_tools::logfile::LogfileReader;

use super::config::Config;
use super::OutputFormat;

/// Split a logfile into layers named after the job's steps
pub fn run(log: PathBuf, job: PathBuf, format: OutputFormat, config: &Config) -> Result<()> {
    let timeline = LogfileReader::with_options(config.load_options())
        .load(&log)
        .with_context(|| format!("Failed to load logfile {}", log.display()))?;
    let job = Job::from_file(&job).with_context(|| format!("Failed to parse job {}", job.display()))?;
    let spans = annotate_layers(&timeline, &job).context("Failed to annotate layers")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&spans)?),
        OutputFormat::Csv => anyhow::bail!("CSV output is only available for align"),
        OutputFormat::Text => {
            println!("Job: {} ({} steps)", job.name, job.recipe_steps().len());
            for span in &spans {
                let layer = span.layer.map_or_else(|| "-".to_string(), |l| l.to_string());
                println!(
                    "  {} .. {}  layer {:>3}  {}",
                    span.start,
                    span.end,
                    layer,
                    span.step.as_deref().unwrap_or("?")
                );
            }
        }
    }
    Ok(())
}
