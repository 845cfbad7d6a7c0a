use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use aja_tools::job::{recipe_names_in_dir, JobCatalog};
use aja_tools::logfile::{recipe_frequencies, LogIndex};

use super::OutputFormat;

/// Index every logfile below a folder
pub fn run(
    dir: PathBuf,
    jobs: Option<PathBuf>,
    recipe_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let jobs = match &jobs {
        Some(jobs_dir) => JobCatalog::from_dir(jobs_dir)
            .with_context(|| format!("Failed to read jobs from {}", jobs_dir.display()))?,
        None => JobCatalog::new(),
    };
    info!("Loaded {} jobs", jobs.len());

    let index = LogIndex::build(&dir, &jobs)
        .with_context(|| format!("Failed to index {}", dir.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&index)?),
        OutputFormat::Csv => anyhow::bail!("CSV output is only available for align"),
        OutputFormat::Text => {
            println!("{} logfiles in {}", index.len(), dir.display());
            for entry in &index.entries {
                let steps = match &entry.recipe {
                    Some(steps) => steps.get(1..).unwrap_or_default().join(", "),
                    None => "(job not found)".to_string(),
                };
                println!("  {}  {:<24} {}", entry.started, entry.job, steps);
            }
        }
    }

    if let Some(recipe_dir) = recipe_dir {
        let names = recipe_names_in_dir(&recipe_dir)
            .with_context(|| format!("Failed to list recipes in {}", recipe_dir.display()))?;
        println!();
        println!("Recipe usage:");
        for (name, count) in recipe_frequencies(&names, &index.entries) {
            println!("  {:>5}  {}", count, name);
        }
    }
    Ok(())
}
