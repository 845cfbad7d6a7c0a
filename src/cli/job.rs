use anyhow::{Context, Result};
use std::path::PathBuf;

use aja_tools::job::{recipe_steps_from_folder, Job};

/// List the recipe steps of a job file
pub fn run(job: PathBuf, recipe_dir: Option<PathBuf>) -> Result<()> {
    let steps = match &recipe_dir {
        Some(dir) => recipe_steps_from_folder(&job, dir)
            .with_context(|| format!("Failed to match recipes from {}", dir.display()))?,
        None => Job::from_file(&job)
            .with_context(|| format!("Failed to parse job {}", job.display()))?
            .recipe_steps()
            .to_vec(),
    };

    println!("Job: {}", job.display());
    for (i, step) in steps.iter().enumerate() {
        println!("  {:3}. {}", i + 1, step);
    }
    if steps.is_empty() {
        println!("  (no recipe steps found)");
    }
    Ok(())
}
