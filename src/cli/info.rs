use anyhow::{Context, Result};
use std::path::PathBuf;

use aja_tools::logfile::LogfileReader;
use aja_tools::timeline::{source_of, ChannelKind};

use super::config::Config;

/// Display information about a logfile
pub fn run(log: PathBuf, config: &Config) -> Result<()> {
    if !log.exists() {
        anyhow::bail!("File does not exist: {}", log.display());
    }

    let timeline = LogfileReader::with_options(config.load_options())
        .load(&log)
        .with_context(|| format!("Failed to load logfile {}", log.display()))?;

    println!("AJA Logfile Information");
    println!("=======================");
    println!("File: {}", log.display());
    println!();

    println!("Samples: {}", timeline.len());
    if let Some((start, end)) = timeline.time_span() {
        println!("  Start: {}", start);
        println!("  End:   {}", end);
        println!("  Duration: {:.0} s", timeline.seconds_between(0, timeline.len() - 1));
    }
    println!();

    let active = timeline.active_channels();
    println!("Channels ({} of {} active):", active.len(), timeline.channels().len());
    for (id, name) in timeline.channels().iter() {
        let marker = if active.contains(&id) { "*" } else { " " };
        let source = source_of(name).unwrap_or("-");
        println!(
            "  {} {:3}. {:<24} {:<22} {}",
            marker,
            id.index() + 1,
            name,
            ChannelKind::classify(name),
            source
        );
    }

    let mut sources: Vec<&str> = active
        .iter()
        .filter_map(|&id| source_of(timeline.channels().name(id)))
        .collect();
    sources.sort_unstable();
    sources.dedup();
    if !sources.is_empty() {
        println!();
        println!("Active sources: {}", sources.join(", "));
    }

    Ok(())
}
