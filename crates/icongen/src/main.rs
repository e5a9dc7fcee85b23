use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use icongen_extract::{IconRecord, ProviderStatus};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

/// Output file, written into the current working directory and fully
/// overwritten on each successful run.
const OUTPUT_FILE: &str = "icons.json";

/// Extract all icon classes from the installed diagrams Python library
/// and save their metadata to icons.json.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();

    // Initialize structured logging. Output goes to stderr so the progress
    // report on stdout stays clean. Default to warn, RUST_LOG overrides.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    println!("Extracting icons from diagrams library...\n");

    let library_root = icongen_extract::locate_library()?;
    let icons =
        icongen_extract::extract(&library_root, &mut |outcome| {
            match outcome.status {
                ProviderStatus::Extracted(count) => {
                    println!("✓ {}: {count} icons", outcome.provider);
                }
                ProviderStatus::Skipped => {
                    println!("⊘ {}: skipped", outcome.provider);
                }
            }
        })?;

    // The output file is only touched once extraction has fully succeeded,
    // so a failed run leaves any previous icons.json intact.
    let file = File::create(OUTPUT_FILE)
        .with_context(|| format!("failed to create {OUTPUT_FILE}"))?;
    let mut writer = BufWriter::new(file);
    icongen_extract::write_icons(&icons, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {OUTPUT_FILE}"))?;

    println!("\n✓ Extracted {} total icons", icons.len());
    println!("\nBy provider:");
    for (provider, count) in breakdown(&icons) {
        println!("  {provider}: {count}");
    }

    Ok(())
}

/// Per-provider record counts, sorted by provider name.
fn breakdown(icons: &[IconRecord]) -> BTreeMap<&str, usize> {
    icons
        .iter()
        .map(|icon| icon.provider.as_str())
        .counts()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(provider: &str, name: &str) -> IconRecord {
        IconRecord {
            name: name.to_string(),
            import_path: format!("diagrams.{provider}.x.{name}"),
            docstring: String::new(),
            provider: provider.to_string(),
            module: format!("{provider}/x.py"),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn test_breakdown_counts_per_provider_sorted() {
        let icons = vec![
            record("gcp", "GKE"),
            record("aws", "EC2"),
            record("aws", "S3"),
        ];

        let counts: Vec<(&str, usize)> =
            breakdown(&icons).into_iter().collect();
        assert_eq!(counts, vec![("aws", 2), ("gcp", 1)]);
    }
}
