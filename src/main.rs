mod fetch;
mod filter;
mod layoffs;
mod models;
mod ratings;
mod transform;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use filter::JobFilter;
use layoffs::LayoffsTable;
use models::{EnrichedJob, FlaggedJob, JobRecord};
use ratings::{GlassdoorApi, RatingsCache};

#[derive(Parser)]
#[command(name = "role-radar")]
#[command(about = "Fetch, filter, and enrich remote data engineering postings")]
struct Cli {
    /// Write the output JSON to FILE instead of printing to stdout
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::blocking::Client::new();

    let raw = fetch::fetch_jobs(&client)?;
    let transformed = raw
        .iter()
        .map(transform::transform)
        .collect::<Result<Vec<JobRecord>>>()?;

    let job_filter = JobFilter::new()?;
    let filtered = job_filter.apply(transformed);

    let layoffs_table = LayoffsTable::load(&client, Path::new(layoffs::CACHE_FILE))?;
    if layoffs_table.columns().company.is_none() {
        eprintln!("Note: no company column detected in the layoffs dataset; all layoff flags will be 0");
    }
    let flagged: Vec<FlaggedJob> = filtered
        .into_iter()
        .map(|job| layoffs_table.enrich(job))
        .collect();

    let mut ratings_cache = RatingsCache::load(Path::new(ratings::CACHE_FILE))?;
    let rating_source = GlassdoorApi::new(client);
    let mut enriched: Vec<EnrichedJob> = Vec::with_capacity(flagged.len());
    for job in flagged {
        enriched.push(ratings_cache.enrich(job, &rating_source)?);
    }

    eprintln!("Raw: {} | After filter: {}", raw.len(), enriched.len());

    let json = serde_json::to_string_pretty(&enriched)?;
    match cli.save {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} jobs to {}", enriched.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
