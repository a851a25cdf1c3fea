use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use slug::slugify;

use crate::models::{EnrichedJob, FlaggedJob};

const RATINGS_API: &str = "https://rugg.ai/api/glassdoor";
pub const CACHE_FILE: &str = ".cache_glassdoor.json";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// One rating query for one name candidate. A hit is `Ok(Some(..))`; a clean
/// miss is `Ok(None)`. Transport or parse trouble is `Err`, which the caller
/// treats the same as a miss.
pub trait RatingSource {
    fn rating(&self, candidate: &str) -> Result<Option<f64>>;
}

pub struct GlassdoorApi {
    client: reqwest::blocking::Client,
}

impl GlassdoorApi {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct RatingResponse {
    #[serde(default)]
    rating: Option<f64>,
}

impl RatingSource for GlassdoorApi {
    fn rating(&self, candidate: &str) -> Result<Option<f64>> {
        let response = self
            .client
            .get(RATINGS_API)
            .query(&[("company", candidate)])
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .context("Rating lookup request failed")?;

        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }

        let body: RatingResponse = response
            .json()
            .context("Failed to parse rating response")?;

        // A zero rating means the provider had nothing for this name.
        Ok(body.rating.filter(|rating| *rating != 0.0))
    }
}

/// Name variants to try against the ratings endpoint, in order, deduplicated.
/// e.g. "Snowflake Inc." -> Snowflake Inc. / Snowflake / snowflake-inc / snowflake
pub fn candidates(company: &str) -> Vec<String> {
    let inc_stripped = company.replace("Inc.", "").replace("Inc", "").trim().to_string();
    let first_word = company.split_whitespace().next().unwrap_or(company);

    let variants = [
        company.to_string(),
        company.replace(',', ""),
        inc_stripped,
        slugify(company),
        slugify(first_word),
    ];

    let mut ordered = Vec::new();
    for variant in variants {
        if !variant.is_empty() && !ordered.contains(&variant) {
            ordered.push(variant);
        }
    }
    ordered
}

/// Persistent company -> rating map. Entries never expire; a `None` entry is a
/// failed lookup that will not be retried. The whole map is rewritten to disk
/// after every lookup that was not already cached.
pub struct RatingsCache {
    path: PathBuf,
    entries: HashMap<String, Option<f64>>,
}

impl RatingsCache {
    pub fn load(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string(&self.entries)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// A cached entry (including a permanent miss) is returned without touching
    /// the source. Otherwise each candidate is tried in order; the first hit
    /// wins, per-candidate failures are swallowed, and a total miss is cached
    /// as `None`.
    pub fn rating_for(&mut self, company: &str, source: &dyn RatingSource) -> Result<Option<f64>> {
        if let Some(cached) = self.entries.get(company) {
            return Ok(*cached);
        }

        let mut found = None;
        for candidate in candidates(company) {
            if let Ok(Some(rating)) = source.rating(&candidate) {
                found = Some(rating);
                break;
            }
        }

        self.entries.insert(company.to_string(), found);
        self.save()?;
        Ok(found)
    }

    /// Return a copy of the job with the employer rating appended.
    pub fn enrich(&mut self, job: FlaggedJob, source: &dyn RatingSource) -> Result<EnrichedJob> {
        let glassdoor_rating = self.rating_for(&job.record.company, source)?;
        Ok(EnrichedJob {
            record: job,
            glassdoor_rating,
        })
    }
}
