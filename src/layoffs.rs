use std::fs;
use std::path::Path;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use crate::models::{FlaggedJob, JobRecord};

const DATASET_URL: &str =
    "https://raw.githubusercontent.com/layoffs-tracker/layoffs-tracker/main/data/layoffs.csv";
pub const CACHE_FILE: &str = ".cache_layoffs.csv";
const CACHE_MAX_AGE: StdDuration = StdDuration::from_secs(24 * 60 * 60);
const DOWNLOAD_TIMEOUT: StdDuration = StdDuration::from_secs(30);
const LOOKBACK_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct LayoffEvent {
    pub company: String,
    pub date: Option<NaiveDate>,
}

/// Which header positions were recognized in the feed. The feed's schema is not
/// fixed, so both columns are found by substring match and either can be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub company: Option<usize>,
    pub date: Option<usize>,
}

pub fn infer_columns(headers: &[String]) -> ColumnMap {
    let date = headers
        .iter()
        .position(|h| h.contains("date") || h.contains("reported") || h.contains("announced"));
    let company = headers.iter().position(|h| h.contains("company"));
    ColumnMap { company, date }
}

/// The layoffs dataset, normalized and held in memory for the whole run.
pub struct LayoffsTable {
    events: Vec<LayoffEvent>,
    columns: ColumnMap,
}

impl LayoffsTable {
    /// Read the on-disk table if it is younger than the freshness window,
    /// otherwise download the feed, normalize it, and rewrite the cache.
    /// A download failure on an expired cache is fatal; there is no fallback
    /// to the stale copy.
    pub fn load(client: &reqwest::blocking::Client, cache_path: &Path) -> Result<Self> {
        if is_fresh(cache_path) {
            let text = fs::read_to_string(cache_path)
                .with_context(|| format!("Failed to read {}", cache_path.display()))?;
            return Self::from_csv(&text);
        }

        let text = client
            .get(DATASET_URL)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .context("Failed to download the layoffs dataset")?
            .error_for_status()
            .context("Layoffs dataset request returned an error status")?
            .text()
            .context("Failed to read the layoffs dataset body")?;

        let table = Self::from_csv(&text)?;
        table.write_cache(cache_path)?;
        Ok(table)
    }

    /// Parse CSV text into normalized events. Header names are case-folded and
    /// trimmed before column detection. A missing company column degrades to
    /// empty-string companies (which never match a posting); a missing date
    /// column degrades to a sentinel far in the past.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("Layoffs CSV has no header row")?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let columns = infer_columns(&headers);

        let mut events = Vec::new();
        for record in reader.records() {
            let record = record.context("Malformed row in layoffs CSV")?;

            let company = columns
                .company
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string();

            let date = match columns.date {
                Some(i) => record.get(i).and_then(parse_event_date),
                None => Some(sentinel_date()),
            };

            events.push(LayoffEvent { company, date });
        }

        Ok(Self { events, columns })
    }

    pub fn columns(&self) -> ColumnMap {
        self.columns
    }

    /// True if any event matches the company (case-insensitive, exact) and is
    /// dated on or after `since`. Undated events never match.
    pub fn had_layoffs_since(&self, company: &str, since: NaiveDate) -> bool {
        self.events.iter().any(|event| {
            event.company.eq_ignore_ascii_case(company)
                && event.date.is_some_and(|date| date >= since)
        })
    }

    /// Return a copy of the job with the 12-month layoffs flag appended.
    pub fn enrich(&self, job: JobRecord) -> FlaggedJob {
        let since = (Utc::now() - Duration::days(LOOKBACK_DAYS)).date_naive();
        let layoffs_12mo = self.had_layoffs_since(&job.company, since) as u8;
        FlaggedJob {
            record: job,
            layoffs_12mo,
        }
    }

    fn write_cache(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        writer.write_record(["company", "date"])?;
        for event in &self.events {
            let date = event.date.map(|d| d.to_string()).unwrap_or_default();
            writer.write_record([event.company.as_str(), date.as_str()])?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn is_fresh(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match modified.elapsed() {
        Ok(age) => age < CACHE_MAX_AGE,
        // An mtime in the future counts as fresh.
        Err(_) => true,
    }
}

fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

// The feed's dates are mostly ISO, but older rows drift.
fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = value.parse::<NaiveDate>() {
        return Some(date);
    }
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Some(datetime.date());
    }
    for format in ["%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}
