use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::RawPosting;

const SEARCH_API: &str = "https://remotive.com/api/remote-jobs";
const SEARCH_TERM: &str = "data engineer";
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs: Vec<RawPosting>,
}

/// Pull the current postings for the search term. One page, no retry; any
/// transport or status failure aborts the run.
pub fn fetch_jobs(client: &reqwest::blocking::Client) -> Result<Vec<RawPosting>> {
    let response = client
        .get(SEARCH_API)
        .query(&[("search", SEARCH_TERM)])
        .timeout(FETCH_TIMEOUT)
        .send()
        .context("Failed to reach the job search API")?
        .error_for_status()
        .context("Job search API returned an error status")?;

    let body: SearchResponse = response
        .json()
        .context("Failed to parse job search response")?;

    Ok(body.jobs)
}
