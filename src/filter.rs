use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;

use crate::models::JobRecord;

// Companies we never want to see.
const BLOCKLIST: [&str; 2] = ["Amazon", "Meta"];

/// Baseline keep/drop rules, compiled once per run:
///   - title must mention both "data" and "engineer" in either order
///   - location must be remote/USA-wide, or San Diego
///   - company must not be blocklisted
pub struct JobFilter {
    title: Regex,
    remote_usa: Regex,
    san_diego: Regex,
    onsite_hybrid: Regex,
    blocklist: HashSet<&'static str>,
}

impl JobFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: Regex::new(r"(?i)data.*engineer|engineer.*data")?,
            remote_usa: Regex::new(r"(?i)remote|anywhere|worldwide|united\s*states|u\.s\.a?|usa")?,
            san_diego: Regex::new(r"(?i)san\s*diego")?,
            onsite_hybrid: Regex::new(r"(?i)onsite|on[-\s]?site|hybrid")?,
            blocklist: BLOCKLIST.iter().copied().collect(),
        })
    }

    /// Keep the matching records, preserving input order.
    pub fn apply(&self, jobs: Vec<JobRecord>) -> Vec<JobRecord> {
        jobs.into_iter().filter(|job| self.keep(job)).collect()
    }

    pub fn keep(&self, job: &JobRecord) -> bool {
        self.title_ok(&job.title) && self.location_ok(&job.location) && self.company_ok(&job.company)
    }

    fn title_ok(&self, title: &str) -> bool {
        self.title.is_match(title)
    }

    fn location_ok(&self, location: &str) -> bool {
        let location = location.trim();

        // Any remote / USA-wide keyword is an automatic yes.
        if self.remote_usa.is_match(location) {
            return true;
        }

        // Otherwise, keep only San Diego roles.
        if self.san_diego.is_match(location) {
            // Posts that name an onsite or hybrid mode are fine.
            if self.onsite_hybrid.is_match(location) {
                return true;
            }
            // Some posts just say "San Diego, CA" with no mode. Keep those too.
            return true;
        }

        false
    }

    fn company_ok(&self, company: &str) -> bool {
        !self.blocklist.contains(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn job(title: &str, location: &str, company: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            posted: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            url: "https://example.com/job".to_string(),
        }
    }

    #[test]
    fn test_title_requires_both_tokens() {
        let filter = JobFilter::new().unwrap();
        assert!(filter.title_ok("Senior Data Platform Engineer"));
        assert!(filter.title_ok("Engineer of Data Systems"));
        assert!(filter.title_ok("DATA ENGINEER"));
        assert!(!filter.title_ok("Backend Engineer"));
        assert!(!filter.title_ok("Data Analyst"));
    }

    #[test]
    fn test_location_remote_and_usa_keywords() {
        let filter = JobFilter::new().unwrap();
        assert!(filter.location_ok("Remote - Worldwide"));
        assert!(filter.location_ok("Anywhere"));
        assert!(filter.location_ok("United States"));
        assert!(filter.location_ok("U.S. only"));
        assert!(filter.location_ok("USA"));
        assert!(!filter.location_ok("Austin, TX"));
        assert!(!filter.location_ok("Berlin, Germany"));
    }

    #[test]
    fn test_location_san_diego_with_or_without_mode() {
        let filter = JobFilter::new().unwrap();
        assert!(filter.location_ok("San Diego, CA (Hybrid)"));
        assert!(filter.location_ok("San Diego, CA - Onsite"));
        assert!(filter.location_ok("San Diego, CA"));
        assert!(filter.location_ok("SanDiego"));
    }

    #[test]
    fn test_blocklisted_companies_are_dropped() {
        let filter = JobFilter::new().unwrap();
        assert!(!filter.keep(&job("Data Engineer", "Remote", "Amazon")));
        assert!(!filter.keep(&job("Data Engineer", "Remote", "Meta")));
        assert!(filter.keep(&job("Data Engineer", "Remote", "Snowflake")));
    }

    #[test]
    fn test_apply_preserves_input_order() {
        let filter = JobFilter::new().unwrap();
        let jobs = vec![
            job("Data Engineer", "Remote", "Alpha"),
            job("Backend Engineer", "Remote", "Beta"),
            job("Staff Data Engineer", "San Diego, CA", "Gamma"),
            job("Data Engineer", "Austin, TX", "Delta"),
            job("Data Infrastructure Engineer", "USA", "Epsilon"),
        ];

        let kept = filter.apply(jobs);
        let companies: Vec<&str> = kept.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, vec!["Alpha", "Gamma", "Epsilon"]);
    }
}
