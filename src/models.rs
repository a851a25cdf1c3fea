use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One posting as the search API returns it. Extra provider fields are ignored;
/// a missing field here is a hard error when the response is parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPosting {
    pub title: String,
    pub company_name: String,
    pub candidate_required_location: String,
    pub publication_date: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted: NaiveDate,
    pub url: String,
}

/// A JobRecord with the layoffs flag appended.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedJob {
    #[serde(flatten)]
    pub record: JobRecord,
    pub layoffs_12mo: u8, // 0 or 1
}

/// A FlaggedJob with the employer rating appended. Final output shape.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedJob {
    #[serde(flatten)]
    pub record: FlaggedJob,
    pub glassdoor_rating: Option<f64>,
}
