use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{JobRecord, RawPosting};

/// Map one provider record to the slim shape the rest of the pipeline uses.
/// A publication date that fails to parse is fatal; no partial records.
pub fn transform(raw: &RawPosting) -> Result<JobRecord> {
    let posted = parse_publication_date(&raw.publication_date).with_context(|| {
        format!(
            "Bad publication date '{}' for '{}'",
            raw.publication_date, raw.title
        )
    })?;

    Ok(JobRecord {
        title: raw.title.clone(),
        company: raw.company_name.clone(),
        location: raw.candidate_required_location.clone(),
        posted,
        url: raw.url.clone(),
    })
}

// The feed sends ISO date-times; a bare date shows up occasionally.
fn parse_publication_date(value: &str) -> Result<NaiveDate> {
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Ok(datetime.date());
    }
    Ok(value.parse::<NaiveDate>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(publication_date: &str) -> RawPosting {
        RawPosting {
            title: "Senior Data Engineer".to_string(),
            company_name: "Snowflake".to_string(),
            candidate_required_location: "Remote - Worldwide".to_string(),
            publication_date: publication_date.to_string(),
            url: "https://example.com/job/42".to_string(),
        }
    }

    #[test]
    fn test_transform_maps_all_fields() {
        let record = transform(&raw("2024-03-01T09:15:00")).unwrap();
        assert_eq!(record.title, "Senior Data Engineer");
        assert_eq!(record.company, "Snowflake");
        assert_eq!(record.location, "Remote - Worldwide");
        assert_eq!(record.posted, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(record.url, "https://example.com/job/42");
    }

    #[test]
    fn test_transform_accepts_bare_date() {
        let record = transform(&raw("2024-03-01")).unwrap();
        assert_eq!(record.posted, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_transform_rejects_garbage_date() {
        let err = transform(&raw("last tuesday")).unwrap_err();
        assert!(err.to_string().contains("last tuesday"));
    }
}
