//! Life timeline: a handful of dated milestones derived from a record.
//!
//! Years are anchored on the birth year with fixed offsets (childhood +5,
//! education +12, career +22). Without a readable date of birth the anchor
//! falls back to 2000 and no birth event is emitted.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::biography::BiographyRecord;

const FALLBACK_BIRTH_YEAR: i32 = 2000;
const DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub year: String,
    pub category: &'static str,
    pub title: &'static str,
    pub description: String,
}

pub fn build_timeline(record: &BiographyRecord) -> Vec<TimelineEvent> {
    let personal = &record.personal_info;
    let birth_year = parse_birth_year(&personal.date_of_birth);
    let anchor = birth_year.unwrap_or(FALLBACK_BIRTH_YEAR);
    let mut events = Vec::new();

    if let Some(year) = birth_year {
        events.push(TimelineEvent {
            year: year.to_string(),
            category: "Birth",
            title: "Born",
            description: format!("Born in {}", personal.birthplace),
        });
    }

    let milestones = [
        (
            Some(anchor + 5),
            "Childhood",
            "Childhood Years",
            &record.childhood_memories.significant_events,
        ),
        (
            Some(anchor + 12),
            "Education",
            "Education Journey",
            &record.education_journey.schools,
        ),
        (
            Some(anchor + 22),
            "Career",
            "Career Path",
            &record.career_achievements.career_path,
        ),
        (
            None,
            "Family",
            "Relationships & Family",
            &record.family_relationships.relationships,
        ),
        (
            None,
            "Goals",
            "Dreams & Future",
            &record.dreams_beliefs_goals.future_goals,
        ),
    ];

    for (year, category, title, source) in milestones {
        if source.trim().is_empty() {
            continue;
        }
        let year = match (year, category) {
            (Some(y), _) => y.to_string(),
            (None, "Goals") => "Future".to_string(),
            (None, _) => "Recent Years".to_string(),
        };
        events.push(TimelineEvent {
            year,
            category,
            title,
            description: summarize(source),
        });
    }

    events
}

/// Accepts `YYYY-MM-DD`, or anything that starts with a four-digit year.
fn parse_birth_year(date_of_birth: &str) -> Option<i32> {
    let date_of_birth = date_of_birth.trim();
    if let Ok(date) = NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d") {
        return Some(date.year());
    }
    let prefix = date_of_birth.get(..4)?;
    if prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

fn summarize(text: &str) -> String {
    let head: String = text.chars().take(DESCRIPTION_CHARS).collect();
    format!("{head}...")
}
