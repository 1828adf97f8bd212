use serde::{Deserialize, Serialize};

use crate::models::biography::{BiographyRecord, Section};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Partial,
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section: Section,
    pub title: String,
    pub filled: usize,
    pub total: usize,
    pub ratio: f64,
    pub status: SectionStatus,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub overall_ratio: f64,
    pub sections: Vec<SectionProgress>,
    pub empty_sections: Vec<Section>,
}

/// How much of each guided section has been filled in. Whitespace-only
/// values count as empty.
pub fn compute_progress_report(record: &BiographyRecord) -> ProgressReport {
    let mut sections = Vec::with_capacity(Section::ALL.len());
    let mut filled_total = 0;
    let mut field_total = 0;
    let mut empty_sections = Vec::new();

    for section in Section::ALL {
        let fields = record.section_fields(section);
        let total = fields.len();
        let missing_fields: Vec<String> = fields
            .iter()
            .filter(|f| !f.is_filled())
            .map(|f| f.key.to_string())
            .collect();
        let filled = total - missing_fields.len();

        let status = match filled {
            0 => SectionStatus::Empty,
            n if n == total => SectionStatus::Complete,
            _ => SectionStatus::Partial,
        };
        if status == SectionStatus::Empty {
            empty_sections.push(section);
        }

        filled_total += filled;
        field_total += total;
        sections.push(SectionProgress {
            section,
            title: section.title().to_string(),
            filled,
            total,
            ratio: filled as f64 / total as f64,
            status,
            missing_fields,
        });
    }

    ProgressReport {
        overall_ratio: filled_total as f64 / field_total as f64,
        sections,
        empty_sections,
    }
}
