use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error("Unknown field '{field}' in section '{section}'")]
    UnknownField {
        section: &'static str,
        field: String,
    },
}

/// A single field of a section, viewed in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView<'a> {
    /// JSON key, also accepted by [`BiographyRecord::set_field`].
    pub key: &'static str,
    /// Human-readable label used in prompts and reports.
    pub label: &'static str,
    pub value: &'a str,
}

impl FieldView<'_> {
    pub fn is_filled(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

macro_rules! section {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $key:literal, $label:literal;)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl $name {
            pub fn fields(&self) -> Vec<FieldView<'_>> {
                vec![$(FieldView { key: $key, label: $label, value: &self.$field },)+]
            }

            pub fn field_mut(&mut self, key: &str) -> Option<&mut String> {
                match key {
                    $($key => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

section! {
    PersonalInfo {
        full_name => "full_name", "Name";
        date_of_birth => "date_of_birth", "Date of Birth";
        birthplace => "birthplace", "Birthplace";
        current_location => "current_location", "Current Location";
        background => "background", "Background";
    }
}

section! {
    ChildhoodMemories {
        early_memories => "early_memories", "Early Memories";
        family_dynamics => "family_dynamics", "Family Dynamics";
        significant_events => "significant_events", "Significant Events";
        favorite_activities => "favorite_activities", "Favorite Activities";
    }
}

section! {
    EducationJourney {
        schools => "schools", "Schools";
        favorite_subjects => "favorite_subjects", "Favorite Subjects";
        achievements => "achievements", "Achievements";
        challenges => "challenges", "Challenges";
        mentors => "mentors", "Mentors";
    }
}

section! {
    CareerAchievements {
        career_path => "career_path", "Career Path";
        major_accomplishments => "major_accomplishments", "Major Accomplishments";
        work_experiences => "work_experiences", "Work Experiences";
        skills => "skills", "Skills";
    }
}

section! {
    FamilyRelationships {
        family => "family", "Family";
        important_people => "important_people", "Important People";
        relationships => "relationships", "Relationships";
        legacy => "legacy", "Legacy";
    }
}

section! {
    LifeChallenges {
        obstacles => "obstacles", "Obstacles";
        lessons => "lessons", "Lessons";
        pivotal_moments => "pivotal_moments", "Pivotal Moments";
        growth => "growth", "Growth";
    }
}

section! {
    DreamsBeliefsGoals {
        beliefs => "beliefs", "Beliefs";
        values => "values", "Values";
        future_goals => "future_goals", "Future Goals";
        legacy => "legacy", "Legacy";
        wisdom => "wisdom", "Wisdom";
    }
}

/// The seven guided sections, in the order the builder walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInfo,
    ChildhoodMemories,
    EducationJourney,
    CareerAchievements,
    FamilyRelationships,
    LifeChallenges,
    DreamsBeliefsGoals,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::PersonalInfo,
        Section::ChildhoodMemories,
        Section::EducationJourney,
        Section::CareerAchievements,
        Section::FamilyRelationships,
        Section::LifeChallenges,
        Section::DreamsBeliefsGoals,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::PersonalInfo => "personal_info",
            Section::ChildhoodMemories => "childhood_memories",
            Section::EducationJourney => "education_journey",
            Section::CareerAchievements => "career_achievements",
            Section::FamilyRelationships => "family_relationships",
            Section::LifeChallenges => "life_challenges",
            Section::DreamsBeliefsGoals => "dreams_beliefs_goals",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::PersonalInfo => "Personal Information",
            Section::ChildhoodMemories => "Childhood Memories",
            Section::EducationJourney => "Education Journey",
            Section::CareerAchievements => "Career & Achievements",
            Section::FamilyRelationships => "Family & Relationships",
            Section::LifeChallenges => "Life Challenges",
            Section::DreamsBeliefsGoals => "Dreams, Beliefs & Goals",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| RecordError::UnknownSection(s.to_string()))
    }
}

/// A user's structured biographical data.
///
/// Every field is a free-form string defaulting to empty; missing keys in an
/// incoming document deserialize to the empty value. Saves are full-document
/// upserts, so there is no partial-merge logic here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiographyRecord {
    /// Assigned by the store on first persist.
    pub id: Option<Uuid>,
    pub owner_id: Uuid,
    pub personal_info: PersonalInfo,
    pub childhood_memories: ChildhoodMemories,
    pub education_journey: EducationJourney,
    pub career_achievements: CareerAchievements,
    pub family_relationships: FamilyRelationships,
    pub life_challenges: LifeChallenges,
    pub dreams_beliefs_goals: DreamsBeliefsGoals,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BiographyRecord {
    /// An empty, not-yet-persisted record owned by `owner_id`.
    #[cfg(test)]
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            ..Self::default()
        }
    }

    pub fn section_fields(&self, section: Section) -> Vec<FieldView<'_>> {
        match section {
            Section::PersonalInfo => self.personal_info.fields(),
            Section::ChildhoodMemories => self.childhood_memories.fields(),
            Section::EducationJourney => self.education_journey.fields(),
            Section::CareerAchievements => self.career_achievements.fields(),
            Section::FamilyRelationships => self.family_relationships.fields(),
            Section::LifeChallenges => self.life_challenges.fields(),
            Section::DreamsBeliefsGoals => self.dreams_beliefs_goals.fields(),
        }
    }

    /// Replaces field `field` within `section`.
    pub fn set_field(
        &mut self,
        section: Section,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), RecordError> {
        let slot = match section {
            Section::PersonalInfo => self.personal_info.field_mut(field),
            Section::ChildhoodMemories => self.childhood_memories.field_mut(field),
            Section::EducationJourney => self.education_journey.field_mut(field),
            Section::CareerAchievements => self.career_achievements.field_mut(field),
            Section::FamilyRelationships => self.family_relationships.field_mut(field),
            Section::LifeChallenges => self.life_challenges.field_mut(field),
            Section::DreamsBeliefsGoals => self.dreams_beliefs_goals.field_mut(field),
        };
        let slot = slot.ok_or_else(|| RecordError::UnknownField {
            section: section.key(),
            field: field.to_string(),
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Like [`set_field`](Self::set_field), but returns the updated record.
    pub fn with_field(
        mut self,
        section: Section,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Self, RecordError> {
        self.set_field(section, field, value)?;
        Ok(self)
    }

    pub fn default_story_title(&self) -> String {
        format!("{}'s Life Story", self.personal_info.full_name.trim())
    }
}

/// Row shape of the `biographies` table. The record body lives in `data` as JSONB;
/// identity and timestamps are authoritative in their own columns.
#[derive(Debug, Clone, FromRow)]
pub struct BiographyRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BiographyRow> for BiographyRecord {
    type Error = serde_json::Error;

    fn try_from(row: BiographyRow) -> Result<Self, Self::Error> {
        let mut record: BiographyRecord = serde_json::from_value(row.data)?;
        record.id = Some(row.id);
        record.owner_id = row.owner_id;
        record.created_at = Some(row.created_at);
        record.updated_at = Some(row.updated_at);
        Ok(record)
    }
}
