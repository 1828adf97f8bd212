//! Writing styles: the closed set of voices a narrative can be written in.
//!
//! Each style maps to exactly one instruction clause. The lookup is an
//! exhaustive `match`, so adding a style fails to build until it has a clause.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::narrative::prompts::{
    EMOTIONAL_CLAUSE, POETIC_CLAUSE, PROFESSIONAL_CLAUSE, SIMPLE_CLAUSE,
};
use crate::narrative::PromptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Emotional,
    Professional,
    Simple,
    Poetic,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Emotional,
        Style::Professional,
        Style::Simple,
        Style::Poetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Emotional => "emotional",
            Style::Professional => "professional",
            Style::Simple => "simple",
            Style::Poetic => "poetic",
        }
    }

    /// Instruction clause inserted after the prompt preamble.
    pub fn clause(self) -> &'static str {
        match self {
            Style::Emotional => EMOTIONAL_CLAUSE,
            Style::Professional => PROFESSIONAL_CLAUSE,
            Style::Simple => SIMPLE_CLAUSE,
            Style::Poetic => POETIC_CLAUSE,
        }
    }

    /// Short description shown next to the style picker.
    pub fn tagline(self) -> &'static str {
        match self {
            Style::Emotional => "Heartfelt & expressive",
            Style::Professional => "Polished & formal",
            Style::Simple => "Clear & easy to read",
            Style::Poetic => "Lyrical & artistic",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| PromptError::InvalidStyle(s.to_string()))
    }
}
