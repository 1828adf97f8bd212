//! Prompt compiler: turns a biography record and a style into the single
//! prompt sent to the generation service.
//!
//! Pure and deterministic: no I/O, no randomness, and the prompt shape never
//! depends on how much of the record is filled in. Every section heading and
//! field label is always emitted; empty fields render as an empty value.
//! Field values are interpolated verbatim.

use crate::models::biography::{BiographyRecord, Section};
use crate::narrative::prompts::{PROMPT_CLOSING, PROMPT_PREAMBLE};
use crate::narrative::style::Style;
use crate::narrative::PromptError;

pub fn compile_prompt(record: &BiographyRecord, style: Style) -> String {
    let mut prompt = format!("{PROMPT_PREAMBLE} {}\n", style.clause());

    for section in Section::ALL {
        prompt.push_str(&format!("\n{}:\n", section.title()));
        for field in record.section_fields(section) {
            prompt.push_str(&format!("- {}: {}\n", field.label, field.value));
        }
    }

    prompt.push('\n');
    prompt.push_str(PROMPT_CLOSING);
    prompt
}

/// Parses `style` before compiling. An unrecognized style is an error, never
/// a prompt without a style clause.
pub fn compile_prompt_str(record: &BiographyRecord, style: &str) -> Result<String, PromptError> {
    let style = style.parse::<Style>()?;
    Ok(compile_prompt(record, style))
}
