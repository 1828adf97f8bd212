// Fixed persona for every generation request.
// Prompt text specific to narratives lives in narrative::prompts.

/// System message that fixes the assistant persona.
pub const AUTOBIOGRAPHER_SYSTEM: &str = "You are an expert autobiography writer \
    who creates compelling, well-structured life stories.";
