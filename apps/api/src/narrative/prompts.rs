// All prompt text for narrative generation.
// The persona system message lives in llm_client::prompts since it is fixed
// request policy, not part of the compiled prompt.

/// Role-setting preamble. The style clause follows on the same line.
pub const PROMPT_PREAMBLE: &str = "You are a skilled autobiography writer. \
    Create a compelling, well-structured autobiography based on the following information.";

pub const EMOTIONAL_CLAUSE: &str = "Write in a deeply emotional and heartfelt tone, \
    focusing on feelings, emotions, and personal connections. \
    Use vivid imagery and expressive language.";

pub const PROFESSIONAL_CLAUSE: &str = "Write in a professional, polished tone \
    suitable for formal publication. \
    Use clear, articulate language while maintaining authenticity.";

pub const SIMPLE_CLAUSE: &str = "Write in a simple, straightforward manner \
    that is easy to read and understand. \
    Use clear, conversational language.";

pub const POETIC_CLAUSE: &str = "Write in a poetic, lyrical style with beautiful imagery, \
    metaphors, and artistic expression. \
    Create a flowing, literary narrative.";

/// Closing instruction: target length and chaptered structure.
pub const PROMPT_CLOSING: &str = "Write a comprehensive, engaging autobiography \
    (approximately 2000-3000 words) that weaves these elements together into a \
    cohesive narrative. Include proper chapters and structure.";
