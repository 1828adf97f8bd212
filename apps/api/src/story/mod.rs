// Generated stories: saved explicitly after a successful generation, never edited.

pub mod handlers;
