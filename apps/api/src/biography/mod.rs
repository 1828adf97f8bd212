// Biography records: CRUD handlers plus the derived views the builder shows
// (section progress and the life timeline).

pub mod handlers;
pub mod progress;
pub mod timeline;
