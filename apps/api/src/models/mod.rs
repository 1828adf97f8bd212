pub mod biography;
pub mod story;
