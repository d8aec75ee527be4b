pub mod document;
pub mod job;
pub mod preferences;
