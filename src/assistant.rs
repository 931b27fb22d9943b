//! Prompt building and output parsing for the language model helpers.

pub mod email;
pub mod format;
pub mod roast;
pub mod study_plan;
pub mod summary;
pub mod syllabus;
pub mod vibe;
