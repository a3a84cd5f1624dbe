//! Brief assembly, rendering, and storage

mod assembler;
mod markdown;
mod store;

pub use assembler::{EXECUTIVE_SUMMARY_CHARS, assemble, truncate_chars};
pub use markdown::render_markdown;
pub use store::{BriefStore, PersistenceError, SavedBrief, slugify};
