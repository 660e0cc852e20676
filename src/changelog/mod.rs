//! Changelog classification, parsing and writing.

pub mod classify;
pub mod format;
pub mod parser;
pub mod writer;

pub use classify::{SectionMap, classify_fragment, validate_sections};
pub use parser::{PreviousChangelog, read_previous};
pub use writer::{cleanup_fragments, merge_entries, render_changelog, write_changelog};
