//! Summary page generation.

pub mod summary;

pub use summary::{generate_markdown_summary, write_summary};
