//! On-disk summary cache

pub mod store;

pub use store::{RESERVED_CHARS, SummaryStore, sanitize_title};
