//! Reference-article search and retrieval

pub mod client;
pub mod resolver;

// Re-export main types for convenience
pub use client::{ArticleSource, WikiClient};
pub use resolver::ArticleResolver;
