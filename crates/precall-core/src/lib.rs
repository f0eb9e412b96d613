//! Shared building blocks for the precall expansion pass: configuration,
//! keyword matching and the error type every stage reports through.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod keywords;
pub mod location;

// Re-export commonly used items for convenience
pub use tracing;

pub use config::{KeywordOption, PrecallOptions};
pub use keywords::{KeywordSet, MatchPattern};
pub use location::SourceLocation;

pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
