//! Shared utility helpers.

pub mod error;
pub(crate) mod math;

pub use error::{ConfigIssue, TinyDetError};

/// Result alias re-exported at the crate root.
pub use error::Result as TinyDetResult;
