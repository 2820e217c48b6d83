//! Error module
//!

use thiserror::Error;

/// Failures crossing the registry boundary.  Per-field defects never show
/// up here, they degrade inside the record parser.
///
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("snapshot has no usable aircraft list")]
    FeedMalformed,
}
