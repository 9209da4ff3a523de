//! Error types for the load planning engine.

use thiserror::Error;

/// Errors produced by input validation.
///
/// The engine itself is total: once inputs pass validation, every physical
/// infeasibility is reported through [`PackResult::unplaced`](crate::PackResult),
/// never as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// An item has invalid dimensions or weight.
    #[error("invalid item '{id}': {reason}")]
    InvalidItem {
        /// Identifier of the offending item.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The truck has invalid dimensions or weight capacity.
    #[error("invalid truck: {0}")]
    InvalidTruck(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
