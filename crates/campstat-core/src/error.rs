//! Error types for campstat
//!
//! This module defines the error types used throughout the campstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use campstat_core::error::{CampstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CampstatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for campstat operations
///
/// There is no retry layer: any of these surfaces immediately and ends the run.
#[derive(Error, Debug)]
pub enum CampstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error, including non-success HTTP statuses
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid date or a local time that cannot be placed on the timeline
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Report could not be written
    #[error("Failed to write report {path}: {error}")]
    ReportWrite {
        /// The file being written
        path: PathBuf,
        /// The error message
        error: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in campstat
///
/// # Example
///
/// ```
/// use campstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CampstatError>;
