//! Error types for the catalog crate.
//!
//! Everything that can go wrong while reading the catalogue file is
//! reported through one enum so the binaries can print a single message
//! and refuse to start.

use thiserror::Error;

/// Errors that can occur while loading and validating a catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open catalogue file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not valid catalogue JSON
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A movie entry carries an unusable identifier
    #[error("Invalid movie id {id} for \"{name}\"")]
    InvalidMovieId { name: String, id: u32 },

    /// Two tracked actors fold to the same key
    #[error("Duplicate tracked actor: \"{first}\" and \"{second}\" are the same name")]
    DuplicateActor { first: String, second: String },

    /// Catalogue-level validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
