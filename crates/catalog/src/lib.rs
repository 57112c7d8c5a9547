//! # Catalog Crate
//!
//! Domain types shared by every other crate in the workspace.
//!
//! ## Main Components
//!
//! - **types**: Catalogue entries, cast data and the case-folding rule
//! - **loader**: Read and validate the catalogue file
//! - **error**: Error types for catalogue loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/catalog.json"))?;
//! for movie in &catalog.movies {
//!     println!("{} -> {}", movie.display_name, movie.external_id);
//! }
//! ```

// Public modules
pub mod error;
pub mod loader;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use loader::parse_catalog;
pub use types::{
    CastMember, Catalog, CreditsResult, MovieCatalogEntry, TmdbId, TrackedActorName, fold_key,
};
