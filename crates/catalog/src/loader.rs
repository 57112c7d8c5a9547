//! Catalogue loading and validation.
//!
//! The catalogue file is JSON with ordered arrays so the declared movie and
//! actor order survives parsing:
//!
//! ```json
//! {
//!   "movies": [{ "name": "Iron Man", "id": 1726 }],
//!   "actors": ["Robert Downey Jr."]
//! }
//! ```

use crate::error::{CatalogError, Result};
use crate::types::{Catalog, fold_key};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

impl Catalog {
    /// Load and validate a catalogue file.
    ///
    /// Steps:
    /// 1. Read the file
    /// 2. Parse JSON into a `Catalog`
    /// 3. Validate ids, names and actor uniqueness
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalogue from {:?}", path);

        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let catalog = parse_catalog(&content, &file)?;

        let (movies, actors) = catalog.counts();
        info!("Loaded {} movies and {} tracked actors", movies, actors);
        Ok(catalog)
    }

    /// Validate catalogue integrity
    ///
    /// Check that:
    /// - There is at least one movie
    /// - Every movie has a name and a positive id
    /// - Tracked actor names are non-empty and unique after case folding
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(CatalogError::ValidationError(
                "catalogue contains no movies".to_string(),
            ));
        }

        for movie in &self.movies {
            if movie.display_name.trim().is_empty() {
                return Err(CatalogError::ValidationError(format!(
                    "movie with id {} has an empty name",
                    movie.external_id
                )));
            }
            if movie.external_id == 0 {
                return Err(CatalogError::InvalidMovieId {
                    name: movie.display_name.clone(),
                    id: movie.external_id,
                });
            }
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for actor in &self.actors {
            if actor.trim().is_empty() {
                return Err(CatalogError::ValidationError(
                    "tracked actor name is empty".to_string(),
                ));
            }
            if let Some(first) = seen.insert(fold_key(actor), actor.as_str()) {
                return Err(CatalogError::DuplicateActor {
                    first: first.to_string(),
                    second: actor.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Parse catalogue JSON and validate it.
///
/// `file` is only used for error messages.
pub fn parse_catalog(content: &str, file: &str) -> Result<Catalog> {
    let catalog: Catalog =
        serde_json::from_str(content).map_err(|e| CatalogError::ParseError {
            file: file.to_string(),
            reason: e.to_string(),
        })?;
    catalog.validate()?;
    Ok(catalog)
}
