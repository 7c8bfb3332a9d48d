//! World seed loading for data-driven content.
//!
//! Operators author the world as a single JSON document matching
//! [`WorldCatalog`]. When no seed path is configured the built-in
//! [`canonical_world`] is used instead, so tests and fresh installs work
//! without any files on disk.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::adventure::seed::canonical_world;
use crate::adventure::world::WorldCatalog;
use crate::adventure::AdventureError;

/// Load and validate a world catalog from a JSON file.
pub fn load_world_from_json<P: AsRef<Path>>(path: P) -> Result<WorldCatalog, AdventureError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let world: WorldCatalog = serde_json::from_str(&contents).map_err(|e| {
        AdventureError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to parse {}: {}", path.display(), e),
        ))
    })?;
    world.validate()?;

    info!(
        "Loaded world seed {}: {} locations, {} species, {} gyms, {} tutorial steps",
        path.display(),
        world.locations.len(),
        world.species.len(),
        world.gyms.len(),
        world.tutorial_steps.len()
    );
    Ok(world)
}

/// Resolve the world: the configured seed file if any, otherwise the built-in region.
pub fn load_world(seed_path: Option<&Path>) -> Result<WorldCatalog, AdventureError> {
    match seed_path {
        Some(path) if path.exists() => load_world_from_json(path),
        Some(path) => {
            warn!(
                target: "content",
                "World seed {} not found, falling back to the built-in region",
                path.display()
            );
            Ok(canonical_world())
        }
        None => Ok(canonical_world()),
    }
}

/// Write a world catalog as pretty JSON, creating parent directories.
pub fn write_world_json<P: AsRef<Path>>(path: P, world: &WorldCatalog) -> Result<(), AdventureError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(world)
        .map_err(|e| AdventureError::Internal(format!("world serialization failed: {}", e)))?;
    fs::write(path, json)?;
    Ok(())
}
