//! Creating a player: starter choice and initial placement.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::adventure::{
    errors::AdventureError,
    storage::AdventureStore,
    types::{DexEntry, PlayerKey, PlayerRecord},
    world::{Species, WorldCatalog},
};

/// Where and how a fresh player begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub initial_location: String,
    pub starting_stamina: u32,
    pub max_stamina: u32,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            initial_location: "PalletTown".to_string(),
            starting_stamina: 5,
            max_stamina: 5,
        }
    }
}

/// Enabled starter species, or `NoStartersConfigured` when the world has none.
pub fn starters(world: &WorldCatalog) -> Result<Vec<&Species>, AdventureError> {
    let starters = world.starters();
    if starters.is_empty() {
        warn!(target: "content", "no enabled starter species in the world catalog");
        return Err(AdventureError::NoStartersConfigured);
    }
    Ok(starters)
}

/// Create the player with the chosen starter at level 1.
pub fn begin_adventure(
    store: &AdventureStore,
    world: &WorldCatalog,
    options: &StartOptions,
    key: PlayerKey,
    starter_species_id: u32,
    now: DateTime<Utc>,
) -> Result<PlayerRecord, AdventureError> {
    if store.find_player(key)?.is_some() {
        return Err(AdventureError::AlreadyStarted);
    }
    let candidates = starters(world)?;
    let starter = candidates
        .iter()
        .find(|s| s.id == starter_species_id)
        .ok_or_else(|| AdventureError::SpeciesNotFound(starter_species_id.to_string()))?;

    let location = world
        .location_by_code(&options.initial_location)
        .filter(|l| l.is_available())
        .ok_or_else(|| {
            warn!(
                target: "content",
                "initial location {} is missing or unavailable",
                options.initial_location
            );
            AdventureError::InitialLocationMissing(options.initial_location.clone())
        })?;

    let mut player = PlayerRecord::new(
        key,
        location.id,
        options.starting_stamina,
        options.max_stamina,
        now,
    );
    player.dex.insert(
        starter.id,
        DexEntry {
            level: 1,
            first_seen_at: now,
            in_party: true,
        },
    );
    store.create_player(player.clone())?;
    info!(
        "player {} began their adventure with {} at {}",
        key, starter.code, location.code
    );
    Ok(player)
}
