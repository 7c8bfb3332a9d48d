//! Wild encounters at the player's current location.

use chrono::{DateTime, Utc};
use log::warn;
use rand::Rng;

use crate::adventure::{
    errors::AdventureError,
    random::{draw_at_least_one, pick_weighted},
    stamina,
    storage::AdventureStore,
    types::{DexEntry, GuildSettings, PlayerKey, WildEncounter},
    world::WorldCatalog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterOutcome {
    pub species_id: u32,
    pub level: u32,
    /// True when this sighting created the dex row.
    pub first_sighting: bool,
    pub stamina: u32,
}

/// Roll a wild creature for the player's location.
///
/// Stamina is only spent once the location is known to have a non-empty
/// table. The first sighting of a species records a level-0 dex row. The
/// creature replaces any earlier one still waiting for a throw or fight.
pub fn encounter<R: Rng + ?Sized>(
    store: &AdventureStore,
    world: &WorldCatalog,
    settings: &GuildSettings,
    key: PlayerKey,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<EncounterOutcome, AdventureError> {
    stamina::refresh(store, settings, key, now)?;
    store.update_player(key, |player| {
        let location_id = player.current_location_id;
        let wild = world
            .location(location_id)
            .filter(|l| l.is_available())
            .and_then(|l| world.type_of(l))
            .map(|t| t.has_wild_encounters)
            .unwrap_or(false);
        if !wild {
            return Err(AdventureError::NoEncountersHere);
        }

        stamina::require(player, settings, now)?;

        let table = world.encounters_at(location_id);
        let Some(row) = pick_weighted(&table, |e| e.weight, rng) else {
            warn!(
                target: "content",
                "location {} allows wild encounters but has no encounter table",
                location_id
            );
            return Err(AdventureError::NoEncounterTableDefined(location_id));
        };

        player.current_stamina = player.current_stamina.saturating_sub(1);
        let level = draw_at_least_one(rng, row.min_level, row.max_level);

        let first_sighting = !player.dex.contains_key(&row.species_id);
        if first_sighting {
            player.dex.insert(row.species_id, DexEntry::seen(now));
        }
        player.pending_encounter = Some(WildEncounter {
            species_id: row.species_id,
            level,
            location_id,
            appeared_at: now,
        });

        Ok(EncounterOutcome {
            species_id: row.species_id,
            level,
            first_sighting,
            stamina: player.current_stamina,
        })
    })
}
