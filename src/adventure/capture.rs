//! Capture attempts and the tool-free fight path.
//!
//! Both resolve the wild creature left on the player record by the last
//! encounter: one throw or one fight per creature, whatever the outcome.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::adventure::{
    errors::AdventureError,
    inventory,
    random::uniform_inclusive,
    storage::AdventureStore,
    types::{DexEntry, PlayerKey, PlayerRecord, WildEncounter},
    world::{Species, WorldCatalog},
};

/// Which items may be thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRules {
    /// Always a capture tool, even when no catch-rate row mentions it.
    pub default_tool: String,
}

impl Default for CaptureRules {
    fn default() -> Self {
        Self {
            default_tool: "POKE_BALL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub species_id: u32,
    pub caught: bool,
    /// Percent chance that was rolled against.
    pub rate: u32,
    /// Dex level after the attempt.
    pub dex_level: u32,
    pub tools_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightOutcome {
    pub species_id: u32,
    pub money: u64,
}

fn enabled_species(world: &WorldCatalog, species_id: u32) -> Result<&Species, AdventureError> {
    world
        .species(species_id)
        .filter(|s| s.enabled)
        .ok_or_else(|| AdventureError::SpeciesNotFound(species_id.to_string()))
}

/// Take the waiting creature if it is the one the player is acting on.
fn take_encounter(
    player: &mut PlayerRecord,
    species_id: u32,
    level: Option<u32>,
) -> Result<WildEncounter, AdventureError> {
    match player.pending_encounter {
        Some(wild)
            if wild.species_id == species_id
                && wild.location_id == player.current_location_id
                && level.map_or(true, |l| l == wild.level) =>
        {
            player.pending_encounter = None;
            Ok(wild)
        }
        _ => Err(AdventureError::NoActiveEncounter),
    }
}

/// Throw one capture tool at the waiting wild creature.
///
/// The tool is consumed whether or not the roll succeeds, and the creature is
/// gone either way. On success the captured level is added to the species'
/// dex level.
#[allow(clippy::too_many_arguments)]
pub fn attempt_capture<R: Rng + ?Sized>(
    store: &AdventureStore,
    world: &WorldCatalog,
    rules: &CaptureRules,
    key: PlayerKey,
    species_id: u32,
    level: u32,
    tool_code: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<CaptureOutcome, AdventureError> {
    let species = enabled_species(world, species_id)?;
    let tool = world
        .item_type_by_code(tool_code)
        .filter(|t| world.is_capture_tool(&t.code, &rules.default_tool))
        .ok_or_else(|| AdventureError::NotACaptureTool(tool_code.to_string()))?;
    let rate = world.catch_rate(species.rarity_id, &tool.code);

    store.update_player(key, |player| {
        let wild = take_encounter(player, species.id, Some(level))?;
        if !inventory::remove_items(player, tool.id, 1) {
            return Err(AdventureError::NoCaptureTool(tool.name.clone()));
        }
        let caught = rng.gen_range(0..100) < rate;
        if caught {
            let entry = player
                .dex
                .entry(species.id)
                .or_insert_with(|| DexEntry::seen(now));
            entry.level = entry.level.saturating_add(wild.level.max(1));
        }
        Ok(CaptureOutcome {
            species_id: species.id,
            caught,
            rate,
            dex_level: player.dex.get(&species.id).map(|e| e.level).unwrap_or(0),
            tools_left: inventory::quantity_of(player, tool.id),
        })
    })
}

/// Fight the waiting creature instead of catching it. Always wins and pays out
/// of the rarity's money range.
pub fn fight_wild<R: Rng + ?Sized>(
    store: &AdventureStore,
    world: &WorldCatalog,
    key: PlayerKey,
    species_id: u32,
    rng: &mut R,
) -> Result<FightOutcome, AdventureError> {
    let species = enabled_species(world, species_id)?;
    let range = species
        .rarity_id
        .and_then(|id| world.rarity(id))
        .map(|r| {
            let min = r.min_money_reward.max(0) as u64;
            let max = (r.max_money_reward.max(0) as u64).max(min);
            (min, max)
        });

    store.update_player(key, |player| {
        take_encounter(player, species.id, None)?;
        let money = match range {
            Some((min, max)) if max > 0 => uniform_inclusive(rng, min, max),
            _ => 0,
        };
        player.money = player.money.saturating_add(money);
        Ok(FightOutcome {
            species_id: species.id,
            money,
        })
    })
}
