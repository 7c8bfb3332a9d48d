//! Static world content: the location graph, gyms and their trainer ladders,
//! species with rarity and catch-rate tables, encounter tables, stores and the
//! tutorial step tree.
//!
//! The catalog is authored out of band (see [`crate::adventure::seed_loader`])
//! and is read-only for every engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::adventure::errors::AdventureError;

/// Catch rate used when a species has no rarity or the rarity has no row for the tool.
pub const DEFAULT_CATCH_RATE: u32 = 50;

/// Most creatures a gym trainer may field.
pub const MAX_TRAINER_SLOTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: u32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationType {
    pub id: u32,
    pub code: String,
    #[serde(default)]
    pub has_wild_encounters: bool,
    #[serde(default)]
    pub has_shop: bool,
    #[serde(default)]
    pub has_gym: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub code: String,
    pub name: String,
    pub location_type_id: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Location {
    pub fn is_available(&self) -> bool {
        self.enabled && !self.hidden
    }
}

/// Directed edge. Edges are never implicitly bidirectional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConnection {
    pub from_location_id: u32,
    pub to_location_id: u32,
    #[serde(default)]
    pub required_gym_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReward {
    pub item_type_id: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: u32,
    pub code: String,
    pub name: String,
    pub location_id: u32,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerPokemon {
    pub species_id: u32,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymTrainer {
    pub id: u32,
    pub gym_id: u32,
    pub order: i32,
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<TrainerPokemon>,
    #[serde(default)]
    pub money_reward: u64,
    #[serde(default)]
    pub item_reward: Option<ItemReward>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rarity {
    pub id: u32,
    pub code: String,
    #[serde(default)]
    pub min_money_reward: i64,
    #[serde(default)]
    pub max_money_reward: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRate {
    pub rarity_id: u32,
    pub tool_code: String,
    pub percent: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: u32,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub starter: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rarity_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncounterMethod {
    #[default]
    Walk,
    Surf,
    Fish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub location_id: u32,
    pub species_id: u32,
    pub weight: i32,
    pub min_level: u32,
    pub max_level: u32,
    #[serde(default)]
    pub method: EncounterMethod,
}

/// Row of the post-move item event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveItemReward {
    pub item_type_id: u32,
    pub weight: i32,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreType {
    pub id: u32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: u32,
    pub store_type_id: u32,
    pub item_type_id: u32,
    pub price: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStore {
    pub location_id: u32,
    pub store_type_id: u32,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialStep {
    pub id: u32,
    pub code: String,
    pub order: i32,
    #[serde(default)]
    pub reward_money: u64,
    #[serde(default)]
    pub reward_item: Option<ItemReward>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialMission {
    pub id: u32,
    pub step_id: u32,
    pub code: String,
    pub order: i32,
    pub condition_code: String,
}

fn default_true() -> bool {
    true
}

/// Read-only world content shared by every engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldCatalog {
    #[serde(default)]
    pub item_types: Vec<ItemType>,
    #[serde(default)]
    pub location_types: Vec<LocationType>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub connections: Vec<LocationConnection>,
    #[serde(default)]
    pub gyms: Vec<Gym>,
    #[serde(default)]
    pub gym_trainers: Vec<GymTrainer>,
    #[serde(default)]
    pub rarities: Vec<Rarity>,
    #[serde(default)]
    pub catch_rates: Vec<CatchRate>,
    #[serde(default)]
    pub species: Vec<Species>,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub move_item_rewards: Vec<MoveItemReward>,
    #[serde(default)]
    pub store_types: Vec<StoreType>,
    #[serde(default)]
    pub store_items: Vec<StoreItem>,
    #[serde(default)]
    pub location_stores: Vec<LocationStore>,
    #[serde(default)]
    pub tutorial_steps: Vec<TutorialStep>,
    #[serde(default)]
    pub tutorial_missions: Vec<TutorialMission>,
}

impl WorldCatalog {
    pub fn location(&self, id: u32) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn location_by_code(&self, code: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|l| l.code.eq_ignore_ascii_case(code))
    }

    pub fn location_type(&self, id: u32) -> Option<&LocationType> {
        self.location_types.iter().find(|t| t.id == id)
    }

    /// Capability flags of the type behind `location`.
    pub fn type_of(&self, location: &Location) -> Option<&LocationType> {
        self.location_type(location.location_type_id)
    }

    pub fn item_type(&self, id: u32) -> Option<&ItemType> {
        self.item_types.iter().find(|i| i.id == id)
    }

    pub fn item_type_by_code(&self, code: &str) -> Option<&ItemType> {
        self.item_types
            .iter()
            .find(|i| i.code.eq_ignore_ascii_case(code))
    }

    pub fn item_name(&self, id: u32) -> String {
        self.item_type(id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| format!("item #{}", id))
    }

    pub fn species(&self, id: u32) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn species_by_code(&self, code: &str) -> Option<&Species> {
        self.species
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
    }

    pub fn enabled_species_count(&self) -> usize {
        self.species.iter().filter(|s| s.enabled).count()
    }

    /// Enabled starter species ordered by dex number.
    pub fn starters(&self) -> Vec<&Species> {
        let mut starters: Vec<&Species> = self
            .species
            .iter()
            .filter(|s| s.starter && s.enabled)
            .collect();
        starters.sort_by_key(|s| s.id);
        starters
    }

    pub fn rarity(&self, id: u32) -> Option<&Rarity> {
        self.rarities.iter().find(|r| r.id == id)
    }

    /// Capture percent for a rarity and tool, clamped to 0..=100.
    pub fn catch_rate(&self, rarity_id: Option<u32>, tool_code: &str) -> u32 {
        let Some(rarity_id) = rarity_id else {
            return DEFAULT_CATCH_RATE;
        };
        self.catch_rates
            .iter()
            .find(|c| c.rarity_id == rarity_id && c.tool_code.eq_ignore_ascii_case(tool_code))
            .map(|c| c.percent.clamp(0, 100) as u32)
            .unwrap_or(DEFAULT_CATCH_RATE)
    }

    /// Capture tools are the configured default tool plus every item that
    /// has a row in the catch-rate table.
    pub fn is_capture_tool(&self, code: &str, default_tool: &str) -> bool {
        code.eq_ignore_ascii_case(default_tool)
            || self
                .catch_rates
                .iter()
                .any(|c| c.tool_code.eq_ignore_ascii_case(code))
    }

    pub fn capture_tools(&self, default_tool: &str) -> Vec<&ItemType> {
        self.item_types
            .iter()
            .filter(|i| self.is_capture_tool(&i.code, default_tool))
            .collect()
    }

    pub fn connections_from(&self, location_id: u32) -> impl Iterator<Item = &LocationConnection> {
        self.connections
            .iter()
            .filter(move |c| c.from_location_id == location_id)
    }

    pub fn connection(&self, from: u32, to: u32) -> Option<&LocationConnection> {
        self.connections_from(from).find(|c| c.to_location_id == to)
    }

    pub fn gym(&self, id: u32) -> Option<&Gym> {
        self.gyms.iter().find(|g| g.id == id)
    }

    pub fn gym_at(&self, location_id: u32) -> Option<&Gym> {
        self.gyms.iter().find(|g| g.location_id == location_id)
    }

    /// Trainers of a gym in ladder order: `(order, name)`. The last one is the leader.
    pub fn ladder(&self, gym_id: u32) -> Vec<&GymTrainer> {
        let mut trainers: Vec<&GymTrainer> = self
            .gym_trainers
            .iter()
            .filter(|t| t.gym_id == gym_id)
            .collect();
        trainers.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        trainers
    }

    /// Encounter rows of a location, restricted to enabled species, in table order.
    pub fn encounters_at(&self, location_id: u32) -> Vec<&Encounter> {
        self.encounters
            .iter()
            .filter(|e| e.location_id == location_id)
            .filter(|e| self.species(e.species_id).map(|s| s.enabled).unwrap_or(false))
            .collect()
    }

    /// Store assigned to a location, first by sort order.
    pub fn store_at(&self, location_id: u32) -> Option<&StoreType> {
        self.location_stores
            .iter()
            .filter(|ls| ls.location_id == location_id)
            .min_by_key(|ls| ls.sort_order)
            .and_then(|ls| self.store_types.iter().find(|s| s.id == ls.store_type_id))
    }

    /// Enabled items of a store in sort order.
    pub fn store_items(&self, store_type_id: u32) -> Vec<&StoreItem> {
        let mut items: Vec<&StoreItem> = self
            .store_items
            .iter()
            .filter(|i| i.store_type_id == store_type_id && i.enabled)
            .collect();
        items.sort_by_key(|i| (i.sort_order, i.id));
        items
    }

    pub fn store_item(&self, id: u32) -> Option<&StoreItem> {
        self.store_items.iter().find(|i| i.id == id)
    }

    pub fn steps(&self) -> Vec<&TutorialStep> {
        let mut steps: Vec<&TutorialStep> = self.tutorial_steps.iter().collect();
        steps.sort_by_key(|s| (s.order, s.id));
        steps
    }

    pub fn step(&self, id: u32) -> Option<&TutorialStep> {
        self.tutorial_steps.iter().find(|s| s.id == id)
    }

    pub fn missions_of(&self, step_id: u32) -> Vec<&TutorialMission> {
        let mut missions: Vec<&TutorialMission> = self
            .tutorial_missions
            .iter()
            .filter(|m| m.step_id == step_id)
            .collect();
        missions.sort_by_key(|m| (m.order, m.id));
        missions
    }

    pub fn missions_with_condition<'a>(
        &'a self,
        condition_code: &'a str,
    ) -> impl Iterator<Item = &'a TutorialMission> {
        self.tutorial_missions
            .iter()
            .filter(move |m| m.condition_code == condition_code)
    }

    /// Check referential integrity of authored content.
    pub fn validate(&self) -> Result<(), AdventureError> {
        let location_ids: HashSet<u32> = self.locations.iter().map(|l| l.id).collect();
        let species_ids: HashSet<u32> = self.species.iter().map(|s| s.id).collect();
        let item_ids: HashSet<u32> = self.item_types.iter().map(|i| i.id).collect();
        let gym_ids: HashSet<u32> = self.gyms.iter().map(|g| g.id).collect();
        let step_ids: HashSet<u32> = self.tutorial_steps.iter().map(|s| s.id).collect();

        if location_ids.len() != self.locations.len() {
            return Err(invalid("duplicate location id"));
        }
        for location in &self.locations {
            if self.location_type(location.location_type_id).is_none() {
                return Err(invalid(format!(
                    "location {} references unknown type {}",
                    location.code, location.location_type_id
                )));
            }
        }
        for edge in &self.connections {
            if !location_ids.contains(&edge.from_location_id)
                || !location_ids.contains(&edge.to_location_id)
            {
                return Err(invalid(format!(
                    "connection {} -> {} has an unknown endpoint",
                    edge.from_location_id, edge.to_location_id
                )));
            }
            if let Some(gym) = edge.required_gym_id {
                if !gym_ids.contains(&gym) {
                    return Err(invalid(format!("connection gated by unknown gym {}", gym)));
                }
            }
        }
        for gym in &self.gyms {
            if !location_ids.contains(&gym.location_id) {
                return Err(invalid(format!("gym {} at unknown location", gym.code)));
            }
        }
        for trainer in &self.gym_trainers {
            if !gym_ids.contains(&trainer.gym_id) {
                return Err(invalid(format!("trainer {} in unknown gym", trainer.name)));
            }
            if trainer.pokemon.len() > MAX_TRAINER_SLOTS {
                return Err(invalid(format!(
                    "trainer {} fields more than {} creatures",
                    trainer.name, MAX_TRAINER_SLOTS
                )));
            }
            if let Some(reward) = trainer.item_reward {
                if !item_ids.contains(&reward.item_type_id) {
                    return Err(invalid(format!("trainer {} rewards unknown item", trainer.name)));
                }
            }
        }
        for encounter in &self.encounters {
            if !species_ids.contains(&encounter.species_id)
                || !location_ids.contains(&encounter.location_id)
            {
                return Err(invalid(format!(
                    "encounter row for species {} at location {} is dangling",
                    encounter.species_id, encounter.location_id
                )));
            }
        }
        for reward in &self.move_item_rewards {
            if !item_ids.contains(&reward.item_type_id) {
                return Err(invalid("move reward references unknown item"));
            }
        }
        for item in &self.store_items {
            if !item_ids.contains(&item.item_type_id) {
                return Err(invalid(format!("store item {} sells unknown item", item.id)));
            }
        }
        for mission in &self.tutorial_missions {
            if !step_ids.contains(&mission.step_id) {
                return Err(invalid(format!("mission {} in unknown step", mission.code)));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> AdventureError {
    AdventureError::InvalidWorld(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::canonical_world;

    #[test]
    fn canonical_world_is_consistent() {
        canonical_world().validate().expect("valid world");
    }

    #[test]
    fn ladder_sorts_by_order_then_name() {
        let mut world = WorldCatalog::default();
        world.gyms.push(Gym {
            id: 1,
            code: "G".into(),
            name: "Gym".into(),
            location_id: 1,
            closed: false,
        });
        for (id, order, name) in [(1, 2, "Zed"), (2, 1, "Bea"), (3, 1, "Al")] {
            world.gym_trainers.push(GymTrainer {
                id,
                gym_id: 1,
                order,
                name: name.into(),
                pokemon: Vec::new(),
                money_reward: 0,
                item_reward: None,
            });
        }
        let names: Vec<&str> = world.ladder(1).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Al", "Bea", "Zed"]);
    }

    #[test]
    fn catch_rate_defaults_and_clamps() {
        let mut world = WorldCatalog::default();
        world.catch_rates.push(CatchRate {
            rarity_id: 1,
            tool_code: "POKE_BALL".into(),
            percent: 130,
        });
        assert_eq!(world.catch_rate(Some(1), "POKE_BALL"), 100);
        assert_eq!(world.catch_rate(Some(1), "GREAT_BALL"), DEFAULT_CATCH_RATE);
        assert_eq!(world.catch_rate(None, "POKE_BALL"), DEFAULT_CATCH_RATE);
    }

    #[test]
    fn only_balls_are_capture_tools() {
        let world = canonical_world();
        for code in ["POKE_BALL", "great_ball", "ULTRA_BALL"] {
            assert!(world.is_capture_tool(code, "POKE_BALL"), "{}", code);
        }
        assert!(!world.is_capture_tool("POTION", "POKE_BALL"));
        // A custom default tool counts even without a catch-rate row.
        assert!(world.is_capture_tool("NET", "NET"));
        let codes: Vec<&str> = world
            .capture_tools("POKE_BALL")
            .iter()
            .map(|i| i.code.as_str())
            .collect();
        assert_eq!(codes, vec!["POKE_BALL", "GREAT_BALL", "ULTRA_BALL"]);
    }

    #[test]
    fn encounter_table_skips_disabled_species() {
        let world = canonical_world();
        let route = world.location_by_code("Route2").expect("route 2");
        assert!(world
            .encounters_at(route.id)
            .iter()
            .all(|e| world.species(e.species_id).map(|s| s.enabled).unwrap_or(false)));
    }

    #[test]
    fn rejects_dangling_connection() {
        let mut world = canonical_world();
        world.connections.push(LocationConnection {
            from_location_id: 1,
            to_location_id: 999,
            required_gym_id: None,
        });
        assert!(matches!(world.validate(), Err(AdventureError::InvalidWorld(_))));
    }
}
