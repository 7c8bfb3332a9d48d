use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PLAYER_SCHEMA_VERSION: u8 = 2;
pub const GUILD_SETTINGS_SCHEMA_VERSION: u8 = 1;

/// Identity of a player: one record per (server, user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey {
    pub server_id: u64,
    pub user_id: u64,
}

impl PlayerKey {
    pub fn new(server_id: u64, user_id: u64) -> Self {
        Self { server_id, user_id }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server_id, self.user_id)
    }
}

/// Dex row for one species. Level 0 means seen, 1 and above means owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexEntry {
    pub level: u32,
    pub first_seen_at: DateTime<Utc>,
    /// Part of the trainer's active party. Only the starter joins automatically.
    #[serde(default)]
    pub in_party: bool,
}

impl DexEntry {
    /// A species spotted in the wild but not caught.
    pub fn seen(now: DateTime<Utc>) -> Self {
        Self {
            level: 0,
            first_seen_at: now,
            in_party: false,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.level >= 1
    }
}

/// Wild creature waiting for the player's one throw or fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildEncounter {
    pub species_id: u32,
    pub level: u32,
    pub location_id: u32,
    pub appeared_at: DateTime<Utc>,
}

/// Represents a stack of identical items in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type_id: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerProgress {
    pub defeated: bool,
    /// Set on the first victory and never overwritten.
    pub first_defeated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    pub obtained_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionProgress {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub reward_claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
}

/// Persisted adventure state for one player.
///
/// Every per-player collection lives inside this record so a single write
/// covers any multi-row change (tool consumption plus dex upsert, purchase
/// debit plus inventory credit). Map keys enforce uniqueness per
/// (player, species), (player, trainer), (player, gym) and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub server_id: u64,
    pub user_id: u64,
    pub current_location_id: u32,
    pub money: u64,
    pub current_stamina: u32,
    pub max_stamina: u32,
    pub last_turn_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub dex: BTreeMap<u32, DexEntry>,
    #[serde(default)]
    pub inventory: Vec<ItemStack>,
    #[serde(default)]
    pub gym_trainers: BTreeMap<u32, TrainerProgress>,
    #[serde(default)]
    pub badges: BTreeMap<u32, BadgeRecord>,
    #[serde(default)]
    pub missions: BTreeMap<u32, MissionProgress>,
    #[serde(default)]
    pub steps: BTreeMap<u32, StepProgress>,
    /// Cleared by the throw or fight that resolves it, or by moving away.
    #[serde(default)]
    pub pending_encounter: Option<WildEncounter>,
    pub schema_version: u8,
}

impl PlayerRecord {
    pub fn new(
        key: PlayerKey,
        location_id: u32,
        stamina: u32,
        max_stamina: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            server_id: key.server_id,
            user_id: key.user_id,
            current_location_id: location_id,
            money: 0,
            current_stamina: stamina.min(max_stamina),
            max_stamina,
            last_turn_at: now,
            created_at: now,
            dex: BTreeMap::new(),
            inventory: Vec::new(),
            gym_trainers: BTreeMap::new(),
            badges: BTreeMap::new(),
            missions: BTreeMap::new(),
            steps: BTreeMap::new(),
            pending_encounter: None,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.server_id, self.user_id)
    }

    pub fn has_badge(&self, gym_id: u32) -> bool {
        self.badges.contains_key(&gym_id)
    }

    pub fn has_defeated(&self, trainer_id: u32) -> bool {
        self.gym_trainers
            .get(&trainer_id)
            .map(|p| p.defeated)
            .unwrap_or(false)
    }

    pub fn mission_completed(&self, mission_id: u32) -> bool {
        self.missions
            .get(&mission_id)
            .map(|p| p.completed)
            .unwrap_or(false)
    }

    pub fn owned_species(&self) -> usize {
        self.dex.values().filter(|e| e.is_owned()).count()
    }
}

/// Per-server tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub server_id: u64,
    pub stamina_per_hour: u32,
    /// Percent chance of the post-move item event; 0 disables it.
    pub move_item_event_chance: u32,
    /// Percent chance of the post-move battle event; 0 disables it.
    pub move_battle_event_chance: u32,
    pub move_battle_min_reward: u64,
    pub move_battle_max_reward: u64,
    pub schema_version: u8,
}

impl GuildSettings {
    pub fn new(server_id: u64) -> Self {
        Self {
            server_id,
            stamina_per_hour: 1,
            move_item_event_chance: 0,
            move_battle_event_chance: 0,
            move_battle_min_reward: 0,
            move_battle_max_reward: 0,
            schema_version: GUILD_SETTINGS_SCHEMA_VERSION,
        }
    }
}
