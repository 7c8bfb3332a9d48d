//! Per-server tunables.

use log::info;

use crate::adventure::{errors::AdventureError, storage::AdventureStore, types::GuildSettings};

pub const MIN_STAMINA_PER_HOUR: u32 = 1;
pub const MAX_STAMINA_PER_HOUR: u32 = 5;

/// Stored settings for a server, or `defaults` re-keyed to it.
pub fn effective(
    store: &AdventureStore,
    defaults: &GuildSettings,
    server_id: u64,
) -> Result<GuildSettings, AdventureError> {
    match store.get_guild_settings(server_id)? {
        Some(settings) => Ok(settings),
        None => Ok(GuildSettings {
            server_id,
            ..defaults.clone()
        }),
    }
}

pub fn set_stamina_per_hour(
    store: &AdventureStore,
    defaults: &GuildSettings,
    server_id: u64,
    stamina_per_hour: u32,
) -> Result<GuildSettings, AdventureError> {
    if !(MIN_STAMINA_PER_HOUR..=MAX_STAMINA_PER_HOUR).contains(&stamina_per_hour) {
        return Err(AdventureError::InvalidStaminaRate(stamina_per_hour));
    }
    let mut settings = effective(store, defaults, server_id)?;
    settings.stamina_per_hour = stamina_per_hour;
    store.put_guild_settings(settings.clone())?;
    info!("server {} stamina per hour set to {}", server_id, stamina_per_hour);
    Ok(settings)
}

/// Post-move event tuning for one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEventSettings {
    pub item_chance: u32,
    pub battle_chance: u32,
    pub min_reward: u64,
    pub max_reward: u64,
}

pub fn set_move_events(
    store: &AdventureStore,
    defaults: &GuildSettings,
    server_id: u64,
    events: MoveEventSettings,
) -> Result<GuildSettings, AdventureError> {
    if events.item_chance > 100 || events.battle_chance > 100 {
        return Err(AdventureError::InvalidSetting(
            "event chances must be between 0 and 100".to_string(),
        ));
    }
    if events.max_reward < events.min_reward {
        return Err(AdventureError::InvalidSetting(
            "battle reward maximum is below the minimum".to_string(),
        ));
    }
    let mut settings = effective(store, defaults, server_id)?;
    settings.move_item_event_chance = events.item_chance;
    settings.move_battle_event_chance = events.battle_chance;
    settings.move_battle_min_reward = events.min_reward;
    settings.move_battle_max_reward = events.max_reward;
    store.put_guild_settings(settings.clone())?;
    info!("server {} move events set to {:?}", server_id, events);
    Ok(settings)
}
