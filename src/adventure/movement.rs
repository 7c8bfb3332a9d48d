//! Travel along the location graph and the random events that follow a move.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::Rng;

use crate::adventure::{
    errors::AdventureError,
    inventory,
    random::{draw_at_least_one, pick_weighted, roll_percent, uniform_inclusive},
    stamina,
    storage::AdventureStore,
    types::{GuildSettings, PlayerKey, PlayerRecord},
    world::{LocationConnection, WorldCatalog},
};

/// Something that happened on the road after a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEvent {
    ItemFound { item_type_id: u32, quantity: u32 },
    BattleWon { money: u64 },
    BattleLost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from_location_id: u32,
    pub to_location_id: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub events: Vec<MoveEvent>,
}

/// Edges out of the player's location that are open to them.
pub fn list_reachable<'a>(
    world: &'a WorldCatalog,
    player: &PlayerRecord,
) -> Vec<&'a LocationConnection> {
    world
        .connections_from(player.current_location_id)
        .filter(|edge| match edge.required_gym_id {
            Some(gym_id) => player.has_badge(gym_id),
            None => true,
        })
        .collect()
}

/// Regenerate stamina, then list reachable edges. Refuses with `NoStamina`
/// so the destination menu is never offered to an exhausted player.
pub fn destinations<'a>(
    store: &AdventureStore,
    world: &'a WorldCatalog,
    settings: &GuildSettings,
    key: PlayerKey,
    now: DateTime<Utc>,
) -> Result<(PlayerRecord, Vec<&'a LocationConnection>), AdventureError> {
    let player = stamina::refresh(store, settings, key, now)?;
    if player.current_stamina == 0 {
        return Err(AdventureError::NoStamina);
    }
    let reachable = list_reachable(world, &player);
    Ok((player, reachable))
}

/// Move the player along the edge to `to_location_id`.
///
/// The move, the stamina cost and any post-move rewards land in a single
/// write. A refused move leaves the location untouched.
pub fn move_player<R: Rng + ?Sized>(
    store: &AdventureStore,
    world: &WorldCatalog,
    settings: &GuildSettings,
    key: PlayerKey,
    to_location_id: u32,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<MoveOutcome, AdventureError> {
    stamina::refresh(store, settings, key, now)?;
    store.update_player(key, |player| {
        stamina::require(player, settings, now)?;

        let edge = world
            .connection(player.current_location_id, to_location_id)
            .ok_or(AdventureError::InvalidDestination(to_location_id))?;
        if let Some(gym_id) = edge.required_gym_id {
            if !player.has_badge(gym_id) {
                return Err(AdventureError::RequiresBadge(gym_id));
            }
        }

        let from_location_id = player.current_location_id;
        player.current_location_id = to_location_id;
        player.pending_encounter = None;
        player.last_turn_at = now;
        player.current_stamina = player.current_stamina.saturating_sub(1);

        let events = roll_move_events(player, world, settings, rng);
        Ok(MoveOutcome {
            from_location_id,
            to_location_id,
            stamina: player.current_stamina,
            max_stamina: player.max_stamina,
            events,
        })
    })
}

/// Roll the item and battle events independently and apply their rewards.
pub fn roll_move_events<R: Rng + ?Sized>(
    player: &mut PlayerRecord,
    world: &WorldCatalog,
    settings: &GuildSettings,
    rng: &mut R,
) -> Vec<MoveEvent> {
    let mut events = Vec::new();

    if roll_percent(rng, settings.move_item_event_chance) {
        match pick_weighted(&world.move_item_rewards, |r| r.weight, rng) {
            Some(row) => {
                let quantity = draw_at_least_one(rng, row.min_quantity, row.max_quantity);
                inventory::add_items(player, row.item_type_id, quantity);
                events.push(MoveEvent::ItemFound {
                    item_type_id: row.item_type_id,
                    quantity,
                });
            }
            None => warn!(target: "content", "item event fired but no move rewards are configured"),
        }
    }

    if roll_percent(rng, settings.move_battle_event_chance) {
        if rng.gen_range(0..100) < 50 {
            let money = uniform_inclusive(
                rng,
                settings.move_battle_min_reward,
                settings.move_battle_max_reward,
            );
            if money > 0 {
                player.money = player.money.saturating_add(money);
            }
            events.push(MoveEvent::BattleWon { money });
        } else {
            events.push(MoveEvent::BattleLost);
        }
    }

    if !events.is_empty() {
        debug!("move events for {}: {:?}", player.key(), events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::{canonical_world, BOULDER_GYM, PEWTER_CITY, ROUTE_1, ROUTE_3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player_at(location: u32) -> PlayerRecord {
        PlayerRecord::new(PlayerKey::new(1, 1), location, 5, 5, Utc::now())
    }

    #[test]
    fn gated_edge_hidden_until_badged() {
        let world = canonical_world();
        let mut player = player_at(PEWTER_CITY);
        let targets: Vec<u32> = list_reachable(&world, &player)
            .iter()
            .map(|e| e.to_location_id)
            .collect();
        assert!(!targets.contains(&ROUTE_3));

        player.badges.insert(
            BOULDER_GYM,
            crate::adventure::types::BadgeRecord {
                obtained_at: Utc::now(),
            },
        );
        assert!(list_reachable(&world, &player)
            .iter()
            .any(|e| e.to_location_id == ROUTE_3));
    }

    #[test]
    fn disabled_events_never_fire() {
        let world = canonical_world();
        let settings = GuildSettings::new(1);
        let mut player = player_at(ROUTE_1);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert!(roll_move_events(&mut player, &world, &settings, &mut rng).is_empty());
        }
        assert!(player.inventory.is_empty());
        assert_eq!(player.money, 0);
    }

    #[test]
    fn certain_events_both_fire() {
        let world = canonical_world();
        let mut settings = GuildSettings::new(1);
        settings.move_item_event_chance = 100;
        settings.move_battle_event_chance = 100;
        settings.move_battle_min_reward = 20;
        settings.move_battle_max_reward = 10;
        let mut player = player_at(ROUTE_1);
        let mut rng = StdRng::seed_from_u64(5);

        let events = roll_move_events(&mut player, &world, &settings, &mut rng);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], MoveEvent::ItemFound { quantity, .. } if quantity >= 1));
        match events[1] {
            // Inverted range clamps to max = min.
            MoveEvent::BattleWon { money } => assert_eq!(money, 20),
            MoveEvent::BattleLost => assert_eq!(player.money, 0),
            other => panic!("unexpected {:?}", other),
        }
    }
}
