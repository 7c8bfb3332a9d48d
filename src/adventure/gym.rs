//! Gym ladders and badges.
//!
//! Each trainer goes Undefeated -> Defeated once per player; the first victory
//! timestamp is kept forever. The leader is whoever sorts last in the ladder.
//! Badges are tracked separately from ladder progress, so claiming checks both.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::adventure::{
    errors::AdventureError,
    inventory,
    storage::AdventureStore,
    types::{BadgeRecord, PlayerKey, PlayerRecord, TrainerProgress},
    world::{Gym, GymTrainer, ItemReward, WorldCatalog},
};

/// Whether fights and badge claims must follow ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderRules {
    pub strict_order: bool,
}

impl Default for LadderRules {
    fn default() -> Self {
        Self { strict_order: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerStatus {
    pub trainer_id: u32,
    pub name: String,
    pub order: i32,
    pub defeated: bool,
    pub is_leader: bool,
    pub money_reward: u64,
    pub item_reward: Option<ItemReward>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderView {
    pub gym_id: u32,
    pub gym_name: String,
    pub trainers: Vec<TrainerStatus>,
    /// First undefeated trainer in ladder order.
    pub next_trainer_id: Option<u32>,
    pub complete: bool,
    pub badge_owned: bool,
    pub badge_claimable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerVictory {
    pub gym_id: u32,
    pub trainer_id: u32,
    pub trainer_name: String,
    pub money: u64,
    pub item: Option<ItemReward>,
    pub leader_defeated: bool,
    pub ladder_complete: bool,
}

fn next_undefeated<'a>(ladder: &[&'a GymTrainer], player: &PlayerRecord) -> Option<&'a GymTrainer> {
    ladder.iter().find(|t| !player.has_defeated(t.id)).copied()
}

pub fn ladder_view(world: &WorldCatalog, gym: &Gym, player: &PlayerRecord) -> LadderView {
    let ladder = world.ladder(gym.id);
    let leader_id = ladder.last().map(|t| t.id);
    let trainers: Vec<TrainerStatus> = ladder
        .iter()
        .map(|t| TrainerStatus {
            trainer_id: t.id,
            name: t.name.clone(),
            order: t.order,
            defeated: player.has_defeated(t.id),
            is_leader: Some(t.id) == leader_id,
            money_reward: t.money_reward,
            item_reward: t.item_reward,
        })
        .collect();
    let next_trainer_id = next_undefeated(&ladder, player).map(|t| t.id);
    let complete = next_trainer_id.is_none();
    let badge_owned = player.has_badge(gym.id);
    LadderView {
        gym_id: gym.id,
        gym_name: gym.name.clone(),
        trainers,
        next_trainer_id,
        complete,
        badge_owned,
        badge_claimable: complete && !badge_owned,
    }
}

/// The ladder of the gym at the player's location.
pub fn open_gym(world: &WorldCatalog, player: &PlayerRecord) -> Result<LadderView, AdventureError> {
    let location_id = player.current_location_id;
    let Some(gym) = world.gym_at(location_id) else {
        let flagged = world
            .location(location_id)
            .and_then(|l| world.type_of(l))
            .map(|t| t.has_gym)
            .unwrap_or(false);
        if flagged {
            warn!(target: "content", "location {} is flagged as a gym town but has no gym", location_id);
        }
        return Err(AdventureError::NoGymHere(location_id));
    };
    if gym.closed {
        return Err(AdventureError::GymClosed);
    }
    Ok(ladder_view(world, gym, player))
}

/// Beat a trainer. Victory is automatic; the reward is paid once.
pub fn fight_trainer(
    store: &AdventureStore,
    world: &WorldCatalog,
    rules: LadderRules,
    key: PlayerKey,
    gym_id: u32,
    trainer_id: u32,
    now: DateTime<Utc>,
) -> Result<TrainerVictory, AdventureError> {
    let gym = world.gym(gym_id).ok_or(AdventureError::GymNotFound(gym_id))?;
    let ladder = world.ladder(gym.id);
    let trainer = ladder
        .iter()
        .find(|t| t.id == trainer_id)
        .copied()
        .ok_or(AdventureError::TrainerNotFound(trainer_id))?;
    let leader_id = ladder.last().map(|t| t.id);

    let victory = store.update_player(key, |player| {
        if player.current_location_id != gym.location_id {
            return Err(AdventureError::WrongLocation);
        }
        if gym.closed {
            return Err(AdventureError::GymClosed);
        }
        if player.has_defeated(trainer.id) {
            return Err(AdventureError::TrainerAlreadyDefeated(trainer.id));
        }
        if rules.strict_order {
            if let Some(next) = next_undefeated(&ladder, player) {
                if next.id != trainer.id {
                    return Err(AdventureError::LadderOutOfOrder { next: next.id });
                }
            }
        }

        let progress = player.gym_trainers.entry(trainer.id).or_insert(TrainerProgress {
            defeated: false,
            first_defeated_at: now,
        });
        progress.defeated = true;

        player.money = player.money.saturating_add(trainer.money_reward);
        let item = trainer.item_reward.filter(|r| r.quantity > 0);
        if let Some(reward) = item {
            inventory::add_items(player, reward.item_type_id, reward.quantity);
        }

        Ok(TrainerVictory {
            gym_id: gym.id,
            trainer_id: trainer.id,
            trainer_name: trainer.name.clone(),
            money: trainer.money_reward,
            item,
            leader_defeated: Some(trainer.id) == leader_id,
            ladder_complete: next_undefeated(&ladder, player).is_none(),
        })
    })?;

    if victory.leader_defeated {
        info!("player {} defeated the leader of {}", key, gym.code);
    }
    Ok(victory)
}

/// Issue the gym's badge. Exactly one badge record per (player, gym).
pub fn claim_badge(
    store: &AdventureStore,
    world: &WorldCatalog,
    rules: LadderRules,
    key: PlayerKey,
    gym_id: u32,
    now: DateTime<Utc>,
) -> Result<BadgeRecord, AdventureError> {
    let gym = world.gym(gym_id).ok_or(AdventureError::GymNotFound(gym_id))?;
    let ladder = world.ladder(gym.id);

    let badge = store.update_player(key, |player| {
        if player.current_location_id != gym.location_id {
            return Err(AdventureError::WrongLocation);
        }
        if player.has_badge(gym.id) {
            return Err(AdventureError::BadgeAlreadyOwned);
        }
        if rules.strict_order && next_undefeated(&ladder, player).is_some() {
            return Err(AdventureError::LadderIncomplete);
        }
        let badge = BadgeRecord { obtained_at: now };
        player.badges.insert(gym.id, badge);
        Ok(badge)
    })?;

    info!("player {} earned the {} badge", key, gym.code);
    Ok(badge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::{canonical_world, BOULDER_GYM, PEWTER_CITY, POTION, ROUTE_2};
    use crate::adventure::storage::AdventureStoreBuilder;
    use tempfile::TempDir;

    fn setup(location: u32) -> (TempDir, AdventureStore, PlayerKey) {
        let dir = TempDir::new().expect("tempdir");
        let store = AdventureStoreBuilder::new(dir.path()).open().expect("store");
        let key = PlayerKey::new(2, 3);
        store
            .create_player(PlayerRecord::new(key, location, 5, 5, Utc::now()))
            .expect("player");
        (dir, store, key)
    }

    #[test]
    fn ladder_view_marks_leader_and_next() {
        let world = canonical_world();
        let player = PlayerRecord::new(PlayerKey::new(1, 1), PEWTER_CITY, 5, 5, Utc::now());
        let view = open_gym(&world, &player).expect("gym");
        assert_eq!(view.trainers.len(), 3);
        assert!(view.trainers[2].is_leader);
        assert!(!view.trainers[0].is_leader);
        assert_eq!(view.next_trainer_id, Some(1));
        assert!(!view.badge_claimable);
    }

    #[test]
    fn no_gym_outside_gym_towns() {
        let world = canonical_world();
        let player = PlayerRecord::new(PlayerKey::new(1, 1), ROUTE_2, 5, 5, Utc::now());
        assert!(matches!(open_gym(&world, &player), Err(AdventureError::NoGymHere(ROUTE_2))));
    }

    #[test]
    fn fight_pays_once_and_keeps_first_timestamp() {
        let (_dir, store, key) = setup(PEWTER_CITY);
        let world = canonical_world();
        let rules = LadderRules::default();
        let t1 = Utc::now();
        fight_trainer(&store, &world, rules, key, BOULDER_GYM, 1, t1).expect("first");
        let victory = fight_trainer(&store, &world, rules, key, BOULDER_GYM, 2, t1).expect("second");
        assert_eq!(victory.item.map(|i| i.item_type_id), Some(POTION));

        assert!(matches!(
            fight_trainer(&store, &world, rules, key, BOULDER_GYM, 1, t1 + chrono::Duration::hours(1)),
            Err(AdventureError::TrainerAlreadyDefeated(1))
        ));
        let player = store.get_player(key).expect("player");
        assert_eq!(player.money, 250);
        assert_eq!(player.gym_trainers[&1].first_defeated_at, t1);
        assert_eq!(inventory::quantity_of(&player, POTION), 2);
    }

    #[test]
    fn strict_rules_enforce_order_and_completion() {
        let (_dir, store, key) = setup(PEWTER_CITY);
        let world = canonical_world();
        let rules = LadderRules::default();
        assert!(matches!(
            fight_trainer(&store, &world, rules, key, BOULDER_GYM, 3, Utc::now()),
            Err(AdventureError::LadderOutOfOrder { next: 1 })
        ));
        assert!(matches!(
            claim_badge(&store, &world, rules, key, BOULDER_GYM, Utc::now()),
            Err(AdventureError::LadderIncomplete)
        ));
    }

    #[test]
    fn relaxed_rules_allow_any_order() {
        let (_dir, store, key) = setup(PEWTER_CITY);
        let world = canonical_world();
        let rules = LadderRules { strict_order: false };
        let victory =
            fight_trainer(&store, &world, rules, key, BOULDER_GYM, 3, Utc::now()).expect("leader");
        assert!(victory.leader_defeated);
        assert!(!victory.ladder_complete);
        claim_badge(&store, &world, rules, key, BOULDER_GYM, Utc::now()).expect("badge");
    }

    #[test]
    fn fighting_elsewhere_is_refused() {
        let (_dir, store, key) = setup(ROUTE_2);
        let world = canonical_world();
        assert!(matches!(
            fight_trainer(&store, &world, LadderRules::default(), key, BOULDER_GYM, 1, Utc::now()),
            Err(AdventureError::WrongLocation)
        ));
        assert!(matches!(
            claim_badge(&store, &world, LadderRules::default(), key, BOULDER_GYM, Utc::now()),
            Err(AdventureError::WrongLocation)
        ));
    }
}
