//! Tutorial missions and step rewards.
//!
//! This module handles:
//! - Marking missions complete when a condition code is pulsed
//! - Working out the player's current step
//! - One-time step reward claims
//!
//! Pulsing is fire-and-forget: any feature may pulse a code after a relevant
//! action, whether or not the mission belongs to the player's current step.

use chrono::{DateTime, Utc};
use log::debug;

use crate::adventure::{
    errors::AdventureError,
    inventory,
    storage::AdventureStore,
    types::{MissionProgress, PlayerKey, PlayerRecord, StepProgress},
    world::{ItemReward, TutorialStep, WorldCatalog},
};

/// Condition codes pulsed by the engines.
pub mod conditions {
    pub const MOVE_ONCE: &str = "MOVE_ONCE";
    pub const ENCOUNTER_ONCE: &str = "ENCOUNTER_ONCE";
    pub const CATCH_ONCE: &str = "CATCH_ONCE";
    pub const WILD_FIGHT_ONCE: &str = "WILD_FIGHT_ONCE";
    pub const SHOP_BUY_ONCE: &str = "SHOP_BUY_ONCE";
    pub const GYM_TRAINER_DEFEATED: &str = "GYM_TRAINER_DEFEATED";
    pub const BADGE_OBTAINED: &str = "BADGE_OBTAINED";
    pub const POKEDEX_5_AND_CMD: &str = "POKEDEX_5_AND_CMD";
}

/// Mark every mission tagged with `condition_code` as completed on the record.
/// Returns how many missions flipped to completed.
pub fn mark_missions(
    player: &mut PlayerRecord,
    world: &WorldCatalog,
    condition_code: &str,
    now: DateTime<Utc>,
) -> usize {
    let mut newly_completed = 0;
    for mission in world.missions_with_condition(condition_code) {
        let progress = player.missions.entry(mission.id).or_insert(MissionProgress {
            completed: false,
            completed_at: None,
        });
        if !progress.completed {
            progress.completed = true;
            progress.completed_at = Some(now);
            newly_completed += 1;
        }
    }
    newly_completed
}

/// Pulse a condition code for a player. A player without a record is a no-op.
pub fn complete_missions_with_condition(
    store: &AdventureStore,
    world: &WorldCatalog,
    key: PlayerKey,
    condition_code: &str,
    now: DateTime<Utc>,
) -> Result<usize, AdventureError> {
    if world.missions_with_condition(condition_code).next().is_none() {
        return Ok(0);
    }
    let Some(player) = store.find_player(key)? else {
        return Ok(0);
    };
    let all_done = world
        .missions_with_condition(condition_code)
        .all(|m| player.mission_completed(m.id));
    if all_done {
        return Ok(0);
    }
    let flipped = store.update_player(key, |p| Ok(mark_missions(p, world, condition_code, now)))?;
    if flipped > 0 {
        debug!(
            "player {} completed {} mission(s) via {}",
            key, flipped, condition_code
        );
    }
    Ok(flipped)
}

/// Reward granted by a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReward {
    pub step_id: u32,
    pub money: u64,
    pub item: Option<ItemReward>,
}

fn all_missions_complete(world: &WorldCatalog, player: &PlayerRecord, step_id: u32) -> bool {
    world
        .missions_of(step_id)
        .iter()
        .all(|m| player.mission_completed(m.id))
}

fn reward_claimed(player: &PlayerRecord, step_id: u32) -> bool {
    player
        .steps
        .get(&step_id)
        .map(|s| s.reward_claimed)
        .unwrap_or(false)
}

/// Claim the one-time reward of a step whose missions are all complete.
pub fn claim_step_reward(
    store: &AdventureStore,
    world: &WorldCatalog,
    key: PlayerKey,
    step_id: u32,
    now: DateTime<Utc>,
) -> Result<StepReward, AdventureError> {
    let step = world
        .step(step_id)
        .ok_or(AdventureError::StepNotFound(step_id))?;

    store.update_player(key, |player| {
        if !all_missions_complete(world, player, step.id) {
            return Err(AdventureError::NotAllMissionsComplete);
        }
        if reward_claimed(player, step.id) {
            return Err(AdventureError::RewardAlreadyClaimed);
        }

        player.money = player.money.saturating_add(step.reward_money);
        let item = step.reward_item.filter(|r| r.quantity > 0);
        if let Some(reward) = item {
            inventory::add_items(player, reward.item_type_id, reward.quantity);
        }
        player.steps.insert(
            step.id,
            StepProgress {
                reward_claimed: true,
                claimed_at: Some(now),
            },
        );
        Ok(StepReward {
            step_id: step.id,
            money: step.reward_money,
            item,
        })
    })
}

/// First step in order with an incomplete mission, else the last step.
pub fn current_step<'a>(world: &'a WorldCatalog, player: &PlayerRecord) -> Option<&'a TutorialStep> {
    let steps = world.steps();
    steps
        .iter()
        .find(|s| !all_missions_complete(world, player, s.id))
        .or(steps.last())
        .copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionStatus {
    pub mission_id: u32,
    pub code: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialView {
    pub step_id: u32,
    pub step_code: String,
    /// 1-based position of the step.
    pub position: usize,
    pub total_steps: usize,
    pub missions: Vec<MissionStatus>,
    pub reward_money: u64,
    pub reward_item: Option<ItemReward>,
    pub claimed: bool,
    pub claimable: bool,
}

/// Status of the player's current step, or `None` when no tutorial is authored.
pub fn tutorial_status(world: &WorldCatalog, player: &PlayerRecord) -> Option<TutorialView> {
    let step = current_step(world, player)?;
    let steps = world.steps();
    let position = steps.iter().position(|s| s.id == step.id).unwrap_or(0) + 1;
    let missions: Vec<MissionStatus> = world
        .missions_of(step.id)
        .into_iter()
        .map(|m| MissionStatus {
            mission_id: m.id,
            code: m.code.clone(),
            completed: player.mission_completed(m.id),
        })
        .collect();
    let complete = missions.iter().all(|m| m.completed);
    let claimed = reward_claimed(player, step.id);
    Some(TutorialView {
        step_id: step.id,
        step_code: step.code.clone(),
        position,
        total_steps: steps.len(),
        missions,
        reward_money: step.reward_money,
        reward_item: step.reward_item,
        claimed,
        claimable: complete && !claimed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::{canonical_world, POKE_BALL};
    use crate::adventure::storage::AdventureStoreBuilder;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AdventureStore, WorldCatalog, PlayerKey) {
        let dir = TempDir::new().expect("tempdir");
        let store = AdventureStoreBuilder::new(dir.path()).open().expect("store");
        let key = PlayerKey::new(5, 6);
        store
            .create_player(PlayerRecord::new(key, 1, 5, 5, Utc::now()))
            .expect("player");
        (dir, store, canonical_world(), key)
    }

    #[test]
    fn pulse_is_idempotent() {
        let (_dir, store, world, key) = setup();
        let now = Utc::now();
        assert_eq!(
            complete_missions_with_condition(&store, &world, key, conditions::MOVE_ONCE, now)
                .expect("pulse"),
            1
        );
        let first = store.get_player(key).expect("player").missions[&1];
        assert_eq!(
            complete_missions_with_condition(
                &store,
                &world,
                key,
                conditions::MOVE_ONCE,
                now + chrono::Duration::hours(1)
            )
            .expect("pulse"),
            0
        );
        assert_eq!(store.get_player(key).expect("player").missions[&1], first);
    }

    #[test]
    fn pulse_for_unknown_player_or_code_is_noop() {
        let (_dir, store, world, _key) = setup();
        let stranger = PlayerKey::new(5, 999);
        assert_eq!(
            complete_missions_with_condition(&store, &world, stranger, conditions::MOVE_ONCE, Utc::now())
                .expect("noop"),
            0
        );
        assert_eq!(
            complete_missions_with_condition(&store, &world, stranger, "NOTHING", Utc::now())
                .expect("noop"),
            0
        );
    }

    #[test]
    fn claim_requires_every_mission_and_pays_once() {
        let (_dir, store, world, key) = setup();
        let now = Utc::now();
        complete_missions_with_condition(&store, &world, key, conditions::MOVE_ONCE, now)
            .expect("pulse");
        assert!(matches!(
            claim_step_reward(&store, &world, key, 1, now),
            Err(AdventureError::NotAllMissionsComplete)
        ));
        complete_missions_with_condition(&store, &world, key, conditions::ENCOUNTER_ONCE, now)
            .expect("pulse");

        let reward = claim_step_reward(&store, &world, key, 1, now).expect("claim");
        assert_eq!(reward.money, 500);
        assert!(matches!(
            claim_step_reward(&store, &world, key, 1, now),
            Err(AdventureError::RewardAlreadyClaimed)
        ));

        let player = store.get_player(key).expect("player");
        assert_eq!(player.money, 500);
        assert_eq!(inventory::quantity_of(&player, POKE_BALL), 5);
        assert!(player.steps[&1].reward_claimed);
    }

    #[test]
    fn unknown_step_is_reported() {
        let (_dir, store, world, key) = setup();
        assert!(matches!(
            claim_step_reward(&store, &world, key, 77, Utc::now()),
            Err(AdventureError::StepNotFound(77))
        ));
    }

    #[test]
    fn current_step_moves_forward_and_sticks_on_last() {
        let (_dir, store, world, key) = setup();
        let player = store.get_player(key).expect("player");
        assert_eq!(current_step(&world, &player).map(|s| s.id), Some(1));

        let mut done = player.clone();
        for code in [
            conditions::MOVE_ONCE,
            conditions::ENCOUNTER_ONCE,
            conditions::CATCH_ONCE,
            conditions::SHOP_BUY_ONCE,
            conditions::POKEDEX_5_AND_CMD,
        ] {
            mark_missions(&mut done, &world, code, Utc::now());
        }
        assert_eq!(current_step(&world, &done).map(|s| s.id), Some(3));

        mark_missions(&mut done, &world, conditions::GYM_TRAINER_DEFEATED, Utc::now());
        mark_missions(&mut done, &world, conditions::BADGE_OBTAINED, Utc::now());
        let view = tutorial_status(&world, &done).expect("view");
        assert_eq!(view.step_id, 3);
        assert_eq!(view.position, 3);
        assert!(view.claimable);
    }
}
