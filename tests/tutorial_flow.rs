//! Mission pulses and step reward claims.

mod common;

use chrono::Utc;
use pokebot::adventure::{
    claim_step_reward, complete_missions_with_condition, conditions, inventory,
    seed::{GREAT_BALL, PALLET_TOWN, POKE_BALL},
    tutorial, AdventureError, PlayerKey,
};

#[test]
fn first_step_claims_exactly_once() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(6, 1);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);

    let err = claim_step_reward(&store, &world, key, 1, now).unwrap_err();
    assert!(matches!(err, AdventureError::NotAllMissionsComplete));

    assert_eq!(
        complete_missions_with_condition(&store, &world, key, conditions::MOVE_ONCE, now).unwrap(),
        1
    );
    // Repeated pulses are no-ops.
    assert_eq!(
        complete_missions_with_condition(&store, &world, key, conditions::MOVE_ONCE, now).unwrap(),
        0
    );
    complete_missions_with_condition(&store, &world, key, conditions::ENCOUNTER_ONCE, now).unwrap();

    let reward = claim_step_reward(&store, &world, key, 1, now).unwrap();
    assert_eq!(reward.money, 500);
    let err = claim_step_reward(&store, &world, key, 1, now).unwrap_err();
    assert!(matches!(err, AdventureError::RewardAlreadyClaimed));

    let player = store.get_player(key).unwrap();
    assert_eq!(player.money, 500);
    assert_eq!(inventory::quantity_of(&player, POKE_BALL), 5);
    assert!(player.steps[&1].reward_claimed);
}

#[test]
fn pulses_complete_missions_outside_the_current_step() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(6, 2);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);

    for code in [
        conditions::CATCH_ONCE,
        conditions::SHOP_BUY_ONCE,
        conditions::POKEDEX_5_AND_CMD,
    ] {
        complete_missions_with_condition(&store, &world, key, code, now).unwrap();
    }
    let player = store.get_player(key).unwrap();
    let view = tutorial::tutorial_status(&world, &player).unwrap();
    assert_eq!(view.step_id, 1);
    assert!(!view.claimable);

    let reward = claim_step_reward(&store, &world, key, 2, now).unwrap();
    assert_eq!(reward.money, 300);
    let player = store.get_player(key).unwrap();
    assert_eq!(inventory::quantity_of(&player, GREAT_BALL), 1);
}

#[test]
fn status_walks_through_steps() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(6, 3);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);

    for code in [conditions::MOVE_ONCE, conditions::ENCOUNTER_ONCE] {
        complete_missions_with_condition(&store, &world, key, code, now).unwrap();
    }
    let player = store.get_player(key).unwrap();
    let view = tutorial::tutorial_status(&world, &player).unwrap();
    assert_eq!((view.step_id, view.position, view.total_steps), (2, 2, 3));
    assert_eq!(view.missions.len(), 3);
    assert!(view.missions.iter().all(|m| !m.completed));
}

#[test]
fn unknown_step_and_missing_player() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(6, 4);
    let now = Utc::now();

    assert_eq!(
        complete_missions_with_condition(&store, &world, key, conditions::MOVE_ONCE, now).unwrap(),
        0
    );
    assert!(matches!(
        claim_step_reward(&store, &world, key, 99, now),
        Err(AdventureError::StepNotFound(99))
    ));
    assert!(matches!(
        claim_step_reward(&store, &world, key, 1, now),
        Err(AdventureError::PlayerNotFound)
    ));
}
