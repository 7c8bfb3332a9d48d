//! Many writers racing on one player record. Every read-modify-write goes
//! through `update_player`, so a resource can only be spent once.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use chrono::Utc;
use pokebot::adventure::{
    attempt_capture, claim_step_reward, complete_missions_with_condition, conditions, encounter,
    inventory,
    seed::{PALLET_TOWN, POKE_BALL, ROUTE_1},
    AdventureError, CaptureRules, GuildSettings, PlayerKey, WildEncounter,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WRITERS: u64 = 32;
const PIDGEY: u32 = 16;

#[test]
fn racing_encounters_spend_each_stamina_point_once() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(11, 1);
    let now = Utc::now();
    common::player_at(&store, key, ROUTE_1, 5, now);
    let settings = GuildSettings::new(11);

    let ok = AtomicUsize::new(0);
    let refused = AtomicUsize::new(0);
    thread::scope(|scope| {
        for seed in 0..WRITERS {
            let (store, world, settings) = (&store, &world, &settings);
            let (ok, refused) = (&ok, &refused);
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                match encounter(store, world, settings, key, now, &mut rng) {
                    Ok(_) => ok.fetch_add(1, Ordering::SeqCst),
                    Err(AdventureError::NoStamina) => refused.fetch_add(1, Ordering::SeqCst),
                    Err(other) => panic!("unexpected error: {}", other),
                };
            });
        }
    });

    assert_eq!(ok.load(Ordering::SeqCst), 5);
    assert_eq!(refused.load(Ordering::SeqCst), WRITERS as usize - 5);
    assert_eq!(store.get_player(key).unwrap().current_stamina, 0);
}

#[test]
fn double_presses_on_one_creature_throw_one_ball() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(11, 2);
    let now = Utc::now();
    common::player_at(&store, key, ROUTE_1, 5, now);
    common::give_items(&store, key, POKE_BALL, 10);
    common::wild_appears(&store, key, PIDGEY, 3);
    let rules = CaptureRules::default();

    let ok = AtomicUsize::new(0);
    thread::scope(|scope| {
        for seed in 0..WRITERS {
            let (store, world, rules, ok) = (&store, &world, &rules, &ok);
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                match attempt_capture(
                    store, world, rules, key, PIDGEY, 3, "POKE_BALL", now, &mut rng,
                ) {
                    Ok(_) => {
                        ok.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(AdventureError::NoActiveEncounter) => {}
                    Err(other) => panic!("unexpected error: {}", other),
                }
            });
        }
    });

    assert_eq!(ok.load(Ordering::SeqCst), 1);
    let player = store.get_player(key).unwrap();
    assert_eq!(inventory::quantity_of(&player, POKE_BALL), 9);
    assert!(player.pending_encounter.is_none());
}

#[test]
fn racing_throwers_never_overspend_the_bag() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(11, 3);
    let now = Utc::now();
    common::player_at(&store, key, ROUTE_1, 5, now);
    let balls = 10;
    common::give_items(&store, key, POKE_BALL, balls);
    let rules = CaptureRules::default();

    let thrown = AtomicUsize::new(0);
    thread::scope(|scope| {
        for seed in 0..WRITERS {
            let (store, world, rules, thrown) = (&store, &world, &rules, &thrown);
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                loop {
                    store
                        .update_player(key, |p| {
                            if p.pending_encounter.is_none() {
                                p.pending_encounter = Some(WildEncounter {
                                    species_id: PIDGEY,
                                    level: 3,
                                    location_id: p.current_location_id,
                                    appeared_at: now,
                                });
                            }
                            Ok(())
                        })
                        .unwrap();
                    match attempt_capture(
                        store, world, rules, key, PIDGEY, 3, "POKE_BALL", now, &mut rng,
                    ) {
                        Ok(_) => {
                            thrown.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(AdventureError::NoActiveEncounter) => {}
                        Err(AdventureError::NoCaptureTool(_)) => break,
                        Err(other) => panic!("unexpected error: {}", other),
                    }
                }
            });
        }
    });

    assert_eq!(thrown.load(Ordering::SeqCst), balls as usize);
    let player = store.get_player(key).unwrap();
    assert_eq!(inventory::quantity_of(&player, POKE_BALL), 0);
    assert!(player.inventory.is_empty());
}

#[test]
fn racing_claims_pay_the_step_reward_once() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let key = PlayerKey::new(11, 4);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);
    for code in [conditions::MOVE_ONCE, conditions::ENCOUNTER_ONCE] {
        complete_missions_with_condition(&store, &world, key, code, now).unwrap();
    }

    let ok = AtomicUsize::new(0);
    thread::scope(|scope| {
        for _ in 0..WRITERS {
            let (store, world, ok) = (&store, &world, &ok);
            scope.spawn(move || match claim_step_reward(store, world, key, 1, now) {
                Ok(_) => {
                    ok.fetch_add(1, Ordering::SeqCst);
                }
                Err(AdventureError::RewardAlreadyClaimed) => {}
                Err(other) => panic!("unexpected error: {}", other),
            });
        }
    });

    assert_eq!(ok.load(Ordering::SeqCst), 1);
    let player = store.get_player(key).unwrap();
    assert_eq!(player.money, 500);
    assert_eq!(inventory::quantity_of(&player, POKE_BALL), 5);
}
