//! Travel along the location graph and badge-gated edges.

mod common;

use chrono::Utc;
use pokebot::adventure::{
    claim_badge, fight_trainer, move_player, movement,
    seed::{BOULDER_GYM, PALLET_TOWN, PEWTER_CITY, ROUTE_1, ROUTE_3, VIRIDIAN_CITY},
    AdventureError, GuildSettings, LadderRules, MoveEvent, PlayerKey,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn gated_edge_requires_badge_and_never_moves() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let settings = GuildSettings::new(1);
    let key = PlayerKey::new(1, 20);
    let now = Utc::now();
    common::player_at(&store, key, PEWTER_CITY, 5, now);
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..3 {
        let err = move_player(&store, &world, &settings, key, ROUTE_3, now, &mut rng).unwrap_err();
        assert!(matches!(err, AdventureError::RequiresBadge(BOULDER_GYM)));
    }
    let player = store.get_player(key).unwrap();
    assert_eq!(player.current_location_id, PEWTER_CITY);
    assert_eq!(player.current_stamina, 5);
}

#[test]
fn badge_opens_the_road() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let settings = GuildSettings::new(1);
    let rules = LadderRules::default();
    let key = PlayerKey::new(1, 21);
    let now = Utc::now();
    common::player_at(&store, key, PEWTER_CITY, 5, now);
    let mut rng = StdRng::seed_from_u64(2);

    for trainer in 1..=3 {
        fight_trainer(&store, &world, rules, key, BOULDER_GYM, trainer, now).unwrap();
    }
    claim_badge(&store, &world, rules, key, BOULDER_GYM, now).unwrap();

    let outcome = move_player(&store, &world, &settings, key, ROUTE_3, now, &mut rng).unwrap();
    assert_eq!(outcome.from_location_id, PEWTER_CITY);
    assert_eq!(outcome.to_location_id, ROUTE_3);
    assert_eq!(store.get_player(key).unwrap().current_location_id, ROUTE_3);
}

#[test]
fn unconnected_destination_is_refused() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let settings = GuildSettings::new(1);
    let key = PlayerKey::new(1, 22);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);
    let mut rng = StdRng::seed_from_u64(3);

    let err =
        move_player(&store, &world, &settings, key, VIRIDIAN_CITY, now, &mut rng).unwrap_err();
    assert!(matches!(err, AdventureError::InvalidDestination(VIRIDIAN_CITY)));
    let err = move_player(&store, &world, &settings, key, 999, now, &mut rng).unwrap_err();
    assert!(matches!(err, AdventureError::InvalidDestination(999)));
}

#[test]
fn destinations_list_only_open_edges() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let settings = GuildSettings::new(1);
    let key = PlayerKey::new(1, 23);
    let now = Utc::now();
    common::player_at(&store, key, PEWTER_CITY, 1, now);

    let (_, edges) = movement::destinations(&store, &world, &settings, key, now).unwrap();
    let targets: Vec<u32> = edges.iter().map(|e| e.to_location_id).collect();
    assert!(!targets.contains(&ROUTE_3));
    assert!(!targets.is_empty());

    let missing = PlayerKey::new(1, 999);
    assert!(matches!(
        movement::destinations(&store, &world, &settings, missing, now),
        Err(AdventureError::PlayerNotFound)
    ));
}

#[test]
fn move_events_pay_out_in_the_same_write() {
    let (store, _tmp) = common::temp_store();
    let world = common::world();
    let mut settings = GuildSettings::new(1);
    settings.move_item_event_chance = 100;
    settings.move_battle_event_chance = 100;
    settings.move_battle_min_reward = 5;
    settings.move_battle_max_reward = 15;
    let key = PlayerKey::new(1, 24);
    let now = Utc::now();
    common::player_at(&store, key, PALLET_TOWN, 5, now);
    let mut rng = StdRng::seed_from_u64(4);

    let outcome = move_player(&store, &world, &settings, key, ROUTE_1, now, &mut rng).unwrap();
    let player = store.get_player(key).unwrap();
    let mut items_found = 0;
    let mut money_won = 0;
    for event in &outcome.events {
        match *event {
            MoveEvent::ItemFound { quantity, .. } => items_found += quantity,
            MoveEvent::BattleWon { money } => {
                assert!((5..=15).contains(&money));
                money_won += money;
            }
            MoveEvent::BattleLost => {}
        }
    }
    assert!(items_found >= 1);
    assert_eq!(player.money, money_won);
    let held: u32 = player.inventory.iter().map(|s| s.quantity).sum();
    assert_eq!(held, items_found);
}
