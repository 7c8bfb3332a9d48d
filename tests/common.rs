//! Shared fixtures for the integration tests: throwaway stores, the built-in
//! world and players placed at a given location.

use chrono::{DateTime, Utc};
use pokebot::adventure::{
    canonical_world, inventory, AdventureStore, AdventureStoreBuilder, PlayerKey, PlayerRecord,
    WildEncounter, WorldCatalog,
};
use tempfile::TempDir;

/// Store in a fresh temp dir. Keep the `TempDir` alive for the test's duration.
pub fn temp_store() -> (AdventureStore, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = AdventureStoreBuilder::new(dir.path()).open().expect("open store");
    (store, dir)
}

#[allow(dead_code)]
pub fn world() -> WorldCatalog {
    canonical_world()
}

/// Persist a player at `location` with `stamina` out of 5.
#[allow(dead_code)]
pub fn player_at(
    store: &AdventureStore,
    key: PlayerKey,
    location: u32,
    stamina: u32,
    now: DateTime<Utc>,
) -> PlayerRecord {
    let mut player = PlayerRecord::new(key, location, stamina, 5, now);
    player.current_stamina = stamina;
    store.create_player(player.clone()).expect("create player");
    player
}

/// Give a stored player some items.
#[allow(dead_code)]
pub fn give_items(store: &AdventureStore, key: PlayerKey, item_type_id: u32, quantity: u32) {
    store
        .update_player(key, |p| {
            inventory::add_items(p, item_type_id, quantity);
            Ok(())
        })
        .expect("give items");
}

/// Leave a wild creature waiting at the player's current location.
#[allow(dead_code)]
pub fn wild_appears(store: &AdventureStore, key: PlayerKey, species_id: u32, level: u32) {
    store
        .update_player(key, |p| {
            p.pending_encounter = Some(WildEncounter {
                species_id,
                level,
                location_id: p.current_location_id,
                appeared_at: Utc::now(),
            });
            Ok(())
        })
        .expect("wild encounter");
}
