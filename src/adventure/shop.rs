//! Store catalogs and purchases.
//!
//! This module provides:
//! - The store assigned to the player's location
//! - Purchase validation (quantity, availability, funds)
//! - Atomic debit plus inventory credit

use crate::adventure::{
    errors::AdventureError,
    inventory,
    storage::AdventureStore,
    types::{PlayerKey, PlayerRecord},
    world::{StoreItem, StoreType, WorldCatalog},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ShopView<'a> {
    pub store: &'a StoreType,
    pub items: Vec<&'a StoreItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    pub store_item_id: u32,
    pub item_type_id: u32,
    pub quantity: u32,
    pub total_price: u64,
    pub money_left: u64,
}

/// Store open at a location, if its type allows shopping and one is assigned.
pub fn open_shop<'a>(
    world: &'a WorldCatalog,
    location_id: u32,
) -> Result<ShopView<'a>, AdventureError> {
    let has_shop = world
        .location(location_id)
        .and_then(|l| world.type_of(l))
        .map(|t| t.has_shop)
        .unwrap_or(false);
    if !has_shop {
        return Err(AdventureError::NoShopHere);
    }
    let store = world
        .store_at(location_id)
        .ok_or(AdventureError::NoShopHere)?;
    Ok(ShopView {
        store,
        items: world.store_items(store.id),
    })
}

/// Resolve what buying `quantity` of `store_item_id` costs the player right now.
pub fn quote<'a>(
    world: &'a WorldCatalog,
    player: &PlayerRecord,
    store_item_id: u32,
    quantity: u32,
) -> Result<(&'a StoreItem, u64), AdventureError> {
    if quantity == 0 {
        return Err(AdventureError::InvalidQuantity);
    }
    let view = open_shop(world, player.current_location_id)?;
    let item = view
        .items
        .into_iter()
        .find(|i| i.id == store_item_id)
        .ok_or(AdventureError::ItemUnavailable(store_item_id))?;
    let total = item
        .price
        .checked_mul(quantity as u64)
        .ok_or(AdventureError::InvalidQuantity)?;
    Ok((item, total))
}

/// Buy items from the store at the player's location.
pub fn buy(
    store: &AdventureStore,
    world: &WorldCatalog,
    key: PlayerKey,
    store_item_id: u32,
    quantity: u32,
) -> Result<Purchase, AdventureError> {
    store.update_player(key, |player| {
        let (item, total_price) = quote(world, player, store_item_id, quantity)?;
        if player.money < total_price {
            return Err(AdventureError::NotEnoughMoney {
                needed: total_price,
                available: player.money,
            });
        }
        player.money -= total_price;
        inventory::add_items(player, item.item_type_id, quantity);
        Ok(Purchase {
            store_item_id: item.id,
            item_type_id: item.item_type_id,
            quantity,
            total_price,
            money_left: player.money,
        })
    })
}

/// Format shop inventory listing
pub fn format_shop_listing(world: &WorldCatalog, view: &ShopView<'_>) -> Vec<String> {
    let mut lines = vec![format!("=== {} ===", view.store.name)];
    if view.items.is_empty() {
        lines.push("No items for sale.".to_string());
        return lines;
    }
    for (idx, item) in view.items.iter().enumerate() {
        lines.push(format!(
            "{}. {} - ${} (#{})",
            idx + 1,
            world.item_name(item.item_type_id),
            item.price,
            item.id
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::{canonical_world, POKE_BALL, PALLET_TOWN, VIRIDIAN_CITY};
    use crate::adventure::storage::AdventureStoreBuilder;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup(location: u32, money: u64) -> (TempDir, AdventureStore, PlayerKey) {
        let dir = TempDir::new().expect("tempdir");
        let store = AdventureStoreBuilder::new(dir.path()).open().expect("store");
        let key = PlayerKey::new(4, 4);
        let mut player = PlayerRecord::new(key, location, 5, 5, Utc::now());
        player.money = money;
        store.create_player(player).expect("player");
        (dir, store, key)
    }

    #[test]
    fn lists_enabled_items_in_order() {
        let world = canonical_world();
        let view = open_shop(&world, VIRIDIAN_CITY).expect("shop");
        let ids: Vec<u32> = view.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(matches!(open_shop(&world, PALLET_TOWN), Err(AdventureError::NoShopHere)));
    }

    #[test]
    fn purchase_debits_and_credits_together() {
        let (_dir, store, key) = setup(VIRIDIAN_CITY, 1000);
        let world = canonical_world();
        let purchase = buy(&store, &world, key, 1, 3).expect("buy");
        assert_eq!(purchase.total_price, 600);
        assert_eq!(purchase.money_left, 400);

        assert!(matches!(
            buy(&store, &world, key, 1, 3),
            Err(AdventureError::NotEnoughMoney { needed: 600, available: 400 })
        ));
        let player = store.get_player(key).expect("player");
        assert_eq!(player.money, 400);
        assert_eq!(inventory::quantity_of(&player, POKE_BALL), 3);
    }

    #[test]
    fn rejects_zero_quantity_and_unlisted_items() {
        let (_dir, store, key) = setup(VIRIDIAN_CITY, 10_000);
        let world = canonical_world();
        assert!(matches!(buy(&store, &world, key, 1, 0), Err(AdventureError::InvalidQuantity)));
        // Disabled catalog entry.
        assert!(matches!(buy(&store, &world, key, 4, 1), Err(AdventureError::ItemUnavailable(4))));
        assert_eq!(store.get_player(key).expect("player").money, 10_000);
    }
}
