/// Inventory operations on a player's item stacks
use super::types::{ItemStack, PlayerRecord};
use super::world::WorldCatalog;

/// Add items, creating the stack or incrementing an existing one.
pub fn add_items(player: &mut PlayerRecord, item_type_id: u32, quantity: u32) {
    if quantity == 0 {
        return;
    }
    if let Some(stack) = player
        .inventory
        .iter_mut()
        .find(|s| s.item_type_id == item_type_id)
    {
        stack.quantity = stack.quantity.saturating_add(quantity);
        return;
    }
    player.inventory.push(ItemStack {
        item_type_id,
        quantity,
    });
}

/// Remove exactly `quantity` items. Returns false, leaving the inventory
/// untouched, when the player holds fewer than that.
pub fn remove_items(player: &mut PlayerRecord, item_type_id: u32, quantity: u32) -> bool {
    let Some(index) = player
        .inventory
        .iter()
        .position(|s| s.item_type_id == item_type_id)
    else {
        return quantity == 0;
    };
    let stack = &mut player.inventory[index];
    if stack.quantity < quantity {
        return false;
    }
    stack.quantity -= quantity;
    if stack.quantity == 0 {
        player.inventory.remove(index);
    }
    true
}

/// Check if player has at least a certain quantity of an item
pub fn has_item(player: &PlayerRecord, item_type_id: u32, quantity: u32) -> bool {
    quantity_of(player, item_type_id) >= quantity
}

/// Get the quantity of an item in inventory
pub fn quantity_of(player: &PlayerRecord, item_type_id: u32) -> u32 {
    player
        .inventory
        .iter()
        .find(|s| s.item_type_id == item_type_id)
        .map(|s| s.quantity)
        .unwrap_or(0)
}

/// One line per stack, ordered by item type.
pub fn format_inventory(player: &PlayerRecord, world: &WorldCatalog) -> Vec<String> {
    let mut stacks: Vec<&ItemStack> = player.inventory.iter().filter(|s| s.quantity > 0).collect();
    if stacks.is_empty() {
        return vec!["Your bag is empty.".to_string()];
    }
    stacks.sort_by_key(|s| s.item_type_id);
    stacks
        .iter()
        .map(|s| format!("{} x{}", world.item_name(s.item_type_id), s.quantity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::types::PlayerKey;
    use chrono::Utc;

    fn player() -> PlayerRecord {
        PlayerRecord::new(PlayerKey::new(1, 1), 1, 5, 5, Utc::now())
    }

    #[test]
    fn add_stacks_onto_existing_row() {
        let mut p = player();
        add_items(&mut p, 4, 2);
        add_items(&mut p, 4, 3);
        add_items(&mut p, 1, 0);
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(quantity_of(&p, 4), 5);
    }

    #[test]
    fn remove_never_goes_negative() {
        let mut p = player();
        add_items(&mut p, 1, 1);
        assert!(!remove_items(&mut p, 1, 2));
        assert_eq!(quantity_of(&p, 1), 1);
        assert!(remove_items(&mut p, 1, 1));
        assert!(p.inventory.is_empty());
        assert!(!remove_items(&mut p, 1, 1));
        assert!(!has_item(&p, 1, 1));
    }
}
