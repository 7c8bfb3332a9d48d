//! Stamina regeneration.
//!
//! Stamina refills by `stamina_per_hour` for every *whole* hour elapsed since
//! the last turn. The turn timestamp only advances by the hours that were
//! converted, so a partial hour keeps counting toward the next point.

use chrono::{DateTime, Duration, Utc};

use crate::adventure::errors::AdventureError;
use crate::adventure::storage::AdventureStore;
use crate::adventure::types::{GuildSettings, PlayerKey, PlayerRecord};

/// Apply elapsed-time regeneration. Returns true when the record changed.
pub fn regenerate(player: &mut PlayerRecord, stamina_per_hour: u32, now: DateTime<Utc>) -> bool {
    if player.current_stamina >= player.max_stamina || now <= player.last_turn_at {
        return false;
    }
    let full_hours = (now - player.last_turn_at).num_hours();
    if full_hours <= 0 {
        return false;
    }
    let gain = (full_hours as u64).saturating_mul(stamina_per_hour as u64);
    let refilled = (player.current_stamina as u64).saturating_add(gain);
    player.current_stamina = refilled.min(player.max_stamina as u64) as u32;
    player.last_turn_at += Duration::hours(full_hours);
    true
}

/// Regenerate and persist before any stamina-gated check.
pub fn refresh(
    store: &AdventureStore,
    settings: &GuildSettings,
    key: PlayerKey,
    now: DateTime<Utc>,
) -> Result<PlayerRecord, AdventureError> {
    let player = store.get_player(key)?;
    let mut preview = player.clone();
    if !regenerate(&mut preview, settings.stamina_per_hour, now) {
        return Ok(player);
    }
    store.update_player(key, |p| {
        regenerate(p, settings.stamina_per_hour, now);
        Ok(p.clone())
    })
}

/// Regenerate, then fail with `NoStamina` if nothing is left to spend.
pub(crate) fn require(
    player: &mut PlayerRecord,
    settings: &GuildSettings,
    now: DateTime<Utc>,
) -> Result<(), AdventureError> {
    regenerate(player, settings.stamina_per_hour, now);
    if player.current_stamina == 0 {
        return Err(AdventureError::NoStamina);
    }
    Ok(())
}

/// When the next point arrives, or `None` when already full.
pub fn next_point_at(player: &PlayerRecord) -> Option<DateTime<Utc>> {
    if player.current_stamina >= player.max_stamina {
        None
    } else {
        Some(player.last_turn_at + Duration::hours(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn player_at(stamina: u32, last: DateTime<Utc>) -> PlayerRecord {
        let mut p = PlayerRecord::new(PlayerKey::new(1, 1), 1, 5, 5, last);
        p.current_stamina = stamina;
        p
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn caps_at_max_and_advances_by_whole_hours() {
        let mut p = player_at(2, t0());
        let now = t0() + Duration::hours(3);
        assert!(regenerate(&mut p, 1, now));
        assert_eq!(p.current_stamina, 5);
        assert_eq!(p.last_turn_at, t0() + Duration::hours(3));
    }

    #[test]
    fn keeps_sub_hour_remainder() {
        let mut p = player_at(1, t0());
        let now = t0() + Duration::minutes(150);
        assert!(regenerate(&mut p, 1, now));
        assert_eq!(p.current_stamina, 3);
        assert_eq!(p.last_turn_at, t0() + Duration::hours(2));

        // The remaining 30 minutes plus 30 more make the next point.
        assert!(regenerate(&mut p, 1, now + Duration::minutes(30)));
        assert_eq!(p.current_stamina, 4);
    }

    #[test]
    fn no_change_when_full_or_under_an_hour() {
        let mut full = player_at(5, t0());
        assert!(!regenerate(&mut full, 1, t0() + Duration::hours(10)));
        assert_eq!(full.last_turn_at, t0());

        let mut early = player_at(0, t0());
        assert!(!regenerate(&mut early, 1, t0() + Duration::minutes(59)));
        assert_eq!(early.current_stamina, 0);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut p = player_at(0, t0());
        assert!(!regenerate(&mut p, 1, t0() - Duration::hours(4)));
        assert_eq!(p.last_turn_at, t0());
    }

    #[test]
    fn rate_multiplies_gain() {
        let mut p = player_at(0, t0());
        regenerate(&mut p, 2, t0() + Duration::hours(2));
        assert_eq!(p.current_stamina, 4);
    }

    #[test]
    fn require_refuses_at_zero() {
        let settings = GuildSettings::new(1);
        let mut p = player_at(0, t0());
        assert!(matches!(
            require(&mut p, &settings, t0() + Duration::minutes(10)),
            Err(AdventureError::NoStamina)
        ));
        assert!(require(&mut p, &settings, t0() + Duration::hours(1)).is_ok());
    }
}
