//! Dex and trainer profile views.

use chrono::{DateTime, Utc};

use crate::adventure::{
    errors::AdventureError,
    stamina,
    storage::AdventureStore,
    types::{GuildSettings, PlayerKey, PlayerRecord},
    world::WorldCatalog,
};

/// Dex rows needed before viewing the dex counts for the tutorial.
pub const DEX_MILESTONE: usize = 5;

/// Which species a dex page lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DexFilter {
    /// Every enabled species, spotted or not.
    #[default]
    All,
    /// Species with a dex row, owned or only seen.
    Seen,
    Owned,
}

impl DexFilter {
    /// All, then Seen, then Owned, then back to All.
    pub fn next(self) -> Self {
        match self {
            DexFilter::All => DexFilter::Seen,
            DexFilter::Seen => DexFilter::Owned,
            DexFilter::Owned => DexFilter::All,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DexFilter::All => "all",
            DexFilter::Seen => "seen",
            DexFilter::Owned => "owned",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "all" => Some(DexFilter::All),
            "seen" => Some(DexFilter::Seen),
            "owned" => Some(DexFilter::Owned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexLine {
    pub species_id: u32,
    pub name: String,
    /// `None` until the species has been spotted.
    pub level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexSummary {
    pub filter: DexFilter,
    pub seen: usize,
    pub owned: usize,
    pub total_species: usize,
    pub entries: Vec<DexLine>,
}

pub fn dex_summary(world: &WorldCatalog, player: &PlayerRecord, filter: DexFilter) -> DexSummary {
    let mut species: Vec<_> = world.species.iter().filter(|s| s.enabled).collect();
    species.sort_by_key(|s| s.id);
    let entries = species
        .into_iter()
        .filter_map(|s| {
            let level = player.dex.get(&s.id).map(|e| e.level);
            let keep = match filter {
                DexFilter::All => true,
                DexFilter::Seen => level.is_some(),
                DexFilter::Owned => level.map_or(false, |l| l >= 1),
            };
            keep.then(|| DexLine {
                species_id: s.id,
                name: s.name.clone(),
                level,
            })
        })
        .collect();
    DexSummary {
        filter,
        seen: player.dex.len(),
        owned: player.owned_species(),
        total_species: world.enabled_species_count(),
        entries,
    }
}

/// Owned species marked as travelling with the trainer, by species id.
pub fn party(world: &WorldCatalog, player: &PlayerRecord) -> Vec<DexLine> {
    player
        .dex
        .iter()
        .filter(|(_, e)| e.in_party && e.is_owned())
        .map(|(species_id, e)| DexLine {
            species_id: *species_id,
            name: world
                .species(*species_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| format!("#{}", species_id)),
            level: Some(e.level),
        })
        .collect()
}

pub fn reached_dex_milestone(player: &PlayerRecord) -> bool {
    player.dex.len() >= DEX_MILESTONE
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub location: String,
    pub money: u64,
    pub stamina: u32,
    pub max_stamina: u32,
    pub next_stamina_at: Option<DateTime<Utc>>,
    pub badges: usize,
    pub seen: usize,
    pub owned: usize,
}

/// Trainer profile, with stamina regenerated and persisted first.
pub fn profile(
    store: &AdventureStore,
    world: &WorldCatalog,
    settings: &GuildSettings,
    key: PlayerKey,
    now: DateTime<Utc>,
) -> Result<Profile, AdventureError> {
    let player = stamina::refresh(store, settings, key, now)?;
    let location = world
        .location(player.current_location_id)
        .map(|l| l.name.clone())
        .unwrap_or_else(|| format!("location #{}", player.current_location_id));
    Ok(Profile {
        location,
        money: player.money,
        stamina: player.current_stamina,
        max_stamina: player.max_stamina,
        next_stamina_at: stamina::next_point_at(&player),
        badges: player.badges.len(),
        seen: player.dex.len(),
        owned: player.owned_species(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::seed::canonical_world;
    use crate::adventure::storage::AdventureStoreBuilder;
    use crate::adventure::types::DexEntry;
    use chrono::Duration;
    use tempfile::TempDir;

    fn player_with(rows: &[(u32, u32)]) -> PlayerRecord {
        let now = Utc::now();
        let mut player = PlayerRecord::new(PlayerKey::new(1, 1), 1, 5, 5, now);
        for &(species, level) in rows {
            player.dex.insert(
                species,
                DexEntry {
                    level,
                    ..DexEntry::seen(now)
                },
            );
        }
        player
    }

    #[test]
    fn summary_counts_seen_and_owned() {
        let world = canonical_world();
        let player = player_with(&[(1, 1), (16, 0), (19, 7)]);
        let summary = dex_summary(&world, &player, DexFilter::Seen);
        assert_eq!((summary.seen, summary.owned), (3, 2));
        assert_eq!(summary.total_species, 12);
        assert_eq!(summary.entries.len(), 3);
        assert_eq!(summary.entries[1].name, "Pidgey");
        assert_eq!(summary.entries[1].level, Some(0));
        assert!(!reached_dex_milestone(&player));
    }

    #[test]
    fn filters_cycle_and_narrow_the_listing() {
        let world = canonical_world();
        let player = player_with(&[(1, 1), (16, 0), (19, 7)]);

        let all = dex_summary(&world, &player, DexFilter::All);
        assert_eq!(all.entries.len(), 12);
        assert!(all.entries.windows(2).all(|w| w[0].species_id < w[1].species_id));
        assert!(all.entries.iter().any(|l| l.level.is_none()));

        let owned: Vec<u32> = dex_summary(&world, &player, DexFilter::Owned)
            .entries
            .iter()
            .map(|l| l.species_id)
            .collect();
        assert_eq!(owned, vec![1, 19]);

        assert_eq!(DexFilter::All.next(), DexFilter::Seen);
        assert_eq!(DexFilter::Seen.next(), DexFilter::Owned);
        assert_eq!(DexFilter::Owned.next(), DexFilter::All);
        assert_eq!(DexFilter::from_code(DexFilter::Owned.code()), Some(DexFilter::Owned));
        assert_eq!(DexFilter::from_code("shiny"), None);
    }

    #[test]
    fn party_lists_owned_members_only() {
        let world = canonical_world();
        let mut player = player_with(&[(1, 1), (16, 0), (19, 7)]);
        for species in [1, 16] {
            if let Some(entry) = player.dex.get_mut(&species) {
                entry.in_party = true;
            }
        }
        let members = party(&world, &player);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Bulbasaur");
        assert_eq!(members[0].level, Some(1));
    }

    #[test]
    fn profile_persists_regeneration() {
        let dir = TempDir::new().expect("tempdir");
        let store = AdventureStoreBuilder::new(dir.path()).open().expect("store");
        let world = canonical_world();
        let key = PlayerKey::new(1, 2);
        let start = Utc::now() - Duration::hours(2);
        let mut player = PlayerRecord::new(key, 1, 5, 5, start);
        player.current_stamina = 1;
        store.create_player(player).expect("player");

        let view = profile(&store, &world, &GuildSettings::new(1), key, Utc::now()).expect("profile");
        assert_eq!(view.stamina, 3);
        assert_eq!(view.location, "Pallet Town");
        assert_eq!(store.get_player(key).expect("player").current_stamina, 3);
    }
}
