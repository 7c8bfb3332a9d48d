//! Per-server leaderboards.

use crate::adventure::{errors::AdventureError, storage::AdventureStore, types::PlayerRecord};

pub const RANKING_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    pub user_id: u64,
    pub count: usize,
}

fn top_by(players: &[PlayerRecord], count: impl Fn(&PlayerRecord) -> usize) -> Vec<RankEntry> {
    let mut entries: Vec<RankEntry> = players
        .iter()
        .map(|p| RankEntry {
            user_id: p.user_id,
            count: count(p),
        })
        .filter(|e| e.count > 0)
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.user_id.cmp(&b.user_id)));
    entries.truncate(RANKING_SIZE);
    entries
}

/// Top trainers of a server by number of badges.
pub fn badge_ranking(store: &AdventureStore, server_id: u64) -> Result<Vec<RankEntry>, AdventureError> {
    let players = store.list_players(server_id)?;
    Ok(top_by(&players, |p| p.badges.len()))
}

/// Top trainers of a server by distinct species seen or owned.
pub fn dex_ranking(store: &AdventureStore, server_id: u64) -> Result<Vec<RankEntry>, AdventureError> {
    let players = store.list_players(server_id)?;
    Ok(top_by(&players, |p| p.dex.len()))
}
