use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;
use sled::IVec;

use crate::adventure::errors::AdventureError;
use crate::adventure::types::{
    GuildSettings, PlayerKey, PlayerRecord, GUILD_SETTINGS_SCHEMA_VERSION, PLAYER_SCHEMA_VERSION,
};

const TREE_PLAYERS: &str = "pokebot_players";
const TREE_SETTINGS: &str = "pokebot_guild_settings";
const TREE_LOGS: &str = "pokebot_logs";

fn next_timestamp_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000)
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct AdventureStoreBuilder {
    path: PathBuf,
}

impl AdventureStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<AdventureStore, AdventureError> {
        AdventureStore::open(self.path)
    }
}

/// Sled-backed persistence for player state and per-server settings.
///
/// A player's whole adventure state is one bincode record, so every
/// read-modify-write in [`AdventureStore::update_player`] is atomic.
pub struct AdventureStore {
    _db: sled::Db,
    players: sled::Tree,
    settings: sled::Tree,
    logs: sled::Tree,
}

impl AdventureStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AdventureError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let settings = db.open_tree(TREE_SETTINGS)?;
        let logs = db.open_tree(TREE_LOGS)?;
        Ok(Self {
            _db: db,
            players,
            settings,
            logs,
        })
    }

    fn player_key(key: PlayerKey) -> Vec<u8> {
        format!("players:{}:{}", key.server_id, key.user_id).into_bytes()
    }

    fn server_prefix(server_id: u64) -> Vec<u8> {
        format!("players:{}:", server_id).into_bytes()
    }

    fn settings_key(server_id: u64) -> Vec<u8> {
        format!("guild:{}", server_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, AdventureError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, AdventureError> {
        Ok(bincode::deserialize::<T>(bytes)?)
    }

    fn decode_player(bytes: &[u8]) -> Result<PlayerRecord, AdventureError> {
        let record: PlayerRecord = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(AdventureError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Insert a brand new player. Fails with `AlreadyStarted` if one exists.
    pub fn create_player(&self, mut player: PlayerRecord) -> Result<(), AdventureError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        let key = Self::player_key(player.key());
        let bytes = Self::serialize(&player)?;
        match self
            .players
            .compare_and_swap(key, None::<&[u8]>, Some(bytes))?
        {
            Ok(()) => {
                self.players.flush()?;
                Ok(())
            }
            Err(_) => Err(AdventureError::AlreadyStarted),
        }
    }

    /// Insert or overwrite a player record.
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), AdventureError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        let key = Self::player_key(player.key());
        let bytes = Self::serialize(&player)?;
        self.players.insert(key, bytes)?;
        self.players.flush()?;
        Ok(())
    }

    pub fn find_player(&self, key: PlayerKey) -> Result<Option<PlayerRecord>, AdventureError> {
        match self.players.get(Self::player_key(key))? {
            Some(bytes) => Ok(Some(Self::decode_player(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Fetch a player record, failing with `PlayerNotFound` when absent.
    pub fn get_player(&self, key: PlayerKey) -> Result<PlayerRecord, AdventureError> {
        self.find_player(key)?.ok_or(AdventureError::PlayerNotFound)
    }

    /// Atomically read, modify and write one player record.
    ///
    /// `apply` may run more than once if another writer wins the race, so it
    /// must only touch the record it is given. Returning an error aborts the
    /// update and nothing is written.
    pub fn update_player<T, F>(&self, key: PlayerKey, mut apply: F) -> Result<T, AdventureError>
    where
        F: FnMut(&mut PlayerRecord) -> Result<T, AdventureError>,
    {
        let db_key = Self::player_key(key);
        loop {
            let Some(current) = self.players.get(&db_key)? else {
                return Err(AdventureError::PlayerNotFound);
            };
            let mut record = Self::decode_player(&current)?;
            let outcome = apply(&mut record)?;
            record.schema_version = PLAYER_SCHEMA_VERSION;
            let bytes = Self::serialize(&record)?;
            match self
                .players
                .compare_and_swap(&db_key, Some(current), Some(bytes))?
            {
                Ok(()) => {
                    self.players.flush()?;
                    return Ok(outcome);
                }
                Err(_) => {
                    debug!("player {} changed concurrently, retrying update", key);
                }
            }
        }
    }

    /// All players registered on one server.
    pub fn list_players(&self, server_id: u64) -> Result<Vec<PlayerRecord>, AdventureError> {
        let mut players = Vec::new();
        for entry in self.players.scan_prefix(Self::server_prefix(server_id)) {
            let (_, bytes) = entry?;
            players.push(Self::decode_player(&bytes)?);
        }
        Ok(players)
    }

    pub fn count_players(&self) -> usize {
        self.players.len()
    }

    pub fn get_guild_settings(
        &self,
        server_id: u64,
    ) -> Result<Option<GuildSettings>, AdventureError> {
        let Some(bytes) = self.settings.get(Self::settings_key(server_id))? else {
            return Ok(None);
        };
        let record: GuildSettings = Self::deserialize(&bytes)?;
        if record.schema_version != GUILD_SETTINGS_SCHEMA_VERSION {
            return Err(AdventureError::SchemaMismatch {
                entity: "guild_settings",
                expected: GUILD_SETTINGS_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    pub fn put_guild_settings(&self, mut settings: GuildSettings) -> Result<(), AdventureError> {
        settings.schema_version = GUILD_SETTINGS_SCHEMA_VERSION;
        let key = Self::settings_key(settings.server_id);
        let bytes = Self::serialize(&settings)?;
        self.settings.insert(key, bytes)?;
        self.settings.flush()?;
        Ok(())
    }

    /// Append a line to the adventure journal (badges, rewards, purchases).
    pub fn append_log(&self, message: &str) -> Result<(), AdventureError> {
        let key = format!("logs:{:020}", next_timestamp_nanos()).into_bytes();
        self.logs.insert(key, message.as_bytes())?;
        self.logs.flush()?;
        Ok(())
    }

    /// Most recent journal lines, newest first.
    pub fn recent_logs(&self, limit: usize) -> Result<Vec<String>, AdventureError> {
        let mut lines = Vec::new();
        for entry in self.logs.iter().rev().take(limit) {
            let (_, value): (IVec, IVec) = entry?;
            lines.push(String::from_utf8_lossy(&value).into_owned());
        }
        Ok(lines)
    }
}
