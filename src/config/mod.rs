//! # Configuration Management Module
//!
//! Loads and validates the TOML configuration that drives the adventure core.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - data directory, world content, player start, timed flows
//! - [`GuildDefaults`] - per-server tunables applied until a server overrides them
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pokebot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     println!("Data dir: {}", config.game.data_dir);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! data_dir = "./data"
//! world_seed = "./data/world.json"
//! initial_location = "PalletTown"
//! starting_stamina = 5
//! max_stamina = 5
//! selection_timeout_secs = 60
//! default_capture_tool = "POKE_BALL"
//! strict_ladder_order = true
//!
//! [guild_defaults]
//! stamina_per_hour = 1
//! move_item_event_chance = 0
//! move_battle_event_chance = 0
//! move_battle_min_reward = 0
//! move_battle_max_reward = 0
//!
//! [logging]
//! level = "info"
//! file = "pokebot.log"
//! ```
//!
//! Every field has a default, so a partial file (or an empty one) loads.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::adventure::capture::CaptureRules;
use crate::adventure::gym::LadderRules;
use crate::adventure::service::ServiceOptions;
use crate::adventure::settings::{MAX_STAMINA_PER_HOUR, MIN_STAMINA_PER_HOUR};
use crate::adventure::start::StartOptions;
use crate::adventure::types::GuildSettings;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// JSON world content; the built-in world is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_seed: Option<String>,
    #[serde(default = "default_initial_location")]
    pub initial_location: String,
    #[serde(default = "default_stamina")]
    pub starting_stamina: u32,
    #[serde(default = "default_stamina")]
    pub max_stamina: u32,
    #[serde(default = "default_selection_timeout")]
    pub selection_timeout_secs: u64,
    #[serde(default = "default_capture_tool")]
    pub default_capture_tool: String,
    /// Enforce trainer order within a gym ladder.
    #[serde(default = "default_true")]
    pub strict_ladder_order: bool,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_initial_location() -> String {
    "PalletTown".to_string()
}

fn default_stamina() -> u32 {
    5
}

fn default_selection_timeout() -> u64 {
    60
}

fn default_capture_tool() -> String {
    "POKE_BALL".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            world_seed: None,
            initial_location: default_initial_location(),
            starting_stamina: default_stamina(),
            max_stamina: default_stamina(),
            selection_timeout_secs: default_selection_timeout(),
            default_capture_tool: default_capture_tool(),
            strict_ladder_order: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuildDefaults {
    #[serde(default = "default_stamina_per_hour")]
    pub stamina_per_hour: u32,
    #[serde(default)]
    pub move_item_event_chance: u32,
    #[serde(default)]
    pub move_battle_event_chance: u32,
    #[serde(default)]
    pub move_battle_min_reward: u64,
    #[serde(default)]
    pub move_battle_max_reward: u64,
}

fn default_stamina_per_hour() -> u32 {
    1
}

impl Default for GuildDefaults {
    fn default() -> Self {
        Self {
            stamina_per_hour: default_stamina_per_hour(),
            move_item_event_chance: 0,
            move_battle_event_chance: 0,
            move_battle_min_reward: 0,
            move_battle_max_reward: 0,
        }
    }
}

impl GuildDefaults {
    /// Settings row a server starts with. The server id is filled in on use.
    pub fn to_settings(&self) -> GuildSettings {
        GuildSettings {
            stamina_per_hour: self.stamina_per_hour,
            move_item_event_chance: self.move_item_event_chance,
            move_battle_event_chance: self.move_battle_event_chance,
            move_battle_min_reward: self.move_battle_min_reward,
            move_battle_max_reward: self.move_battle_max_reward,
            ..GuildSettings::new(0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("pokebot.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub guild_defaults: GuildDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let game = &self.game;
        if game.max_stamina == 0 {
            return Err(anyhow!("game.max_stamina must be at least 1"));
        }
        if game.starting_stamina > game.max_stamina {
            return Err(anyhow!(
                "game.starting_stamina ({}) exceeds game.max_stamina ({})",
                game.starting_stamina,
                game.max_stamina
            ));
        }
        if game.selection_timeout_secs == 0 {
            return Err(anyhow!("game.selection_timeout_secs must be at least 1"));
        }
        if game.initial_location.trim().is_empty() {
            return Err(anyhow!("game.initial_location must not be empty"));
        }
        if game.default_capture_tool.trim().is_empty() {
            return Err(anyhow!("game.default_capture_tool must not be empty"));
        }

        let guild = &self.guild_defaults;
        if !(MIN_STAMINA_PER_HOUR..=MAX_STAMINA_PER_HOUR).contains(&guild.stamina_per_hour) {
            return Err(anyhow!(
                "guild_defaults.stamina_per_hour must be between {} and {}",
                MIN_STAMINA_PER_HOUR,
                MAX_STAMINA_PER_HOUR
            ));
        }
        if guild.move_item_event_chance > 100 || guild.move_battle_event_chance > 100 {
            return Err(anyhow!("guild_defaults event chances must be between 0 and 100"));
        }
        if guild.move_battle_max_reward < guild.move_battle_min_reward {
            return Err(anyhow!(
                "guild_defaults.move_battle_max_reward is below move_battle_min_reward"
            ));
        }
        Ok(())
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            start: StartOptions {
                initial_location: self.game.initial_location.clone(),
                starting_stamina: self.game.starting_stamina,
                max_stamina: self.game.max_stamina,
            },
            ladder: LadderRules {
                strict_order: self.game.strict_ladder_order,
            },
            guild_defaults: self.guild_defaults.to_settings(),
            selection_window: Duration::from_secs(self.game.selection_timeout_secs),
            capture: CaptureRules {
                default_tool: self.game.default_capture_tool.clone(),
            },
        }
    }
}
