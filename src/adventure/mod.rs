//! Adventure simulation core: world content, per-player state in sled, and
//! the engines that move players, resolve encounters and captures, run gym
//! ladders and tutorial missions. `service` turns chat interactions into
//! engine calls.

pub mod capture;
pub mod commands;
pub mod dex;
pub mod encounter;
pub mod errors;
pub mod gym;
pub mod inventory;
pub mod movement;
pub mod random;
pub mod ranking;
pub mod seed;
pub mod seed_loader;
pub mod service;
pub mod settings;
pub mod shop;
pub mod stamina;
pub mod start;
pub mod storage;
pub mod timeout;
pub mod tutorial;
pub mod types;
pub mod world;

pub use capture::{attempt_capture, fight_wild, CaptureOutcome, CaptureRules, FightOutcome};
pub use commands::{Button, Command, Component, Interaction, InteractionKind, Reply};
pub use encounter::{encounter, EncounterOutcome};
pub use errors::{AdventureError, ErrorKind};
pub use gym::{claim_badge, fight_trainer, open_gym, LadderRules, LadderView, TrainerVictory};
pub use movement::{move_player, MoveEvent, MoveOutcome};
pub use seed::canonical_world;
pub use seed_loader::{load_world, load_world_from_json, write_world_json};
pub use service::{AdventureService, ServiceOptions};
pub use start::{begin_adventure, StartOptions};
pub use storage::{AdventureStore, AdventureStoreBuilder};
pub use timeout::{ExpiredNotice, InteractionTimeouts, TimedFlow};
pub use tutorial::{claim_step_reward, complete_missions_with_condition, conditions};
pub use types::*;
pub use world::WorldCatalog;
