//! # Pokebot - chat-hosted creature adventure core
//!
//! Pokebot is the simulation core of a multiplayer creature-collecting
//! adventure played through chat commands and buttons. Every server (guild)
//! is an isolated world instance; each player explores a location graph,
//! spends regenerating stamina, meets and captures wild species, climbs gym
//! ladders for badges and works through tutorial missions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pokebot::adventure::{canonical_world, AdventureService, AdventureStoreBuilder, Interaction};
//! use pokebot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = AdventureStoreBuilder::new(&config.game.data_dir).open()?;
//!     let (service, _expired) = AdventureService::new(
//!         Arc::new(store),
//!         Arc::new(canonical_world()),
//!         config.service_options(),
//!     );
//!     let reply = service.handle_now(&Interaction::command(1, 42, "start"));
//!     println!("{}", reply.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - world content, player persistence, game engines and the interaction service
//! - [`config`] - TOML configuration and validation
//! - [`logutil`] - single-line escaping for user-supplied strings in logs

pub mod adventure;
pub mod config;
pub mod logutil;
