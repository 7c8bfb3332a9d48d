//! Interaction boundary: routes one interaction to one engine call and turns
//! the outcome into a [`Reply`].
//!
//! Precondition failures and content gaps become their own message. Anything
//! unexpected is logged and reported as a generic error. Condition codes are
//! pulsed after successful actions; a failed pulse never fails the action.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use rand::Rng;
use tokio::sync::mpsc;

use crate::adventure::{
    capture, dex, encounter, gym, inventory, movement, ranking, settings, shop, start, tutorial,
    capture::CaptureRules,
    commands::{Button, Command, Component, Interaction, InteractionKind, Reply},
    dex::DexFilter,
    errors::{AdventureError, ErrorKind},
    gym::LadderRules,
    movement::MoveEvent,
    start::StartOptions,
    storage::AdventureStore,
    timeout::{ExpiredNotice, InteractionTimeouts, TimedFlow, DEFAULT_SELECTION_WINDOW},
    tutorial::conditions,
    types::{GuildSettings, PlayerKey, PlayerRecord},
    world::{ItemType, WorldCatalog},
};
use crate::logutil::escape_log;

pub const GENERIC_ERROR: &str = "An error occurred. Please try again later.";

/// Tunables the service needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub start: StartOptions,
    pub ladder: LadderRules,
    pub guild_defaults: GuildSettings,
    pub selection_window: Duration,
    pub capture: CaptureRules,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            start: StartOptions::default(),
            ladder: LadderRules::default(),
            guild_defaults: GuildSettings::new(0),
            selection_window: DEFAULT_SELECTION_WINDOW,
            capture: CaptureRules::default(),
        }
    }
}

pub struct AdventureService {
    store: Arc<AdventureStore>,
    world: Arc<WorldCatalog>,
    options: ServiceOptions,
    timeouts: InteractionTimeouts,
    notices: mpsc::UnboundedSender<ExpiredNotice>,
}

impl AdventureService {
    /// Build the service and the channel on which prompt expiries are announced.
    pub fn new(
        store: Arc<AdventureStore>,
        world: Arc<WorldCatalog>,
        options: ServiceOptions,
    ) -> (Self, mpsc::UnboundedReceiver<ExpiredNotice>) {
        let (notices, rx) = mpsc::unbounded_channel();
        let service = Self {
            store,
            world,
            options,
            timeouts: InteractionTimeouts::new(),
            notices,
        };
        (service, rx)
    }

    pub fn store(&self) -> &AdventureStore {
        &self.store
    }

    pub fn world(&self) -> &WorldCatalog {
        &self.world
    }

    pub fn timeouts(&self) -> &InteractionTimeouts {
        &self.timeouts
    }

    /// Handle with the wall clock and the thread-local generator.
    pub fn handle_now(&self, interaction: &Interaction) -> Reply {
        self.handle(interaction, Utc::now(), &mut rand::thread_rng())
    }

    /// Handle one interaction. Never fails: errors become replies.
    pub fn handle<R: Rng + ?Sized>(
        &self,
        interaction: &Interaction,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Reply {
        let key = interaction.key();
        let result = match &interaction.kind {
            InteractionKind::Command(text) => {
                debug!("command from {}: {}", key, escape_log(text));
                self.run_command(key, Command::parse(text), now, rng)
            }
            InteractionKind::Component(raw) => {
                debug!("component from {}: {}", key, escape_log(raw));
                Component::parse(raw).and_then(|component| match component.owner() {
                    Some(owner) if owner != interaction.user_id => {
                        Err(AdventureError::NotYourInteraction)
                    }
                    _ => self.run_component(key, component, now, rng),
                })
            }
        };
        result.unwrap_or_else(|err| self.error_reply(key, err))
    }

    fn error_reply(&self, key: PlayerKey, err: AdventureError) -> Reply {
        match err.kind() {
            ErrorKind::Precondition => {
                debug!("refused action for {}: {}", key, err);
                Reply::ephemeral(self.user_message(&err))
            }
            ErrorKind::ContentGap => {
                warn!(target: "content", "content gap hit by {}: {}", key, err);
                Reply::ephemeral(self.user_message(&err))
            }
            ErrorKind::Unexpected => {
                error!("interaction for {} failed: {}", key, err);
                Reply::ephemeral(GENERIC_ERROR)
            }
        }
    }

    fn user_message(&self, err: &AdventureError) -> String {
        use AdventureError::*;
        match err {
            PlayerNotFound => "You have not started your adventure yet. Use `start` first.".into(),
            AlreadyStarted => "You have already started your adventure.".into(),
            NoStamina => "You are out of stamina. It comes back every hour.".into(),
            InvalidDestination(_) => "You cannot travel there from here.".into(),
            RequiresBadge(gym_id) => {
                let gym = self
                    .world
                    .gym(*gym_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_else(|| format!("gym #{}", gym_id));
                format!("You need the badge of {} to travel there.", gym)
            }
            NoEncountersHere => "There are no wild Pokémon here.".into(),
            SpeciesNotFound(_) => "That Pokémon is not available.".into(),
            NoCaptureTool(tool) => format!("You have no {} left.", tool),
            NotACaptureTool(_) => "That item cannot be used to catch Pokémon.".into(),
            NoActiveEncounter => "That wild Pokémon is no longer here.".into(),
            UnknownTrainer(user) => format!("<@{}> has not started an adventure here.", user),
            WrongLocation => "You need to be at the gym to do that.".into(),
            GymNotFound(_) => "That gym does not exist.".into(),
            GymClosed => "This gym is closed.".into(),
            TrainerNotFound(_) => "That trainer is not part of this gym.".into(),
            TrainerAlreadyDefeated(_) => "You have already defeated this trainer.".into(),
            LadderOutOfOrder { next } => {
                let name = self
                    .world
                    .gym_trainers
                    .iter()
                    .find(|t| t.id == *next)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "the previous trainer".to_string());
                format!("You must defeat {} first.", name)
            }
            LadderIncomplete => "Defeat every trainer of this gym before claiming the badge.".into(),
            BadgeAlreadyOwned => "You already own this badge.".into(),
            StepNotFound(_) => "That tutorial step does not exist.".into(),
            NotAllMissionsComplete => "Complete every mission of this step first.".into(),
            RewardAlreadyClaimed => "You already claimed this reward.".into(),
            NoShopHere => "There is no shop here.".into(),
            ItemUnavailable(_) => "That item is not sold here.".into(),
            InvalidQuantity => "Quantity must be at least 1.".into(),
            NotEnoughMoney { needed, available } => {
                format!("You need ${} but only have ${}.", needed, available)
            }
            InvalidStaminaRate(_) => "Stamina per hour must be between 1 and 5.".into(),
            InvalidSetting(msg) => format!("Invalid setting: {}.", msg),
            NotYourInteraction => "This menu belongs to another trainer.".into(),
            InvalidComponent(_) => "That action is no longer valid.".into(),
            NoStartersConfigured => "No starter Pokémon are configured on this server.".into(),
            NoEncounterTableDefined(_) => "No encounter table is defined for this location.".into(),
            NoGymHere(_) => "There is no gym here.".into(),
            InitialLocationMissing(_) => "The starting location is not configured.".into(),
            InvalidWorld(_) => "The world content is misconfigured.".into(),
            Sled(_) | Bincode(_) | Io(_) | SchemaMismatch { .. } | Internal(_) => {
                GENERIC_ERROR.into()
            }
        }
    }

    fn settings(&self, server_id: u64) -> Result<GuildSettings, AdventureError> {
        settings::effective(&self.store, &self.options.guild_defaults, server_id)
    }

    fn arm(&self, key: PlayerKey, flow: TimedFlow, reply: &mut Reply) {
        let notices = self.notices.clone();
        let prompt_id = self
            .timeouts
            .start(key, flow, self.options.selection_window, move |notice| {
                let _ = notices.send(notice);
            });
        reply.prompt_id = Some(prompt_id);
    }

    /// Pulse a condition code and mention newly finished missions.
    fn pulse(&self, key: PlayerKey, code: &str, now: DateTime<Utc>, reply: &mut Reply) {
        match tutorial::complete_missions_with_condition(&self.store, &self.world, key, code, now) {
            Ok(0) => {}
            Ok(_) => reply.push_line("Tutorial mission complete! Check `tutorial`."),
            Err(e) => warn!("failed to record {} for {}: {}", code, key, e),
        }
    }

    fn journal(&self, line: String) {
        if let Err(e) = self.store.append_log(&line) {
            warn!("failed to append journal entry: {}", e);
        }
    }

    fn location_name(&self, location_id: u32) -> String {
        self.world
            .location(location_id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("location #{}", location_id))
    }

    fn species_name(&self, species_id: u32) -> String {
        self.world
            .species(species_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{}", species_id))
    }

    /// The record a view is about: the caller's own, or another trainer's.
    fn viewed_player(
        &self,
        key: PlayerKey,
        target: Option<u64>,
    ) -> Result<PlayerRecord, AdventureError> {
        match target.filter(|user| *user != key.user_id) {
            None => self.store.get_player(key),
            Some(user) => self
                .store
                .find_player(PlayerKey::new(key.server_id, user))?
                .ok_or(AdventureError::UnknownTrainer(user)),
        }
    }

    fn run_command<R: Rng + ?Sized>(
        &self,
        key: PlayerKey,
        command: Command,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Reply, AdventureError> {
        match command {
            Command::Start => self.offer_starters(key),
            Command::Move => self.offer_destinations(key, now),
            Command::Encounter => self.wild_encounter(key, now, rng),
            Command::Gym => self.show_gym(key),
            Command::Tutorial => self.show_tutorial(key),
            Command::Shop => self.show_shop(key),
            Command::Inventory(target) => {
                let player = self.viewed_player(key, target)?;
                let mut reply = Reply::ephemeral(format!("<@{}>", player.user_id));
                reply.push_line(format!("Money: ${}", player.money));
                for line in inventory::format_inventory(&player, &self.world) {
                    reply.push_line(line);
                }
                Ok(reply)
            }
            Command::Pokedex(target) => self.show_dex(key, target, DexFilter::All, now),
            Command::Party(target) => {
                let player = self.viewed_player(key, target)?;
                let members = dex::party(&self.world, &player);
                let mut reply = Reply::public(format!("Party of <@{}>", player.user_id));
                if members.is_empty() {
                    reply.push_line("No Pokémon in the party.");
                }
                for member in members {
                    reply.push_line(format!(
                        "#{:03} {} Lv {}",
                        member.species_id,
                        member.name,
                        member.level.unwrap_or(0)
                    ));
                }
                Ok(reply)
            }
            Command::Profile(target) => {
                let player = self.viewed_player(key, target)?;
                let settings = self.settings(key.server_id)?;
                let profile =
                    dex::profile(&self.store, &self.world, &settings, player.key(), now)?;
                let mut reply = Reply::ephemeral(format!("Trainer <@{}>", player.user_id));
                reply.push_line(format!("Location: {}", profile.location));
                reply.push_line(format!("Money: ${}", profile.money));
                reply.push_line(format!("Stamina: {}/{}", profile.stamina, profile.max_stamina));
                if let Some(at) = profile.next_stamina_at {
                    reply.push_line(format!("Next stamina: {}", at.format("%H:%M UTC")));
                }
                reply.push_line(format!("Badges: {}", profile.badges));
                reply.push_line(format!("Dex: {} seen, {} owned", profile.seen, profile.owned));
                Ok(reply)
            }
            Command::BadgeRanking => {
                let entries = ranking::badge_ranking(&self.store, key.server_id)?;
                if entries.is_empty() {
                    return Ok(Reply::public("No trainer has earned a badge yet."));
                }
                let mut reply = Reply::public("Badge ranking");
                for (idx, e) in entries.iter().enumerate() {
                    reply.push_line(format!("{}. <@{}> - {} badge(s)", idx + 1, e.user_id, e.count));
                }
                Ok(reply)
            }
            Command::DexRanking => {
                let entries = ranking::dex_ranking(&self.store, key.server_id)?;
                if entries.is_empty() {
                    return Ok(Reply::public("No trainer has registered a Pokémon yet."));
                }
                let total = self.world.enabled_species_count();
                let mut reply = Reply::public("Pokédex ranking");
                for (idx, e) in entries.iter().enumerate() {
                    reply.push_line(format!("{}. <@{}> - {}/{}", idx + 1, e.user_id, e.count, total));
                }
                Ok(reply)
            }
            Command::SetStamina(rate) => {
                let updated = settings::set_stamina_per_hour(
                    &self.store,
                    &self.options.guild_defaults,
                    key.server_id,
                    rate,
                )?;
                Ok(Reply::ephemeral(format!(
                    "Stamina now regenerates {} per hour.",
                    updated.stamina_per_hour
                )))
            }
            Command::SetEvents(events) => {
                settings::set_move_events(
                    &self.store,
                    &self.options.guild_defaults,
                    key.server_id,
                    events,
                )?;
                Ok(Reply::ephemeral(format!(
                    "Move events: item {}%, battle {}%, reward ${}-${}.",
                    events.item_chance, events.battle_chance, events.min_reward, events.max_reward
                )))
            }
            Command::Help => Ok(Reply::ephemeral(help_text())),
            Command::Unknown(text) => Ok(Reply::ephemeral(format!(
                "Unknown command '{}'.\n{}",
                escape_log(&text),
                help_text()
            ))),
        }
    }

    fn run_component<R: Rng + ?Sized>(
        &self,
        key: PlayerKey,
        component: Component,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Reply, AdventureError> {
        match component {
            Component::StarterSelect { species_id, .. } => {
                self.timeouts.cancel(key, TimedFlow::StarterSelection);
                let player = start::begin_adventure(
                    &self.store,
                    &self.world,
                    &self.options.start,
                    key,
                    species_id,
                    now,
                )?;
                Ok(Reply::public(format!(
                    "Your adventure begins in {} with {}!",
                    self.location_name(player.current_location_id),
                    self.species_name(species_id)
                )))
            }
            Component::MoveSelect { to_location_id, .. } => {
                self.timeouts.cancel(key, TimedFlow::MoveSelection);
                let settings = self.settings(key.server_id)?;
                let outcome = movement::move_player(
                    &self.store,
                    &self.world,
                    &settings,
                    key,
                    to_location_id,
                    now,
                    rng,
                )?;
                let mut reply = Reply::ephemeral(format!(
                    "You travelled to {}. Stamina {}/{}.",
                    self.location_name(outcome.to_location_id),
                    outcome.stamina,
                    outcome.max_stamina
                ));
                for event in &outcome.events {
                    reply.push_line(match *event {
                        MoveEvent::ItemFound {
                            item_type_id,
                            quantity,
                        } => format!(
                            "You found {} x{} on the way!",
                            self.world.item_name(item_type_id),
                            quantity
                        ),
                        MoveEvent::BattleWon { money } => {
                            format!("A trainer challenged you and lost! You earned ${}.", money)
                        }
                        MoveEvent::BattleLost => {
                            "A trainer challenged you and won. Better luck next time.".to_string()
                        }
                    });
                }
                self.pulse(key, conditions::MOVE_ONCE, now, &mut reply);
                Ok(reply)
            }
            Component::CatchAttempt {
                species_id,
                level,
                tool,
                ..
            } => {
                let outcome = capture::attempt_capture(
                    &self.store,
                    &self.world,
                    &self.options.capture,
                    key,
                    species_id,
                    level,
                    &tool,
                    now,
                    rng,
                )?;
                self.timeouts.cancel(key, TimedFlow::CatchPrompt);
                let name = self.species_name(species_id);
                if outcome.caught {
                    let mut reply = Reply::public(format!(
                        "Gotcha! {} was caught. Dex level {}.",
                        name, outcome.dex_level
                    ));
                    self.pulse(key, conditions::CATCH_ONCE, now, &mut reply);
                    Ok(reply)
                } else {
                    Ok(Reply::ephemeral(format!(
                        "Oh no! {} broke free and fled. ({} left)",
                        name, outcome.tools_left
                    )))
                }
            }
            Component::CatchFight { species_id, .. } => {
                let outcome = capture::fight_wild(&self.store, &self.world, key, species_id, rng)?;
                self.timeouts.cancel(key, TimedFlow::CatchPrompt);
                let mut reply = Reply::ephemeral(format!(
                    "You defeated the wild {} and earned ${}.",
                    self.species_name(species_id),
                    outcome.money
                ));
                self.pulse(key, conditions::WILD_FIGHT_ONCE, now, &mut reply);
                Ok(reply)
            }
            Component::GymFight {
                gym_id, trainer_id, ..
            } => {
                let victory = gym::fight_trainer(
                    &self.store,
                    &self.world,
                    self.options.ladder,
                    key,
                    gym_id,
                    trainer_id,
                    now,
                )?;
                let mut reply = Reply::public(format!(
                    "You defeated {} and earned ${}.",
                    victory.trainer_name, victory.money
                ));
                if let Some(item) = victory.item {
                    reply.push_line(format!(
                        "You received {} x{}.",
                        self.world.item_name(item.item_type_id),
                        item.quantity
                    ));
                }
                self.pulse(key, conditions::GYM_TRAINER_DEFEATED, now, &mut reply);
                let player = self.store.get_player(key)?;
                if victory.ladder_complete && !player.has_badge(gym_id) {
                    reply.push_line("The ladder is cleared. Claim your badge!");
                    reply.buttons.push(Button::new(
                        "Claim badge",
                        &Component::GymBadge {
                            gym_id,
                            owner: key.user_id,
                        },
                    ));
                }
                Ok(reply)
            }
            Component::GymBadge { gym_id, .. } => {
                gym::claim_badge(
                    &self.store,
                    &self.world,
                    self.options.ladder,
                    key,
                    gym_id,
                    now,
                )?;
                let name = self
                    .world
                    .gym(gym_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                self.journal(format!("{} earned the badge of {}", key, name));
                let mut reply = Reply::public(format!("You earned the badge of {}!", name));
                self.pulse(key, conditions::BADGE_OBTAINED, now, &mut reply);
                Ok(reply)
            }
            Component::TutorialClaim { step_id } => {
                let reward =
                    tutorial::claim_step_reward(&self.store, &self.world, key, step_id, now)?;
                self.journal(format!("{} claimed tutorial step {}", key, step_id));
                let mut reply = Reply::ephemeral(format!("Reward claimed: ${}.", reward.money));
                if let Some(item) = reward.item {
                    reply.push_line(format!(
                        "You received {} x{}.",
                        self.world.item_name(item.item_type_id),
                        item.quantity
                    ));
                }
                Ok(reply)
            }
            Component::ShopBuy {
                store_item_id,
                quantity,
                ..
            } => {
                let player = self.store.get_player(key)?;
                let (item, total) = shop::quote(&self.world, &player, store_item_id, quantity)?;
                let mut reply = Reply::ephemeral(format!(
                    "Buy {} x{} for ${}? You have ${}.",
                    self.world.item_name(item.item_type_id),
                    quantity,
                    total,
                    player.money
                ))
                .with_buttons(vec![
                    Button::new(
                        "Confirm",
                        &Component::ShopConfirm {
                            store_item_id,
                            quantity,
                            owner: key.user_id,
                        },
                    ),
                    Button::new("Cancel", &Component::ShopCancel { owner: key.user_id }),
                ]);
                self.arm(key, TimedFlow::PurchaseConfirmation, &mut reply);
                Ok(reply)
            }
            Component::ShopConfirm {
                store_item_id,
                quantity,
                ..
            } => {
                self.timeouts.cancel(key, TimedFlow::PurchaseConfirmation);
                let purchase = shop::buy(&self.store, &self.world, key, store_item_id, quantity)?;
                self.journal(format!(
                    "{} bought {} x{} for ${}",
                    key, purchase.item_type_id, purchase.quantity, purchase.total_price
                ));
                let mut reply = Reply::ephemeral(format!(
                    "You bought {} x{} for ${}. ${} left.",
                    self.world.item_name(purchase.item_type_id),
                    purchase.quantity,
                    purchase.total_price,
                    purchase.money_left
                ));
                self.pulse(key, conditions::SHOP_BUY_ONCE, now, &mut reply);
                Ok(reply)
            }
            Component::ShopCancel { .. } => {
                self.timeouts.cancel(key, TimedFlow::PurchaseConfirmation);
                Ok(Reply::ephemeral("Purchase cancelled."))
            }
            Component::DexPage { filter, target, .. } => {
                self.show_dex(key, Some(target), filter, now)
            }
        }
    }

    fn offer_starters(&self, key: PlayerKey) -> Result<Reply, AdventureError> {
        if self.store.find_player(key)?.is_some() {
            return Err(AdventureError::AlreadyStarted);
        }
        let buttons = start::starters(&self.world)?
            .into_iter()
            .map(|s| {
                Button::new(
                    s.name.clone(),
                    &Component::StarterSelect {
                        species_id: s.id,
                        owner: key.user_id,
                    },
                )
            })
            .collect();
        let mut reply = Reply::ephemeral("Choose your first partner:").with_buttons(buttons);
        self.arm(key, TimedFlow::StarterSelection, &mut reply);
        Ok(reply)
    }

    fn offer_destinations(&self, key: PlayerKey, now: DateTime<Utc>) -> Result<Reply, AdventureError> {
        let settings = self.settings(key.server_id)?;
        let (player, edges) = movement::destinations(&self.store, &self.world, &settings, key, now)?;
        if edges.is_empty() {
            return Ok(Reply::ephemeral("There is nowhere you can travel from here."));
        }
        let buttons = edges
            .iter()
            .map(|edge| {
                Button::new(
                    self.location_name(edge.to_location_id),
                    &Component::MoveSelect {
                        to_location_id: edge.to_location_id,
                        owner: key.user_id,
                    },
                )
            })
            .collect();
        let mut reply = Reply::ephemeral(format!(
            "You are in {}. Stamina {}/{}. Where to?",
            self.location_name(player.current_location_id),
            player.current_stamina,
            player.max_stamina
        ))
        .with_buttons(buttons);
        self.arm(key, TimedFlow::MoveSelection, &mut reply);
        Ok(reply)
    }

    fn catch_buttons(
        &self,
        key: PlayerKey,
        species_id: u32,
        level: u32,
    ) -> Result<Vec<Button>, AdventureError> {
        let player = self.store.get_player(key)?;
        let tools = self.world.capture_tools(&self.options.capture.default_tool);
        let mut held: Vec<&ItemType> = tools
            .iter()
            .copied()
            .filter(|t| inventory::has_item(&player, t.id, 1))
            .collect();
        if held.is_empty() {
            held = tools
                .into_iter()
                .filter(|t| t.code.eq_ignore_ascii_case(&self.options.capture.default_tool))
                .collect();
        }
        let mut buttons: Vec<Button> = held
            .into_iter()
            .map(|tool| {
                Button::new(
                    format!("{} ({})", tool.name, inventory::quantity_of(&player, tool.id)),
                    &Component::CatchAttempt {
                        species_id,
                        level,
                        tool: tool.code.clone(),
                        owner: key.user_id,
                    },
                )
            })
            .collect();
        buttons.push(Button::new(
            "Fight",
            &Component::CatchFight {
                species_id,
                owner: key.user_id,
            },
        ));
        Ok(buttons)
    }

    fn wild_encounter<R: Rng + ?Sized>(
        &self,
        key: PlayerKey,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Reply, AdventureError> {
        let settings = self.settings(key.server_id)?;
        let outcome = encounter::encounter(&self.store, &self.world, &settings, key, now, rng)?;
        let mut reply = Reply::ephemeral(format!(
            "A wild {} (Lv {}) appeared!{}",
            self.species_name(outcome.species_id),
            outcome.level,
            if outcome.first_sighting {
                " New Pokédex entry!"
            } else {
                ""
            }
        ))
        .with_buttons(self.catch_buttons(key, outcome.species_id, outcome.level)?);
        reply.push_line(format!("Stamina {} left.", outcome.stamina));
        self.arm(key, TimedFlow::CatchPrompt, &mut reply);
        self.pulse(key, conditions::ENCOUNTER_ONCE, now, &mut reply);
        Ok(reply)
    }

    fn show_gym(&self, key: PlayerKey) -> Result<Reply, AdventureError> {
        let player = self.store.get_player(key)?;
        let view = gym::open_gym(&self.world, &player)?;
        let mut reply = Reply::ephemeral(format!("=== {} ===", view.gym_name));
        let mut buttons = Vec::new();
        for trainer in &view.trainers {
            let mark = if trainer.defeated { "x" } else { " " };
            let role = if trainer.is_leader { " (Leader)" } else { "" };
            reply.push_line(format!("[{}] {}{}", mark, trainer.name, role));
            let selectable = !trainer.defeated
                && (!self.options.ladder.strict_order
                    || view.next_trainer_id == Some(trainer.trainer_id));
            if selectable {
                buttons.push(Button::new(
                    format!("Fight {}", trainer.name),
                    &Component::GymFight {
                        gym_id: view.gym_id,
                        trainer_id: trainer.trainer_id,
                        owner: key.user_id,
                    },
                ));
            }
        }
        if view.badge_owned {
            reply.push_line("You own this gym's badge.");
        } else if view.badge_claimable {
            buttons.push(Button::new(
                "Claim badge",
                &Component::GymBadge {
                    gym_id: view.gym_id,
                    owner: key.user_id,
                },
            ));
        }
        Ok(reply.with_buttons(buttons))
    }

    fn show_tutorial(&self, key: PlayerKey) -> Result<Reply, AdventureError> {
        let player = self.store.get_player(key)?;
        let Some(view) = tutorial::tutorial_status(&self.world, &player) else {
            warn!(target: "content", "tutorial requested but no steps are authored");
            return Ok(Reply::ephemeral("No tutorial is configured on this server."));
        };
        let mut reply = Reply::ephemeral(format!(
            "Tutorial step {}/{}: {}",
            view.position, view.total_steps, view.step_code
        ));
        for mission in &view.missions {
            let mark = if mission.completed { "x" } else { " " };
            reply.push_line(format!("[{}] {}", mark, mission.code));
        }
        let mut reward = format!("Reward: ${}", view.reward_money);
        if let Some(item) = view.reward_item {
            reward.push_str(&format!(
                " + {} x{}",
                self.world.item_name(item.item_type_id),
                item.quantity
            ));
        }
        reply.push_line(reward);
        if view.claimed {
            reply.push_line("Reward claimed.");
        } else if view.claimable {
            reply.buttons.push(Button::new(
                "Claim reward",
                &Component::TutorialClaim {
                    step_id: view.step_id,
                },
            ));
        }
        Ok(reply)
    }

    fn show_shop(&self, key: PlayerKey) -> Result<Reply, AdventureError> {
        let player = self.store.get_player(key)?;
        let view = shop::open_shop(&self.world, player.current_location_id)?;
        let mut reply = Reply::ephemeral(format!("Money: ${}", player.money));
        for line in shop::format_shop_listing(&self.world, &view) {
            reply.push_line(line);
        }
        let buttons = view
            .items
            .iter()
            .map(|item| {
                Button::new(
                    format!("Buy {}", self.world.item_name(item.item_type_id)),
                    &Component::ShopBuy {
                        store_item_id: item.id,
                        quantity: 1,
                        owner: key.user_id,
                    },
                )
            })
            .collect();
        Ok(reply.with_buttons(buttons))
    }

    fn show_dex(
        &self,
        key: PlayerKey,
        target: Option<u64>,
        filter: DexFilter,
        now: DateTime<Utc>,
    ) -> Result<Reply, AdventureError> {
        let player = self.viewed_player(key, target)?;
        let summary = dex::dex_summary(&self.world, &player, filter);
        let mut reply = Reply::ephemeral(format!(
            "Pokédex of <@{}> ({}): {} seen, {} owned of {}",
            player.user_id,
            filter.code(),
            summary.seen,
            summary.owned,
            summary.total_species
        ));
        if summary.entries.is_empty() {
            reply.push_line("Nothing to show with this filter.");
        }
        for line in &summary.entries {
            reply.push_line(match line.level {
                None => format!("#{:03} ???", line.species_id),
                Some(0) => format!("#{:03} {} (seen)", line.species_id, line.name),
                Some(level) => format!("#{:03} {} Lv {}", line.species_id, line.name, level),
            });
        }
        let next = filter.next();
        reply.buttons.push(Button::new(
            format!("Show {}", next.code()),
            &Component::DexPage {
                filter: next,
                target: player.user_id,
                owner: key.user_id,
            },
        ));
        if player.key() == key && dex::reached_dex_milestone(&player) {
            self.pulse(key, conditions::POKEDEX_5_AND_CMD, now, &mut reply);
        }
        Ok(reply)
    }
}

fn help_text() -> String {
    [
        "Commands:",
        "start - begin your adventure",
        "move - travel to a neighbouring location",
        "encounter - look for wild Pokémon",
        "gym - challenge the local gym",
        "shop - browse the local store",
        "inventory, pokedex, profile, party [user] - your progress or another trainer's",
        "tutorial - onboarding missions and rewards",
        "ranking [badges|pokedex] - server leaderboards",
        "stamina <1-5>, events <item%> <battle%> <min> <max> - server settings",
    ]
    .join("\n")
}
