//! Interaction vocabulary: text commands, component ids and replies.
//!
//! Slash commands arrive as text (`move`, `stamina 3`) and button or menu
//! choices arrive as colon-separated component ids whose last field is the
//! owning user, e.g. `move_select:4:1234`.

use uuid::Uuid;

use crate::adventure::dex::DexFilter;
use crate::adventure::errors::AdventureError;
use crate::adventure::settings::MoveEventSettings;
use crate::adventure::types::PlayerKey;

/// Inbound request resolved to one (server, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub server_id: u64,
    pub user_id: u64,
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    Command(String),
    Component(String),
}

impl Interaction {
    pub fn command(server_id: u64, user_id: u64, text: impl Into<String>) -> Self {
        Self {
            server_id,
            user_id,
            kind: InteractionKind::Command(text.into()),
        }
    }

    pub fn component(server_id: u64, user_id: u64, custom_id: impl Into<String>) -> Self {
        Self {
            server_id,
            user_id,
            kind: InteractionKind::Component(custom_id.into()),
        }
    }

    pub fn key(&self) -> PlayerKey {
        PlayerKey::new(self.server_id, self.user_id)
    }
}

/// Text command categories for parsing and routing.
///
/// Views that take an `Option<u64>` show another trainer when given one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Move,
    Encounter,
    Gym,
    Tutorial,
    Shop,
    Inventory(Option<u64>),
    Pokedex(Option<u64>),
    Profile(Option<u64>),
    Party(Option<u64>),
    BadgeRanking,
    DexRanking,
    SetStamina(u32),
    SetEvents(MoveEventSettings),
    Help,
    Unknown(String),
}

/// A user id, bare or as a chat mention (`<@123>`, `<@!123>`).
pub fn parse_user(token: &str) -> Option<u64> {
    token
        .trim_start_matches("<@")
        .trim_start_matches('!')
        .trim_end_matches('>')
        .parse()
        .ok()
}

impl Command {
    pub fn parse(input: &str) -> Command {
        let input = input.trim().trim_start_matches('/').to_lowercase();
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(verb) = parts.first() else {
            return Command::Unknown(input);
        };

        // Outer `None` when the argument of a view is not a user.
        let target = match parts.get(1) {
            None => Some(None),
            Some(token) => parse_user(token).map(Some),
        };
        let view = |make: fn(Option<u64>) -> Command| {
            target.map(make).unwrap_or_else(|| Command::Unknown(input.clone()))
        };
        match *verb {
            "start" | "begin" => Command::Start,
            "move" | "travel" | "m" => Command::Move,
            "encounter" | "explore" | "adventure" => Command::Encounter,
            "gym" => Command::Gym,
            "tutorial" | "t" => Command::Tutorial,
            "shop" | "mart" => Command::Shop,
            "inventory" | "inv" | "bag" | "i" => view(Command::Inventory),
            "pokedex" | "dex" => view(Command::Pokedex),
            "profile" | "me" => view(Command::Profile),
            "party" | "team" => view(Command::Party),
            "ranking" | "rank" => match parts.get(1).copied() {
                Some("pokedex") | Some("dex") => Command::DexRanking,
                _ => Command::BadgeRanking,
            },
            "stamina" => match parts.get(1).and_then(|v| v.parse().ok()) {
                Some(rate) => Command::SetStamina(rate),
                None => Command::Unknown(input.clone()),
            },
            "events" => {
                let numbers: Vec<u64> = parts[1..].iter().filter_map(|v| v.parse().ok()).collect();
                match numbers.as_slice() {
                    [item, battle, min, max] if parts.len() == 5 => {
                        Command::SetEvents(MoveEventSettings {
                            item_chance: (*item).min(u32::MAX as u64) as u32,
                            battle_chance: (*battle).min(u32::MAX as u64) as u32,
                            min_reward: *min,
                            max_reward: *max,
                        })
                    }
                    _ => Command::Unknown(input.clone()),
                }
            }
            "help" | "h" | "?" => Command::Help,
            _ => Command::Unknown(input.clone()),
        }
    }
}

/// Button and menu payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    StarterSelect { species_id: u32, owner: u64 },
    MoveSelect { to_location_id: u32, owner: u64 },
    CatchAttempt { species_id: u32, level: u32, tool: String, owner: u64 },
    CatchFight { species_id: u32, owner: u64 },
    GymFight { gym_id: u32, trainer_id: u32, owner: u64 },
    GymBadge { gym_id: u32, owner: u64 },
    TutorialClaim { step_id: u32 },
    ShopBuy { store_item_id: u32, quantity: u32, owner: u64 },
    ShopConfirm { store_item_id: u32, quantity: u32, owner: u64 },
    ShopCancel { owner: u64 },
    /// Show `target`'s dex with `filter`.
    DexPage { filter: DexFilter, target: u64, owner: u64 },
}

fn field<T: std::str::FromStr>(raw: &str, value: &str) -> Result<T, AdventureError> {
    value
        .parse()
        .map_err(|_| AdventureError::InvalidComponent(raw.to_string()))
}

impl Component {
    pub fn parse(raw: &str) -> Result<Component, AdventureError> {
        let parts: Vec<&str> = raw.split(':').collect();
        let component = match parts.as_slice() {
            ["starter_select", species, owner] => Component::StarterSelect {
                species_id: field(raw, species)?,
                owner: field(raw, owner)?,
            },
            ["move_select", to, owner] => Component::MoveSelect {
                to_location_id: field(raw, to)?,
                owner: field(raw, owner)?,
            },
            ["catch_attempt", species, level, tool, owner] if !tool.is_empty() => {
                Component::CatchAttempt {
                    species_id: field(raw, species)?,
                    level: field(raw, level)?,
                    tool: tool.to_string(),
                    owner: field(raw, owner)?,
                }
            }
            ["catch_fight", species, owner] => Component::CatchFight {
                species_id: field(raw, species)?,
                owner: field(raw, owner)?,
            },
            ["gym_fight", gym, trainer, owner] => Component::GymFight {
                gym_id: field(raw, gym)?,
                trainer_id: field(raw, trainer)?,
                owner: field(raw, owner)?,
            },
            ["gym_badge", gym, owner] => Component::GymBadge {
                gym_id: field(raw, gym)?,
                owner: field(raw, owner)?,
            },
            ["tutorial_claim", step] => Component::TutorialClaim {
                step_id: field(raw, step)?,
            },
            ["shop_buy", item, quantity, owner] => Component::ShopBuy {
                store_item_id: field(raw, item)?,
                quantity: field(raw, quantity)?,
                owner: field(raw, owner)?,
            },
            ["shop_confirm", item, quantity, owner] => Component::ShopConfirm {
                store_item_id: field(raw, item)?,
                quantity: field(raw, quantity)?,
                owner: field(raw, owner)?,
            },
            ["shop_cancel", owner] => Component::ShopCancel {
                owner: field(raw, owner)?,
            },
            ["pokedex_filter", filter, target, owner] => Component::DexPage {
                filter: DexFilter::from_code(filter)
                    .ok_or_else(|| AdventureError::InvalidComponent(raw.to_string()))?,
                target: field(raw, target)?,
                owner: field(raw, owner)?,
            },
            _ => return Err(AdventureError::InvalidComponent(raw.to_string())),
        };
        Ok(component)
    }

    /// User allowed to press this component, if it is owned.
    pub fn owner(&self) -> Option<u64> {
        match self {
            Component::StarterSelect { owner, .. }
            | Component::MoveSelect { owner, .. }
            | Component::CatchAttempt { owner, .. }
            | Component::CatchFight { owner, .. }
            | Component::GymFight { owner, .. }
            | Component::GymBadge { owner, .. }
            | Component::ShopBuy { owner, .. }
            | Component::ShopConfirm { owner, .. }
            | Component::ShopCancel { owner }
            | Component::DexPage { owner, .. } => Some(*owner),
            Component::TutorialClaim { .. } => None,
        }
    }

    pub fn custom_id(&self) -> String {
        match self {
            Component::StarterSelect { species_id, owner } => {
                format!("starter_select:{}:{}", species_id, owner)
            }
            Component::MoveSelect {
                to_location_id,
                owner,
            } => format!("move_select:{}:{}", to_location_id, owner),
            Component::CatchAttempt {
                species_id,
                level,
                tool,
                owner,
            } => format!("catch_attempt:{}:{}:{}:{}", species_id, level, tool, owner),
            Component::CatchFight { species_id, owner } => {
                format!("catch_fight:{}:{}", species_id, owner)
            }
            Component::GymFight {
                gym_id,
                trainer_id,
                owner,
            } => format!("gym_fight:{}:{}:{}", gym_id, trainer_id, owner),
            Component::GymBadge { gym_id, owner } => format!("gym_badge:{}:{}", gym_id, owner),
            Component::TutorialClaim { step_id } => format!("tutorial_claim:{}", step_id),
            Component::ShopBuy {
                store_item_id,
                quantity,
                owner,
            } => format!("shop_buy:{}:{}:{}", store_item_id, quantity, owner),
            Component::ShopConfirm {
                store_item_id,
                quantity,
                owner,
            } => format!("shop_confirm:{}:{}:{}", store_item_id, quantity, owner),
            Component::ShopCancel { owner } => format!("shop_cancel:{}", owner),
            Component::DexPage {
                filter,
                target,
                owner,
            } => format!("pokedex_filter:{}:{}:{}", filter.code(), target, owner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub custom_id: String,
}

impl Button {
    pub fn new(label: impl Into<String>, component: &Component) -> Self {
        Self {
            label: label.into(),
            custom_id: component.custom_id(),
        }
    }
}

/// Presentation-neutral response handed back to the chat layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub body: String,
    pub ephemeral: bool,
    pub buttons: Vec<Button>,
    /// Set when the reply opened a timed flow.
    pub prompt_id: Option<Uuid>,
}

impl Reply {
    pub fn public(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn ephemeral(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ephemeral: true,
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn push_line(&mut self, line: impl AsRef<str>) {
        if !self.body.is_empty() {
            self.body.push('\n');
        }
        self.body.push_str(line.as_ref());
    }
}
