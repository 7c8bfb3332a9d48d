use thiserror::Error;

/// How an [`AdventureError`] should be treated at the interaction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The player asked for something the current state does not allow.
    Precondition,
    /// World content or server settings are missing something the action needs.
    ContentGap,
    /// Storage or internal failure; shown to the player as a generic error.
    Unexpected,
}

/// Errors that can arise while running an adventure action.
///
/// Precondition and content-gap variants are expected outcomes and never leave
/// a partial write behind: every engine aborts before the player record is saved.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Internal error (task join errors, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),

    #[error("player has not started an adventure")]
    PlayerNotFound,

    #[error("player has already started an adventure")]
    AlreadyStarted,

    #[error("no stamina left")]
    NoStamina,

    #[error("location {0} is not reachable from here")]
    InvalidDestination(u32),

    #[error("travel requires the badge of gym {0}")]
    RequiresBadge(u32),

    #[error("no wild encounters at this location")]
    NoEncountersHere,

    #[error("species {0} not found")]
    SpeciesNotFound(String),

    #[error("no {0} left in the inventory")]
    NoCaptureTool(String),

    #[error("{0} cannot be used to catch Pokémon")]
    NotACaptureTool(String),

    #[error("no wild Pokémon is waiting for this player")]
    NoActiveEncounter,

    #[error("user {0} has no adventure on this server")]
    UnknownTrainer(u64),

    #[error("player is not at the gym location")]
    WrongLocation,

    #[error("gym {0} not found")]
    GymNotFound(u32),

    #[error("gym is closed")]
    GymClosed,

    #[error("trainer {0} not found")]
    TrainerNotFound(u32),

    #[error("trainer {0} already defeated")]
    TrainerAlreadyDefeated(u32),

    #[error("trainer {next} must be defeated first")]
    LadderOutOfOrder { next: u32 },

    #[error("the gym ladder is not complete")]
    LadderIncomplete,

    #[error("badge already owned")]
    BadgeAlreadyOwned,

    #[error("tutorial step {0} not found")]
    StepNotFound(u32),

    #[error("not all missions of the step are complete")]
    NotAllMissionsComplete,

    #[error("reward already claimed")]
    RewardAlreadyClaimed,

    #[error("no shop at this location")]
    NoShopHere,

    #[error("item {0} is not sold here")]
    ItemUnavailable(u32),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("not enough money: need {needed}, have {available}")]
    NotEnoughMoney { needed: u64, available: u64 },

    #[error("stamina per hour must be between 1 and 5, got {0}")]
    InvalidStaminaRate(u32),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("this interaction belongs to another player")]
    NotYourInteraction,

    #[error("unrecognized component id: {0}")]
    InvalidComponent(String),

    #[error("no starter species configured")]
    NoStartersConfigured,

    #[error("no encounter table defined for location {0}")]
    NoEncounterTableDefined(u32),

    #[error("no gym at location {0}")]
    NoGymHere(u32),

    #[error("initial location {0} is missing or unavailable")]
    InitialLocationMissing(String),

    #[error("invalid world content: {0}")]
    InvalidWorld(String),
}

impl AdventureError {
    pub fn kind(&self) -> ErrorKind {
        use AdventureError::*;
        match self {
            Sled(_) | Bincode(_) | Io(_) | SchemaMismatch { .. } | Internal(_) => {
                ErrorKind::Unexpected
            }
            NoStartersConfigured
            | NoEncounterTableDefined(_)
            | NoGymHere(_)
            | InitialLocationMissing(_)
            | InvalidWorld(_) => ErrorKind::ContentGap,
            _ => ErrorKind::Precondition,
        }
    }
}
