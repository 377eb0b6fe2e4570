use thiserror::Error;

/// Why a request to change the active creature was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Roster slot does not exist
    #[error("creature #{} doesn't exist", .0 + 1)]
    IndexOutOfRange(usize),
    /// Target creature has no hit points left
    #[error("creature #{} is incapacitated and can't fight", .0 + 1)]
    TargetIncapacitated(usize),
    /// Target creature is already in battle
    #[error("creature #{} is already in battle", .0 + 1)]
    AlreadyActive(usize),
}

/// Errors raised while managing a roster outside of battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster is full ({capacity} creatures)")]
    CapacityExceeded { capacity: usize },
}

/// Errors for actions submitted by an action provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The requested switch target is not selectable
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    /// Action is not allowed against this opponent
    #[error("action not allowed here: {0}")]
    IllegalActionForContext(String),
}

/// Errors surfaced by a roster store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("roster store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid roster name: {0:?}")]
    InvalidName(String),
}

/// Errors loading a battle configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Errors resolving prefab team data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("team data is malformed: {0}")]
    MalformedData(String),
    #[error("team not found: {0}")]
    TeamNotFound(String),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Type alias for Results using StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for Results using TemplateError
pub type TemplateResult<T> = Result<T, TemplateError>;
