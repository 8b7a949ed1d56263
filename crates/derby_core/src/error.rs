use crate::models::{BettorId, RaceId, RacerId, WagerId};
use thiserror::Error;

/// Why a race could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupIssue {
    TooFewRacers { found: usize, required: usize },
    TooManyRacers { found: usize, max: usize },
    RetiredEntrant(RacerId),
    DuplicateEntrant(RacerId),
    EmptyMap,
    InvalidSegment { index: usize, detail: String },
    InvalidParams(String),
}

impl std::fmt::Display for SetupIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupIssue::TooFewRacers { found, required } => {
                write!(f, "need at least {} active racers, found {}", required, found)
            }
            SetupIssue::TooManyRacers { found, max } => {
                write!(f, "at most {} racers per race, found {}", max, found)
            }
            SetupIssue::RetiredEntrant(id) => write!(f, "racer {} is retired", id),
            SetupIssue::DuplicateEntrant(id) => write!(f, "racer {} entered twice", id),
            SetupIssue::EmptyMap => write!(f, "map has no segments"),
            SetupIssue::InvalidSegment { index, detail } => {
                write!(f, "segment {}: {}", index, detail)
            }
            SetupIssue::InvalidParams(detail) => write!(f, "simulation parameters: {}", detail),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerbyError {
    #[error("Invalid race setup: {0}")]
    InvalidRaceSetup(SetupIssue),

    #[error("Roster underflow: {available} eligible racers, minimum is {required}")]
    RosterUnderflow { available: usize, required: usize },

    #[error("Outcome mismatch: wager {wager} is for race {wager_race}, outcome is for race {outcome_race}")]
    OutcomeMismatch {
        wager: WagerId,
        wager_race: RaceId,
        outcome_race: RaceId,
    },

    #[error("Duplicate wager: {0} appears more than once")]
    DuplicateWager(WagerId),
}

impl DerbyError {
    /// Domain errors are local validation failures; retry policy belongs to the scheduler.
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn needs_operator(&self) -> bool {
        matches!(self, DerbyError::RosterUnderflow { .. })
    }
}

impl From<SetupIssue> for DerbyError {
    fn from(issue: SetupIssue) -> Self {
        DerbyError::InvalidRaceSetup(issue)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Racer not found: {0}")]
    RacerNotFound(RacerId),

    #[error("Payout for wager {0} was already applied")]
    AlreadyApplied(WagerId),

    #[error("Bettor {bettor} has {balance}, cannot stake {amount}")]
    InsufficientFunds {
        bettor: BettorId,
        balance: u64,
        amount: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DerbyError>;
