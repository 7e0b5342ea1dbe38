//! Error types for the race core.
//!
//! Gameplay guard clauses (power-ups outside a race, past the usage cap)
//! are not errors; they are silent no-ops. Errors are reserved for input
//! that falls outside the closed racer roster and for bad configuration.

pub type RaceResult<T> = Result<T, RaceError>;

#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("unknown racer: {0}")]
    UnknownRacer(String),

    #[error("bet rejected: {0}")]
    BetRejected(&'static str),

    #[error("malformed race configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid race configuration: {0}")]
    InvalidConfig(String),
}
