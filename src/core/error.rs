//! Error types.
//!
//! Insolvency and bankruptcy are not errors; they are `RoundOutcome::Ended`
//! variants. Errors here are the failures a caller cannot play through.

use thiserror::Error;

/// Failure to obtain a bid from a bid oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("bid oracle unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed bid plan: {message}")]
    MalformedPlan { message: String },

    #[error("bid planner failed: {message}")]
    Planner { message: String },
}

/// Failure to produce a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("report generator unavailable: {message}")]
    Unavailable { message: String },

    #[error("report generation failed: {message}")]
    Generation { message: String },
}

/// Engine-level errors.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("bid oracle failed in round {round}: {source}")]
    Oracle {
        round: u32,
        #[source]
        source: OracleError,
    },

    #[error("game is already over: {reason}")]
    GameOver { reason: String },

    #[error("invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Report(#[from] ReportError),
}

pub type EngineResult<T> = Result<T, GameError>;
