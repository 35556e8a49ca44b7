//! Core types: sides, participants, state, configuration, RNG, errors.
//!
//! Everything here is independent of how bids are produced; the rules and
//! oracle modules build on these types.

pub mod side;
pub mod participant;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use side::{Side, Sides};
pub use participant::Participant;
pub use rng::GameRng;
pub use config::{GameConfig, DEFAULT_LOOKBACK};
pub use error::{EngineResult, GameError, OracleError, ReportError};
pub use state::{GameState, Ledger, RoundRecord, DEFAULT_STARTING_MONEY};
