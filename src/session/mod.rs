//! Driving a game to completion.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use allpay_duel::session::GameSession;
//! use allpay_duel::oracle::{GuardedOracle, HeuristicPlanner};
//!
//! let oracle = GuardedOracle::new(HeuristicPlanner::new(), config.seed);
//! let mut session = GameSession::new(oracle, config)?;
//!
//! while !session.is_over() {
//!     let outcome = session.play_round(read_bid()?).await?;
//!     // show outcome.record() and outcome.rationale()
//! }
//!
//! let report = session.generate_report(&ProfileReporter::default()).await?;
//! ```

pub mod driver;

pub use driver::GameSession;
