//! Game session driver.
//!
//! Owns the live `GameState` and the `RoundEngine` and refuses further rounds
//! once the game has ended.

use std::path::Path;

use tracing::info;

use crate::core::{EngineResult, GameConfig, GameError, GameState, Side};
use crate::oracle::BidOracle;
use crate::report::{ReportContext, ReportGenerator};
use crate::rules::{EndReason, GameEnd, MaintenanceSchedule, MatchResult, RoundEngine, RoundOutcome};

/// A single game in progress.
pub struct GameSession<O: BidOracle> {
    engine: RoundEngine<O>,
    config: GameConfig,
    state: GameState,
    end: Option<GameEnd>,
}

impl<O: BidOracle> GameSession<O> {
    /// Start a fresh game.
    pub fn new(oracle: O, config: GameConfig) -> EngineResult<Self> {
        config.validate()?;
        let state = GameState::new(config.starting_money);
        Ok(Self {
            engine: RoundEngine::new(oracle, &config),
            config,
            state,
            end: None,
        })
    }

    /// Continue from an existing state.
    ///
    /// A state that a finished game leaves behind is treated as finished:
    /// one ending in a walkover round, one where a side holds $0, or one
    /// where neither side can pay the current round's fee. The walkover
    /// summary is not recoverable from the state, so `end().walkover` is
    /// `None` after a resume.
    pub fn resume(oracle: O, config: GameConfig, state: GameState) -> EngineResult<Self> {
        config.validate()?;
        let end = ended_on_resume(&state, &config.maintenance);
        Ok(Self {
            engine: RoundEngine::new(oracle, &config),
            config,
            state,
            end,
        })
    }

    /// Continue from state transfer JSON (leniently hydrated).
    pub fn load_json(oracle: O, config: GameConfig, text: &str) -> EngineResult<Self> {
        let state = GameState::from_json_str(text)?;
        Self::resume(oracle, config, state)
    }

    /// Continue from a state file.
    pub async fn load_file(oracle: O, config: GameConfig, path: impl AsRef<Path>) -> EngineResult<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::load_json(oracle, config, &text)
    }

    /// Serialize the current state to the transfer shape.
    pub fn save_json(&self) -> EngineResult<String> {
        self.state.to_json_pretty()
    }

    /// Write the current state to a file.
    pub async fn save_file(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let text = self.save_json()?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    /// Play the next round with the human side bidding `bid`.
    pub async fn play_round(&mut self, bid: u64) -> EngineResult<RoundOutcome> {
        if let Some(end) = &self.end {
            return Err(GameError::GameOver {
                reason: end.to_string(),
            });
        }

        let outcome = self.engine.play_round(&mut self.state, bid).await?;
        if let Some(end) = outcome.end() {
            info!(
                reason = %end.reason,
                player_score = self.state.participant(Side::Player).score,
                ai_score = self.state.participant(Side::Ai).score,
                "game over"
            );
            self.end = Some(*end);
        }
        Ok(outcome)
    }

    /// Play rounds from a bid sequence until the game ends or bids run out.
    pub async fn play_out(
        &mut self,
        bids: impl IntoIterator<Item = u64>,
    ) -> EngineResult<Vec<RoundOutcome>> {
        let mut outcomes = Vec::new();
        for bid in bids {
            if self.is_over() {
                break;
            }
            outcomes.push(self.play_round(bid).await?);
        }
        Ok(outcomes)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Independent copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &RoundEngine<O> {
        &self.engine
    }

    /// How the game ended, if it has.
    pub fn end(&self) -> Option<&GameEnd> {
        self.end.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    /// Standing by score (provisional until the game is over).
    pub fn result(&self) -> MatchResult {
        MatchResult::from_scores(self.state.participants().map(|_, p| p.score))
    }

    /// Maintenance fee for the round about to be attempted.
    pub fn next_fee(&self) -> u64 {
        self.engine.schedule().fee(self.state.current_round())
    }

    pub fn report_context(&self) -> ReportContext {
        ReportContext::from_state(&self.state)
    }

    /// Produce a report through an external generator.
    pub async fn generate_report<G>(&self, generator: &G) -> EngineResult<String>
    where
        G: ReportGenerator + ?Sized,
    {
        Ok(generator.generate(&self.report_context()).await?)
    }
}

fn ended_on_resume(state: &GameState, schedule: &MaintenanceSchedule) -> Option<GameEnd> {
    let walkover_loser = state
        .last_record()
        .filter(|r| r.is_walkover())
        .and_then(|r| r.winner)
        .map(Side::opponent);

    let reason = if let Some(loser) = walkover_loser {
        if state.participant(loser).is_bankrupt() {
            EndReason::Bankrupt(loser)
        } else {
            EndReason::Insolvent(loser)
        }
    } else {
        let fee = schedule.fee(state.current_round());
        let bankrupt = state.participants().sides_where(|p| p.is_bankrupt());
        match bankrupt.as_slice() {
            [side] => EndReason::Bankrupt(*side),
            [_, _] => EndReason::BothBankrupt,
            _ if state.participants().sides_where(|p| !p.can_afford(fee)).len() == 2 => {
                EndReason::BothInsolvent
            }
            _ => return None,
        }
    };
    Some(GameEnd {
        reason,
        walkover: None,
    })
}
