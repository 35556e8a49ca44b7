//! Round resolution.
//!
//! One call to `RoundEngine::play_round` attempts exactly one round:
//!
//! 1. Compute this round's maintenance fee.
//! 2. Insolvency check: a side that cannot pay is eliminated before bidding.
//!    Both insolvent ends the game; one insolvent starts a walkover for the
//!    other from the same round.
//! 3. Collect maintenance from both sides.
//! 4. Clamp the human bid, ask the oracle for the other bid.
//! 5. Pay both bids (all-pay), higher bid scores, ties score nothing.
//! 6. Record the round.
//! 7. Bankruptcy check: a side at $0 is eliminated. One bankrupt starts a
//!    walkover for the other from the next round.
//!
//! Steps 3 to 5 run on a scratch copy of the participants. The state is only
//! written once the oracle has answered, so an oracle failure leaves it
//! exactly as it was.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::maintenance::MaintenanceSchedule;
use super::walkover::{WalkoverEngine, WalkoverSummary};
use crate::core::{
    EngineResult, GameConfig, GameError, GameState, Ledger, Participant, RoundRecord, Side, Sides,
};
use crate::oracle::{BidOracle, BidRequest, Personality, Rationale, RoundSummary};

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Neither side could pay maintenance.
    BothInsolvent,
    /// This side could not pay maintenance.
    Insolvent(Side),
    /// Both sides reached $0 after bidding.
    BothBankrupt,
    /// This side reached $0 after bidding.
    Bankrupt(Side),
}

impl EndReason {
    /// Sides eliminated by this ending.
    #[must_use]
    pub fn eliminated(&self) -> Vec<Side> {
        match *self {
            EndReason::BothInsolvent | EndReason::BothBankrupt => Side::ALL.to_vec(),
            EndReason::Insolvent(side) | EndReason::Bankrupt(side) => vec![side],
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::BothInsolvent => f.write_str("Both players could not afford maintenance fees."),
            EndReason::Insolvent(side) => write!(f, "{side} could not afford maintenance fees."),
            EndReason::BothBankrupt => f.write_str("Both players hit $0."),
            EndReason::Bankrupt(side) => write!(f, "{side} hit $0."),
        }
    }
}

/// Terminal outcome of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub reason: EndReason,
    /// Present when one side survived and played out a walkover.
    pub walkover: Option<WalkoverSummary>,
}

impl fmt::Display for GameEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Final standing by score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(Side),
    Draw,
}

impl MatchResult {
    /// Compare the two scores.
    #[must_use]
    pub fn from_scores(scores: Sides<u32>) -> Self {
        match scores.player.cmp(&scores.ai) {
            Ordering::Greater => MatchResult::Winner(Side::Player),
            Ordering::Less => MatchResult::Winner(Side::Ai),
            Ordering::Equal => MatchResult::Draw,
        }
    }

    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, MatchResult::Winner(s) if *s == side)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Winner(side) => write!(f, "{side} wins"),
            MatchResult::Draw => f.write_str("Draw"),
        }
    }
}

/// Result of one `play_round` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The round was played and both sides are still solvent.
    Continue {
        record: RoundRecord,
        rationale: Rationale,
    },
    /// The game is over.
    ///
    /// `record` is the bid round that caused a bankruptcy; it is `None` when
    /// the game ended on insolvency before any bid.
    Ended {
        end: GameEnd,
        record: Option<RoundRecord>,
        rationale: Rationale,
    },
}

impl RoundOutcome {
    #[must_use]
    pub fn is_ended(&self) -> bool {
        matches!(self, RoundOutcome::Ended { .. })
    }

    /// The bid round played by this call, if any.
    #[must_use]
    pub fn record(&self) -> Option<&RoundRecord> {
        match self {
            RoundOutcome::Continue { record, .. } => Some(record),
            RoundOutcome::Ended { record, .. } => record.as_ref(),
        }
    }

    /// The oracle's rationale (empty when no bid was requested).
    #[must_use]
    pub fn rationale(&self) -> &Rationale {
        match self {
            RoundOutcome::Continue { rationale, .. } | RoundOutcome::Ended { rationale, .. } => {
                rationale
            }
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<&GameEnd> {
        match self {
            RoundOutcome::Continue { .. } => None,
            RoundOutcome::Ended { end, .. } => Some(end),
        }
    }
}

/// Decide the winner of a sealed-bid round. Equal bids are a tie.
#[must_use]
pub fn adjudicate(bids: Sides<u64>) -> Option<Side> {
    match bids.player.cmp(&bids.ai) {
        Ordering::Greater => Some(Side::Player),
        Ordering::Less => Some(Side::Ai),
        Ordering::Equal => None,
    }
}

/// Plays rounds against a bid oracle.
///
/// The engine holds no game state; every call works on the `GameState` it
/// is given.
pub struct RoundEngine<O: BidOracle> {
    oracle: O,
    schedule: MaintenanceSchedule,
    walkover: WalkoverEngine,
    lookback: usize,
    personality: Personality,
    human_side: Side,
}

impl<O: BidOracle> RoundEngine<O> {
    /// Create an engine from a game configuration.
    pub fn new(oracle: O, config: &GameConfig) -> Self {
        Self {
            oracle,
            schedule: config.maintenance,
            walkover: WalkoverEngine::new(config.maintenance),
            lookback: config.lookback,
            personality: config.personality,
            human_side: config.human_side,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn schedule(&self) -> &MaintenanceSchedule {
        &self.schedule
    }

    /// Side whose bid is passed to `play_round`.
    pub fn human_side(&self) -> Side {
        self.human_side
    }

    /// Side whose bid comes from the oracle.
    pub fn oracle_side(&self) -> Side {
        self.human_side.opponent()
    }

    /// Attempt the next round with the human side bidding `bid`.
    ///
    /// A bid above the human side's post-maintenance money is clamped. On
    /// `GameError::Oracle` the state is unchanged and the round can be
    /// retried.
    pub async fn play_round(&self, state: &mut GameState, bid: u64) -> EngineResult<RoundOutcome> {
        let round = state.current_round();
        let fee = self.schedule.fee(round);
        let before_maintenance = state.participants().map(|_, p| p.money);

        let insolvent = state.participants().sides_where(|p| !p.can_afford(fee));
        match insolvent.as_slice() {
            [] => {}
            [side] => {
                let side = *side;
                info!(round, fee, side = %side, "maintenance unaffordable");
                state.set_maintenance_fee_current(fee);
                let summary = self.walkover.run(state, side.opponent(), round);
                return Ok(RoundOutcome::Ended {
                    end: GameEnd {
                        reason: EndReason::Insolvent(side),
                        walkover: Some(summary),
                    },
                    record: None,
                    rationale: Rationale::new(),
                });
            }
            _ => {
                info!(round, fee, "maintenance unaffordable for both sides");
                state.set_maintenance_fee_current(fee);
                return Ok(RoundOutcome::Ended {
                    end: GameEnd {
                        reason: EndReason::BothInsolvent,
                        walkover: None,
                    },
                    record: None,
                    rationale: Rationale::new(),
                });
            }
        }

        let mut scratch = state.participants().clone();
        for side in Side::ALL {
            scratch[side].pay(fee);
        }
        let before_bid = scratch.map(|_, p| p.money);

        let human = self.human_side;
        let ai = self.oracle_side();
        let human_bid = bid.min(before_bid[human]);
        if human_bid < bid {
            debug!(round, requested = bid, clamped = human_bid, "human bid clamped");
        }

        let request = self.bid_request(state, &scratch, round, fee);
        let decision = self
            .oracle
            .decide(&request)
            .await
            .map_err(|source| GameError::Oracle { round, source })?;

        if decision.final_bid > before_bid[ai] {
            warn!(
                round,
                bid = decision.final_bid,
                money = before_bid[ai],
                "oracle bid exceeds available money"
            );
        }

        let mut bids = Sides::with_value(0);
        bids[human] = human_bid;
        bids[ai] = decision.final_bid;

        let winner = adjudicate(bids);
        for side in Side::ALL {
            scratch[side].pay(bids[side]);
        }
        if let Some(side) = winner {
            scratch[side].award_point();
        }

        let record = RoundRecord {
            round,
            bids,
            winner,
            maintenance_fee: fee,
            ledger: scratch.map(|side, p| Ledger {
                score: p.score,
                money_before_maintenance: before_maintenance[side],
                money_before_bid: before_bid[side],
                money_after_bid: p.money,
            }),
        };

        *state.participants_mut() = scratch;
        state.set_maintenance_fee_current(fee);
        state.record(record.clone());

        info!(
            round,
            fee,
            player_bid = bids.player,
            ai_bid = bids.ai,
            winner = winner.map_or("TIE", Side::label),
            "round settled"
        );

        let next_round = round.saturating_add(1);
        let bankrupt = state.participants().sides_where(Participant::is_bankrupt);
        let rationale = decision.rationale;

        let outcome = match bankrupt.as_slice() {
            [] => {
                state.set_current_round(next_round);
                RoundOutcome::Continue { record, rationale }
            }
            [side] => {
                let side = *side;
                info!(round, side = %side, "bankrupt after bidding");
                let summary = self.walkover.run(state, side.opponent(), next_round);
                RoundOutcome::Ended {
                    end: GameEnd {
                        reason: EndReason::Bankrupt(side),
                        walkover: Some(summary),
                    },
                    record: Some(record),
                    rationale,
                }
            }
            _ => {
                info!(round, "both sides bankrupt after bidding");
                state.set_current_round(next_round);
                RoundOutcome::Ended {
                    end: GameEnd {
                        reason: EndReason::BothBankrupt,
                        walkover: None,
                    },
                    record: Some(record),
                    rationale,
                }
            }
        };

        Ok(outcome)
    }

    /// Build the oracle's view: post-maintenance money, current scores and
    /// the lookback window.
    fn bid_request(
        &self,
        state: &GameState,
        scratch: &Sides<Participant>,
        round: u32,
        fee: u64,
    ) -> BidRequest {
        let side = self.oracle_side();
        let me = &scratch[side];
        let opp = &scratch[side.opponent()];

        BidRequest {
            side,
            round,
            maintenance_fee: fee,
            outlook: self.schedule.outlook(round),
            my_money: me.money,
            opp_money: opp.money,
            my_score: me.score,
            opp_score: opp.score,
            last_rounds: state.recent(self.lookback).map(RoundSummary::from).collect(),
            personality: self.personality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OracleError;
    use crate::oracle::{BidDecision, ScriptedOracle};
    use async_trait::async_trait;

    struct FailingOracle;

    #[async_trait]
    impl BidOracle for FailingOracle {
        async fn decide(&self, _request: &BidRequest) -> Result<BidDecision, OracleError> {
            Err(OracleError::Unavailable {
                message: "offline".to_string(),
            })
        }
    }

    fn engine(bids: Vec<u64>) -> RoundEngine<ScriptedOracle> {
        RoundEngine::new(ScriptedOracle::new(bids), &GameConfig::default())
    }

    #[test]
    fn test_adjudicate() {
        assert_eq!(adjudicate(Sides::new(30, 20)), Some(Side::Player));
        assert_eq!(adjudicate(Sides::new(0, 1)), Some(Side::Ai));
        assert_eq!(adjudicate(Sides::new(15, 15)), None);
    }

    #[test]
    fn test_end_reason_messages() {
        assert_eq!(
            EndReason::Insolvent(Side::Player).to_string(),
            "PLAYER could not afford maintenance fees."
        );
        assert_eq!(
            EndReason::BothInsolvent.to_string(),
            "Both players could not afford maintenance fees."
        );
        assert_eq!(EndReason::Bankrupt(Side::Ai).to_string(), "AI hit $0.");
        assert_eq!(EndReason::BothBankrupt.to_string(), "Both players hit $0.");
        assert_eq!(EndReason::BothBankrupt.eliminated(), vec![Side::Player, Side::Ai]);
    }

    #[test]
    fn test_match_result() {
        let result = MatchResult::from_scores(Sides::new(3, 1));
        assert!(result.is_winner(Side::Player));
        assert!(!result.is_winner(Side::Ai));
        assert_eq!(MatchResult::from_scores(Sides::new(2, 2)), MatchResult::Draw);
        assert!(!MatchResult::Draw.is_winner(Side::Player));
    }

    #[tokio::test]
    async fn test_first_round() {
        let engine = engine(vec![20]);
        let mut state = GameState::new(100);

        let outcome = engine.play_round(&mut state, 30).await.unwrap();

        assert!(!outcome.is_ended());
        let record = outcome.record().unwrap();
        assert_eq!(record.winner, Some(Side::Player));
        assert_eq!(record.maintenance_fee, 0);
        assert_eq!(state.participant(Side::Player).money, 70);
        assert_eq!(state.participant(Side::Ai).money, 80);
        assert_eq!(state.participant(Side::Player).score, 1);
        assert_eq!(state.current_round(), 2);
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn test_tie_scores_nothing() {
        let engine = engine(vec![15]);
        let mut state = GameState::new(100);

        let outcome = engine.play_round(&mut state, 15).await.unwrap();

        assert_eq!(outcome.record().unwrap().winner, None);
        assert_eq!(state.participant(Side::Player).score, 0);
        assert_eq!(state.participant(Side::Ai).score, 0);
        assert_eq!(state.participant(Side::Player).money, 85);
        assert_eq!(state.participant(Side::Ai).money, 85);
    }

    #[tokio::test]
    async fn test_human_bid_clamped_after_maintenance() {
        let engine = engine(vec![0, 0, 1]);
        let mut state = GameState::new(100).with_money(Side::Player, 12).at_round(3);

        let outcome = engine.play_round(&mut state, 50).await.unwrap();

        let record = outcome.record().unwrap();
        assert_eq!(record.maintenance_fee, 5);
        assert_eq!(record.bids.player, 7);
        assert_eq!(record.ledger.player.money_before_maintenance, 12);
        assert_eq!(record.ledger.player.money_before_bid, 7);
        assert_eq!(record.ledger.player.money_after_bid, 0);
    }

    #[tokio::test]
    async fn test_both_insolvent() {
        let engine = engine(vec![]);
        let mut state = GameState::new(100)
            .with_money(Side::Player, 4)
            .with_money(Side::Ai, 3)
            .at_round(3);

        let outcome = engine.play_round(&mut state, 0).await.unwrap();

        assert_eq!(
            outcome.end().map(|e| e.reason),
            Some(EndReason::BothInsolvent)
        );
        assert!(outcome.record().is_none());
        assert!(outcome.rationale().is_empty());
        assert_eq!(state.current_round(), 3);
        assert_eq!(state.maintenance_fee_current(), 5);
        assert_eq!(state.participant(Side::Player).money, 4);
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn test_oracle_failure_leaves_state_untouched() {
        let engine = RoundEngine::new(FailingOracle, &GameConfig::default());
        let mut state = GameState::new(100).at_round(3);
        let before = state.clone();

        let result = engine.play_round(&mut state, 10).await;

        match result {
            Err(GameError::Oracle { round, source }) => {
                assert_eq!(round, 3);
                assert!(matches!(source, OracleError::Unavailable { .. }));
            }
            other => panic!("expected oracle error, got {other:?}"),
        }
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_oracle_sees_post_maintenance_money() {
        struct Inspecting;

        #[async_trait]
        impl BidOracle for Inspecting {
            async fn decide(&self, request: &BidRequest) -> Result<BidDecision, OracleError> {
                assert_eq!(request.side, Side::Ai);
                assert_eq!(request.maintenance_fee, 5);
                assert_eq!(request.my_money, 45);
                assert_eq!(request.opp_money, 55);
                assert_eq!(request.outlook.next_round, 5);
                assert_eq!(request.outlook.in_2_rounds, 10);
                Ok(BidDecision {
                    final_bid: 1,
                    rationale: Rationale::from_iter(["ok".to_string()]),
                })
            }
        }

        let engine = RoundEngine::new(Inspecting, &GameConfig::default());
        let mut state = GameState::new(100)
            .with_money(Side::Player, 60)
            .with_money(Side::Ai, 50)
            .at_round(3);

        let outcome = engine.play_round(&mut state, 2).await.unwrap();
        assert_eq!(outcome.rationale().as_slice(), ["ok".to_string()]);
    }

    #[tokio::test]
    async fn test_lookback_window() {
        struct CountingLookback;

        #[async_trait]
        impl BidOracle for CountingLookback {
            async fn decide(&self, request: &BidRequest) -> Result<BidDecision, OracleError> {
                let expected = (request.round as usize - 1).min(2);
                assert_eq!(request.last_rounds.len(), expected);
                if let Some(last) = request.last_rounds.last() {
                    assert_eq!(last.round, request.round - 1);
                }
                Ok(BidDecision {
                    final_bid: 1,
                    rationale: Rationale::from_iter(["lookback".to_string()]),
                })
            }
        }

        let config = GameConfig::default().with_lookback(2);
        let engine = RoundEngine::new(CountingLookback, &config);
        let mut state = GameState::new(100);
        for _ in 0..4 {
            engine.play_round(&mut state, 1).await.unwrap();
        }
        assert_eq!(state.current_round(), 5);
    }

    #[tokio::test]
    async fn test_oracle_overbid_saturates() {
        struct Overbid;

        #[async_trait]
        impl BidOracle for Overbid {
            async fn decide(&self, _request: &BidRequest) -> Result<BidDecision, OracleError> {
                Ok(BidDecision {
                    final_bid: 500,
                    rationale: Rationale::from_iter(["all in".to_string()]),
                })
            }
        }

        let engine = RoundEngine::new(Overbid, &GameConfig::default());
        let mut state = GameState::new(100);

        let outcome = engine.play_round(&mut state, 10).await.unwrap();

        let record = outcome.record().unwrap();
        assert_eq!(record.bids.ai, 500);
        assert_eq!(record.ledger.ai.money_after_bid, 0);
        assert_eq!(outcome.end().map(|e| e.reason), Some(EndReason::Bankrupt(Side::Ai)));
    }

    #[tokio::test]
    async fn test_human_plays_ai_side() {
        let config = GameConfig::default().with_human_side(Side::Ai);
        let engine = RoundEngine::new(ScriptedOracle::new(vec![40]), &config);
        let mut state = GameState::new(100);

        let outcome = engine.play_round(&mut state, 10).await.unwrap();

        let record = outcome.record().unwrap();
        assert_eq!(record.bids, Sides::new(40, 10));
        assert_eq!(record.winner, Some(Side::Player));
    }
}
