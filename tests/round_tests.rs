//! Round engine scenario tests.
//!
//! These tests drive `RoundEngine` through complete rounds with scripted
//! oracles and check money, scores, history and the round counter.

use allpay_duel::core::{GameConfig, GameState, Side};
use allpay_duel::oracle::ScriptedOracle;
use allpay_duel::rules::{EndReason, RoundEngine, RoundOutcome};

fn engine(ai_bids: Vec<u64>) -> RoundEngine<ScriptedOracle> {
    RoundEngine::new(ScriptedOracle::new(ai_bids), &GameConfig::default())
}

/// 100/100, round 1, fee 0: player bids 30, oracle bids 20.
#[tokio::test]
async fn test_opening_round_player_wins() {
    let engine = engine(vec![20]);
    let mut state = GameState::new(100);

    let outcome = engine.play_round(&mut state, 30).await.unwrap();

    assert!(matches!(outcome, RoundOutcome::Continue { .. }));
    assert_eq!(state.participant(Side::Player).money, 70);
    assert_eq!(state.participant(Side::Ai).money, 80);
    assert_eq!(state.participant(Side::Player).score, 1);
    assert_eq!(state.participant(Side::Ai).score, 0);
    assert_eq!(state.history().len(), 1);
    assert_eq!(state.current_round(), 2);
    assert_eq!(state.maintenance_fee_current(), 0);

    let record = &state.history()[0];
    assert_eq!(record.round, 1);
    assert_eq!(record.winner, Some(Side::Player));
    assert_eq!(record.ledger.player.money_before_bid, 100);
    assert_eq!(record.ledger.ai.money_after_bid, 80);
}

/// Maintenance is collected before bidding once fees start.
#[tokio::test]
async fn test_maintenance_collected_from_round_three() {
    let engine = engine(vec![10, 10, 10]);
    let mut state = GameState::new(100);

    for _ in 0..3 {
        engine.play_round(&mut state, 5).await.unwrap();
    }

    let fees: Vec<u64> = state.history().iter().map(|r| r.maintenance_fee).collect();
    assert_eq!(fees, vec![0, 0, 5]);

    let third = &state.history()[2];
    assert_eq!(third.ledger.player.money_before_maintenance, 90);
    assert_eq!(third.ledger.player.money_before_bid, 85);
    assert_eq!(third.ledger.player.money_after_bid, 80);
    assert_eq!(third.ledger.ai.money_after_bid, 65);
    assert_eq!(state.participant(Side::Ai).score, 3);
    assert_eq!(state.current_round(), 4);
}

/// Both below the fee: game over, no record, no walkover, counter unchanged.
#[tokio::test]
async fn test_double_insolvency_ends_without_records() {
    let engine = engine(vec![]);
    let mut state = GameState::new(100)
        .with_money(Side::Player, 2)
        .with_money(Side::Ai, 4)
        .at_round(5);

    let outcome = engine.play_round(&mut state, 1).await.unwrap();

    let end = outcome.end().copied().unwrap();
    assert_eq!(end.reason, EndReason::BothInsolvent);
    assert!(end.walkover.is_none());
    assert!(outcome.record().is_none());
    assert!(state.history().is_empty());
    assert_eq!(state.current_round(), 5);
    assert_eq!(state.participant(Side::Player).money, 2);
    assert_eq!(state.participant(Side::Ai).money, 4);
}

/// Insolvency is all-or-nothing: the solvent side is not charged for the
/// round that was never played, only for the walkover rounds that follow.
#[tokio::test]
async fn test_single_insolvency_charges_nobody_for_bidding() {
    let engine = engine(vec![]);
    let mut state = GameState::new(100)
        .with_money(Side::Player, 3)
        .with_money(Side::Ai, 50)
        .at_round(3);

    let outcome = engine.play_round(&mut state, 3).await.unwrap();

    let end = outcome.end().copied().unwrap();
    assert_eq!(end.reason, EndReason::Insolvent(Side::Player));
    assert_eq!(end.reason.to_string(), "PLAYER could not afford maintenance fees.");
    assert!(outcome.record().is_none());

    // first walkover record is the round that was about to be played
    let first = &state.history()[0];
    assert_eq!(first.round, 3);
    assert!(first.is_walkover());
    assert_eq!(first.ledger.player.money_after_bid, 3);
    assert_eq!(state.participant(Side::Player).money, 3);
}

/// Mutual bankruptcy after bidding: game over, counter still advances.
#[tokio::test]
async fn test_mutual_bankruptcy_advances_counter() {
    let engine = engine(vec![100]);
    let mut state = GameState::new(100);

    let outcome = engine.play_round(&mut state, 100).await.unwrap();

    let end = outcome.end().copied().unwrap();
    assert_eq!(end.reason, EndReason::BothBankrupt);
    assert!(end.walkover.is_none());
    assert_eq!(outcome.record().map(|r| r.winner), Some(None));
    assert_eq!(state.current_round(), 2);
    assert_eq!(state.history().len(), 1);
}

/// One side bankrupt after bidding: walkover starts at the next round.
#[tokio::test]
async fn test_bankruptcy_walkover_starts_next_round() {
    let engine = engine(vec![10]);
    let mut state = GameState::new(100).with_money(Side::Player, 40);

    let outcome = engine.play_round(&mut state, 40).await.unwrap();

    let end = outcome.end().copied().unwrap();
    assert_eq!(end.reason, EndReason::Bankrupt(Side::Player));
    let walkover = end.walkover.unwrap();
    assert_eq!(walkover.survivor, Side::Ai);
    assert_eq!(walkover.start_round, 2);

    // the bid round that caused it is still reported and recorded
    let record = outcome.record().unwrap();
    assert_eq!(record.round, 1);
    assert_eq!(record.winner, Some(Side::Player));
    assert_eq!(state.history()[0], *record);
    assert_eq!(state.history()[1].round, 2);
    assert!(state.history()[1].is_walkover());
}

/// The counter tracks the next round to attempt across a whole game.
#[tokio::test]
async fn test_counter_follows_history() {
    let engine = engine(vec![20; 10]);
    let mut state = GameState::new(100);

    let mut played = 0;
    loop {
        let outcome = engine.play_round(&mut state, 10).await.unwrap();
        played += 1;
        if outcome.is_ended() {
            break;
        }
        assert_eq!(state.current_round(), played + 1);
        assert_eq!(state.history().len() as u32, played);
    }

    // AI: 100 -> 80 -> 60 -> 35 -> 10. Round 5's fee of 10 leaves it nothing
    // to bid, the player takes the round and the AI is out.
    assert_eq!(played, 5);
    assert_eq!(state.participant(Side::Ai).money, 0);
    assert_eq!(state.participant(Side::Ai).score, 4);
    assert_eq!(state.history()[4].bids.ai, 0);
    assert_eq!(state.history()[4].winner, Some(Side::Player));
}

/// A failing oracle leaves the round retryable.
#[tokio::test]
async fn test_exhausted_oracle_is_retryable() {
    let engine = engine(vec![5]);
    let mut state = GameState::new(100);

    engine.play_round(&mut state, 10).await.unwrap();
    let snapshot = state.clone();

    assert!(engine.play_round(&mut state, 10).await.is_err());
    assert_eq!(state, snapshot);
    assert_eq!(state.current_round(), 2);
}
