use serde_json::Value;

use crate::domain::rules::RuleConfig;
use crate::domain::snapshot::snapshot;
use crate::domain::state::GameStateKind;
use crate::domain::test_state_helpers::{animal, junk, play, ribbon, scripted};
use crate::domain::GameManager;

#[test]
fn fresh_deal_snapshot_counts_every_card() {
    let gm = GameManager::with_seed(RuleConfig::default(), 7);
    let snap = snapshot(&gm);

    assert_eq!(snap.game_state, GameStateKind::Ready);
    assert_eq!(snap.round_no, 1);
    assert_eq!(snap.deck_count, snap.deck_cards.len());
    let held: usize = snap.players.iter().map(|p| p.hand.len()).sum();
    assert_eq!(held + snap.table_cards.len() + snap.deck_count, 48);
    assert!(snap.game_end_reason.is_none());
}

#[test]
fn snapshot_does_not_mutate() {
    let gm = GameManager::with_seed(RuleConfig::default(), 11);
    assert_eq!(snapshot(&gm), snapshot(&gm));
}

#[test]
fn pending_capture_options_are_listed() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(5), junk(1)], &[junk(7)]],
        &[ribbon(5), animal(5)],
        &[junk(2), junk(3)],
    );
    play(&mut gm, junk(5));

    let snap = snapshot(&gm);
    assert_eq!(snap.game_state, GameStateKind::ChoosingCapture);
    let mut months: Vec<_> = snap.pending_capture_options.iter().map(|c| c.month).collect();
    months.dedup();
    assert_eq!(months, vec![Some(5)]);
    assert_eq!(snap.pending_capture_options.len(), 2);
}

#[test]
fn wire_names_are_camel_case_and_outcome_is_optional() {
    let gm = GameManager::with_seed(RuleConfig::default(), 3);
    let json = serde_json::to_value(snapshot(&gm)).unwrap();

    assert_eq!(json["gameState"], Value::from("ready"));
    assert!(json.get("currentTurnIndex").is_some());
    assert!(json["players"][0].get("capturedCards").is_some());
    assert!(json["players"][0].get("isPiMungbak").is_some());
    assert!(json.get("gameEndReason").is_none());
    assert!(json.get("penaltyResult").is_none());
}

#[test]
fn ended_round_reports_outcome() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(2)],
    );
    play(&mut gm, junk(1));

    let json = serde_json::to_value(snapshot(&gm)).unwrap();
    assert_eq!(json["gameState"], Value::from("ended"));
    assert_eq!(json["gameEndReason"], Value::from("nagari"));
    assert!(json.get("winnerIndex").is_none());
    assert_eq!(json["finalScore"], Value::from(0));
}
