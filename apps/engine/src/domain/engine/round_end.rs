//! End-of-turn decisions: go/stop, instant endings, nagari, chongtong and
//! the Stop settlement.

use tracing::{debug, info};

use super::{no_pending, GameManager};
use crate::domain::cards_types::{Card, Month};
use crate::domain::penalty::{calculate_penalties, detect_baks};
use crate::domain::player::{opponent_of, Seat};
use crate::domain::rules::BakResolution;
use crate::domain::scoring::{pi_count, total_score};
use crate::domain::state::{
    ChongtongInfo, ChongtongTiming, EndReason, GameState, RoundOutcome, TurnEvent,
};
use crate::errors::domain::DomainError;

impl GameManager {
    /// Close the turn in flight and decide what happens next.
    pub(super) fn finish_turn(&mut self) -> Result<(), DomainError> {
        if let Some(ctx) = self.turn.take() {
            self.last_events = ctx.events;
        }
        self.state = GameState::Playing;
        self.recompute_scores();
        let seat = self.current;

        if self.check_instant_end(seat)? {
            return Ok(());
        }

        let player = &self.players[seat];
        if player.score >= self.rules.go_stop.min_score && player.score > player.last_go_score {
            if player.hand.is_empty() {
                info!(seat, score = player.score, "go threshold with empty hand, stopping");
                return self.execute_stop(seat, EndReason::Stop);
            }
            debug!(seat, score = player.score, "asking go/stop");
            self.state = GameState::AskingGoStop;
            return Ok(());
        }

        self.advance_turn()
    }

    pub(super) fn respond_go_stop_inner(&mut self, is_go: bool) -> Result<(), DomainError> {
        if self.state != GameState::AskingGoStop {
            return Err(no_pending("go/stop", &self.state));
        }
        let seat = self.current;
        if !is_go {
            info!(seat, "stop");
            return self.execute_stop(seat, EndReason::Stop);
        }

        let opp = opponent_of(seat);
        let player = &mut self.players[seat];
        player.go_count += 1;
        player.last_go_score = player.score;
        let go_count = player.go_count;
        self.last_events = vec![TurnEvent::Go { count: go_count }];

        let opponent_pi = pi_count(&self.players[opp].captured, &self.rules);
        if opponent_pi <= self.rules.special_moves.mungdda.pi_starved_threshold {
            self.players[opp].is_pi_mungbak = true;
        }
        info!(seat, go_count, "go");

        let max_go = self.rules.endgame.max_go_count;
        if max_go > 0 && go_count >= max_go {
            return self.execute_stop(seat, EndReason::MaxGo);
        }
        self.state = GameState::Playing;
        if self.check_instant_end(seat)? {
            return Ok(());
        }
        self.advance_turn()
    }

    /// Max round score and instant-end baks. Returns `true` if the round ended.
    fn check_instant_end(&mut self, seat: Seat) -> Result<bool, DomainError> {
        let opp = opponent_of(seat);
        let (winner, loser) = (&self.players[seat], &self.players[opp]);
        let provisional = calculate_penalties(winner, loser, &self.rules);

        let max_score = self.rules.endgame.max_round_score;
        if max_score > 0 && provisional.final_score >= max_score {
            info!(seat, final_score = provisional.final_score, "max round score reached");
            self.execute_stop(seat, EndReason::MaxScore)?;
            return Ok(true);
        }

        if winner.score >= self.rules.go_stop.min_score {
            let flags = detect_baks(winner, loser, &self.rules);
            let instant = self.rules.endgame.instant_end_on_bak;
            let hit = (instant.gwangbak && flags.gwangbak)
                || (instant.pibak && flags.pibak)
                || (instant.gobak && flags.gobak)
                || (instant.mungbak && flags.mungbak);
            if hit {
                info!(seat, ?flags, "instant-end bak");
                self.execute_stop(seat, EndReason::InstantBak)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn advance_turn(&mut self) -> Result<(), DomainError> {
        let next = opponent_of(self.current);
        if self.deck.is_empty() || self.players[next].hand.is_empty() {
            info!(deck = self.deck.len(), "no cards left to play, nagari");
            self.end_nagari();
            return Ok(());
        }
        self.current = next;
        debug!(seat = next, "turn passes");
        self.check_chongtong(ChongtongTiming::Midgame)?;
        Ok(())
    }

    /// Chongtong check for the seats relevant to `timing`. Returns `true`
    /// if the round ended.
    pub(super) fn check_chongtong(&mut self, timing: ChongtongTiming) -> Result<bool, DomainError> {
        if !self.rules.special_moves.chongtong.enabled {
            return Ok(false);
        }
        let seats = match timing {
            ChongtongTiming::Initial => vec![self.leader, opponent_of(self.leader)],
            ChongtongTiming::Midgame => vec![self.current],
        };
        for seat in seats {
            if let Some(month) = self.players[seat].chongtong_month() {
                self.end_chongtong(seat, month, timing);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn end_chongtong(&mut self, seat: Seat, month: Month, timing: ChongtongTiming) {
        let rule = &self.rules.special_moves.chongtong;
        let payout = match timing {
            ChongtongTiming::Initial => rule.initial_payout,
            ChongtongTiming::Midgame => rule.midgame_payout,
        };
        let final_score = u64::from(payout);
        let transfer = self.settle_money(seat, final_score);
        info!(seat, month, ?timing, final_score, "chongtong");
        self.finish_round(RoundOutcome {
            reason: EndReason::Chongtong,
            winner: Some(seat),
            final_score,
            money_transfer: transfer,
            penalty: None,
            chongtong: Some(ChongtongInfo { month, timing }),
        });
    }

    pub(super) fn end_nagari(&mut self) {
        info!(round = self.round_no, "nagari");
        self.finish_round(RoundOutcome::nagari());
    }

    /// Stop settlement: pi transfers, rescoring, penalties, money.
    pub(super) fn execute_stop(&mut self, winner: Seat, reason: EndReason) -> Result<(), DomainError> {
        let loser = opponent_of(winner);
        self.resolve_bak_pi_transfers(winner, loser);
        self.recompute_scores();

        let penalty = calculate_penalties(&self.players[winner], &self.players[loser], &self.rules);
        let final_score = penalty.final_score;
        let transfer = self.settle_money(winner, final_score);
        info!(
            winner,
            ?reason,
            final_score,
            formula = %penalty.score_formula,
            "round won"
        );
        self.finish_round(RoundOutcome {
            reason,
            winner: Some(winner),
            final_score,
            money_transfer: transfer,
            penalty: Some(penalty),
            chongtong: None,
        });
        Ok(())
    }

    /// Baks configured as `pi_transfer` are settled here instead of by a
    /// multiplier. Jabak cancels them like it cancels the multipliers.
    fn resolve_bak_pi_transfers(&mut self, winner: Seat, loser: Seat) {
        let flags = detect_baks(&self.players[winner], &self.players[loser], &self.rules);
        let p = &self.rules.penalties;
        if p.jabak.enabled && total_score(&self.players[loser].captured, &self.rules) >= p.jabak.min_score {
            return;
        }
        let transfers: Vec<(&'static str, u32)> = [
            ("gwangbak", flags.gwangbak, p.gwangbak.clone()),
            ("pibak", flags.pibak, p.pibak.as_rule()),
            ("gobak", flags.gobak, p.gobak.clone()),
            ("mungbak", flags.mungbak, p.mungbak.clone()),
        ]
        .into_iter()
        .filter(|(_, hit, rule)| *hit && rule.resolution_type == BakResolution::PiTransfer)
        .map(|(name, _, rule)| (name, rule.transfer_pi))
        .collect();

        for (name, count) in transfers {
            let moved = self.transfer_pi(loser, winner, count);
            debug!(bak = name, moved, "bak settled by pi transfer");
            self.last_events.push(TurnEvent::PiTransferred {
                from: loser,
                to: winner,
                count: moved,
            });
        }
    }

    fn settle_money(&mut self, winner: Seat, final_score: u64) -> i64 {
        let points = i64::try_from(final_score).unwrap_or(i64::MAX);
        let transfer = points.saturating_mul(self.rules.money.point_value);
        let loser = opponent_of(winner);
        self.players[loser].money = self.players[loser].money.saturating_sub(transfer);
        self.players[winner].money = self.players[winner].money.saturating_add(transfer);
        transfer
    }

    /// Enter `ended`. With both hands spent, leftover table and deck cards
    /// move out of play.
    fn finish_round(&mut self, outcome: RoundOutcome) {
        if let Some(ctx) = self.turn.take() {
            self.last_events = ctx.events;
        }
        self.state = GameState::Ended;
        let hands_spent = self
            .players
            .iter()
            .all(|p| p.hand.iter().all(Card::is_dummy));
        if hands_spent {
            self.out_of_play.extend(self.table.take_all());
            self.out_of_play.extend(self.deck.take_all());
            for p in &mut self.players {
                p.hand.clear();
                p.dummy_card_count = 0;
            }
        }
        if let Some(winner) = outcome.winner {
            self.leader = winner;
        }
        self.outcome = Some(outcome);
    }
}
