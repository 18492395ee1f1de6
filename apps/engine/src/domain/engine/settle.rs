//! Post-capture special moves and pi transfers.

use tracing::debug;

use super::{GameManager, PlayKind, StackOrigin};
use crate::domain::cards_types::Category;
use crate::domain::player::{opponent_of, Seat};
use crate::domain::rules::RoleChoiceTiming;
use crate::domain::state::{GameState, TurnEvent};
use crate::errors::domain::DomainError;

impl GameManager {
    /// Move up to `count` pi from `from`'s pile to `to`'s. Plain junk goes
    /// first. A chrysanthemum counted as double pi is eligible. Returns how
    /// many cards moved.
    pub(super) fn transfer_pi(&mut self, from: Seat, to: Seat, count: u32) -> u32 {
        let role = self.rules.chrysanthemum.default_role;
        let mut moved = 0;
        for _ in 0..count {
            let pile = &self.players[from].captured;
            let pick = pile
                .iter()
                .find(|c| c.effective_category(role) == Category::Junk)
                .or_else(|| {
                    pile.iter()
                        .find(|c| c.effective_category(role) == Category::DoubleJunk)
                })
                .map(|c| c.id);
            let Some(card) = pick.and_then(|id| self.players[from].take_captured(id)) else {
                break;
            };
            self.players[to].captured.push(card);
            moved += 1;
        }
        moved
    }

    pub(super) fn steal_pi(&mut self, from: Seat, to: Seat, count: u32, events: &mut Vec<TurnEvent>) {
        let moved = self.transfer_pi(from, to, count);
        if moved > 0 {
            events.push(TurnEvent::PiTransferred { from, to, count: moved });
        }
    }

    /// Special moves that depend on the whole turn, then the chrysanthemum
    /// role prompt.
    pub(super) fn settle_turn(&mut self) -> Result<(), DomainError> {
        let ctx = self.turn_ctx()?.clone();
        let seat = ctx.seat;
        let opp = opponent_of(seat);
        let moves = self.rules.special_moves.clone();
        let mut events = Vec::new();

        let drawn_left_alone = ctx.draw.left_on_table
            && self.table.len() == 1
            && ctx.drawn.is_some_and(|id| self.table.contains(id));
        let table_cleared = self.table.is_empty() || drawn_left_alone;
        let opponent_starved = moves.mungdda.enabled && self.players[opp].is_pi_mungbak;

        match ctx.kind {
            PlayKind::Bomb => {
                if moves.bomb.enabled {
                    self.steal_pi(opp, seat, moves.bomb.payout, &mut events);
                }
                if opponent_starved {
                    self.players[seat].bomb_mungdda_count += 1;
                    events.push(TurnEvent::BombMungdda);
                    self.steal_pi(opp, seat, moves.mungdda.extra_pi, &mut events);
                }
            }
            PlayKind::Normal => {
                if moves.ttadak.enabled && !ctx.play.captured.is_empty() && !ctx.draw.captured.is_empty() {
                    self.players[seat].ttadak_count += 1;
                    events.push(TurnEvent::Ttadak);
                    self.steal_pi(opp, seat, moves.ttadak.payout, &mut events);
                    if opponent_starved {
                        self.players[seat].mungdda_count += 1;
                        events.push(TurnEvent::Mungdda);
                        self.steal_pi(opp, seat, moves.mungdda.extra_pi, &mut events);
                    }
                }
                if moves.jjok.enabled && ctx.play.left_on_table && ctx.draw.captured.contains(&ctx.card) {
                    self.players[seat].jjok_count += 1;
                    events.push(TurnEvent::Jjok);
                    self.steal_pi(opp, seat, moves.jjok.payout, &mut events);
                }
                let seolsa = moves.seolsa.enabled
                    && ctx.play.matched_before == 1
                    && !ctx.play.captured.is_empty()
                    && ctx.play.owner_before == Some(opp);
                if let (true, Some(month)) = (seolsa, ctx.month) {
                    self.players[seat].seolsa_count += 1;
                    events.push(TurnEvent::Seolsa { month });
                    self.steal_pi(opp, seat, moves.seolsa.payout, &mut events);
                }
            }
            PlayKind::Dummy => {}
        }

        if moves.ppeok.enabled {
            for phase in [&ctx.play, &ctx.draw] {
                let Some(origin) = phase.stack.filter(|_| phase.captured.len() == 4) else {
                    continue;
                };
                let steal = match origin {
                    StackOrigin::Dealt => moves.ppeok.initial_eat_steal_pi,
                    StackOrigin::Created(owner) if owner == seat => moves.ppeok.self_eat_steal_pi,
                    StackOrigin::Created(_) => moves.ppeok.eat_steal_pi,
                };
                if let Some(month) = self.players[seat]
                    .captured
                    .iter()
                    .find(|c| c.id == phase.captured[0])
                    .and_then(|c| c.month)
                {
                    events.push(TurnEvent::PpeokEaten { month });
                }
                self.steal_pi(opp, seat, steal, &mut events);
            }
        }

        if moves.sweep.enabled && !ctx.table_was_empty && table_cleared {
            self.players[seat].sweep_count += 1;
            events.push(TurnEvent::Sweep);
            self.steal_pi(opp, seat, moves.sweep.payout, &mut events);
        }

        if !events.is_empty() {
            debug!(seat, ?events, "special moves");
        }
        self.turn_ctx_mut()?.events.extend(events);
        self.recompute_scores();

        if self.rules.chrysanthemum.choice_timing == RoleChoiceTiming::OnCapture {
            let pending = self.players[seat]
                .captured
                .iter()
                .find(|c| {
                    c.is_chrysanthemum()
                        && c.selected_role.is_none()
                        && ctx.captured_this_turn().any(|id| *id == c.id)
                })
                .map(|c| c.id);
            if let Some(card) = pending {
                debug!(seat, "asking chrysanthemum role");
                self.state = GameState::ChoosingChrysanthemumRole { card };
                return Ok(());
            }
        }

        self.finish_turn()
    }
}
