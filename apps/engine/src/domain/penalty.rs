//! Round-end multipliers.
//!
//! `calculate_penalties` is pure: it reads the two players' captured piles,
//! go counts and shake counts and returns the composed final score.

use serde::{Deserialize, Serialize};

use crate::domain::player::Player;
use crate::domain::rules::{PenaltyRule, RuleConfig};
use crate::domain::scoring::{animal_count, bright_count, pi_count, total_score};

/// Which baks hold between a winner and a loser, before any cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakFlags {
    pub gwangbak: bool,
    pub pibak: bool,
    pub gobak: bool,
    pub mungbak: bool,
}

impl BakFlags {
    pub fn any(&self) -> bool {
        self.gwangbak || self.pibak || self.gobak || self.mungbak
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyResult {
    pub base_score: u32,
    pub go_count: u32,
    pub go_addition: u32,
    pub go_multiplier: u64,
    /// Product of the applied bak factors.
    pub penalty_multiplier: u64,
    pub shake_multiplier: u64,
    pub mungdda_multiplier: u64,
    /// Everything except the go addition, multiplied together.
    pub multiplier: u64,
    pub final_score: u64,
    pub is_gwangbak: bool,
    pub is_pibak: bool,
    pub is_gobak: bool,
    pub is_mungbak: bool,
    /// Loser had enough points to cancel every bak factor.
    pub is_jabak: bool,
    /// Winner would itself be bak against the loser. Informational only.
    pub is_yeokbak: bool,
    pub score_formula: String,
}

/// Whether the go gating lets category baks apply at all.
pub fn category_baks_allowed(winner: &Player, loser: &Player, rules: &RuleConfig) -> bool {
    let p = &rules.penalties;
    (p.apply_without_go || winner.go_count > 0) && (!p.only_if_opponent_go || loser.go_count > 0)
}

/// Bak conditions, with gating applied but before jabak cancellation.
pub fn detect_baks(winner: &Player, loser: &Player, rules: &RuleConfig) -> BakFlags {
    let p = &rules.penalties;
    let allowed = category_baks_allowed(winner, loser, rules);

    let winner_brights = bright_count(&winner.captured, rules);
    let loser_brights = bright_count(&loser.captured, rules);
    let winner_pi = pi_count(&winner.captured, rules);
    let loser_pi = pi_count(&loser.captured, rules);

    let gwangbak =
        allowed && p.gwangbak.enabled && winner_brights >= 3 && loser_brights <= p.gwangbak.threshold;

    let pibak = allowed
        && p.pibak.enabled
        && winner_pi >= rules.scoring.junk.count.min_count
        && loser_pi < p.pibak.threshold
        && !(p.pibak.exempt_zero_pi && loser_pi == 0);

    // Gobak is defined by go calls, so the go gating does not apply to it.
    let gobak = p.gobak.enabled && loser.go_count >= 1 && winner.go_count == 0;

    let mungbak = allowed
        && p.mungbak.enabled
        && animal_count(&winner.captured, rules) >= p.mungbak.threshold;

    BakFlags {
        gwangbak,
        pibak,
        gobak,
        mungbak,
    }
}

/// Yeokbak: the winner sits in a bak position relative to the loser.
fn detect_yeokbak(winner: &Player, loser: &Player, rules: &RuleConfig) -> bool {
    let p = &rules.penalties;
    if !p.yeokbak_enabled {
        return false;
    }
    let reverse_gwang = p.gwangbak.enabled
        && bright_count(&loser.captured, rules) >= 3
        && bright_count(&winner.captured, rules) <= p.gwangbak.threshold;
    let winner_pi = pi_count(&winner.captured, rules);
    let reverse_pi = p.pibak.enabled
        && pi_count(&loser.captured, rules) >= rules.scoring.junk.count.min_count
        && winner_pi < p.pibak.threshold
        && !(p.pibak.exempt_zero_pi && winner_pi == 0);
    reverse_gwang || reverse_pi
}

pub fn calculate_penalties(winner: &Player, loser: &Player, rules: &RuleConfig) -> PenaltyResult {
    let base = total_score(&winner.captured, rules);
    let go = rules.go_stop.bonus_for(winner.go_count);
    let flags = detect_baks(winner, loser, rules);
    let is_jabak = rules.penalties.jabak.enabled
        && flags.any()
        && total_score(&loser.captured, rules) >= rules.penalties.jabak.min_score;

    let mut formula = format!("({})", base + go.add);
    if go.add > 0 {
        formula = format!("({base} + Go {})", go.add);
    }

    let mut penalty_multiplier: u64 = 1;
    let p = &rules.penalties;
    let pibak_rule = p.pibak.as_rule();
    let applied: [(bool, &PenaltyRule, &str); 4] = [
        (flags.gwangbak, &p.gwangbak, "Gwangbak"),
        (flags.pibak, &pibak_rule, "Pibak"),
        (flags.gobak, &p.gobak, "Gobak"),
        (flags.mungbak, &p.mungbak, "Mungbak"),
    ];
    if is_jabak {
        formula.push_str(" x Jabak(x1)");
    } else {
        for (hit, rule, name) in applied {
            if hit && rule.multiplies() {
                penalty_multiplier = penalty_multiplier.saturating_mul(rule.multiplier);
                formula.push_str(&format!(" x {name}(x{})", rule.multiplier));
            }
        }
    }

    let shake_base = u64::from(rules.special_moves.shake.payout.max(1));
    let shake_multiplier = shake_base.saturating_pow(winner.shake_count);
    if winner.shake_count > 0 {
        formula.push_str(&format!(" x Shake/Bomb(x{shake_multiplier})"));
    }

    let mungdda = &rules.special_moves.mungdda;
    let mungdda_events = u64::from(winner.mungdda_count + winner.bomb_mungdda_count);
    let mungdda_multiplier = if mungdda.enabled && mungdda_events > 0 {
        let m = 1 + mungdda.multiplier_add.saturating_mul(mungdda_events);
        formula.push_str(&format!(" x Mungdda(x{m})"));
        m
    } else {
        1
    };

    if go.multiply > 1 {
        formula.push_str(&format!(" x {}Go(x{})", winner.go_count, go.multiply));
    }

    let multiplier = penalty_multiplier
        .saturating_mul(shake_multiplier)
        .saturating_mul(mungdda_multiplier)
        .saturating_mul(go.multiply);
    let final_score = u64::from(base + go.add).saturating_mul(multiplier);

    PenaltyResult {
        base_score: base,
        go_count: winner.go_count,
        go_addition: go.add,
        go_multiplier: go.multiply,
        penalty_multiplier,
        shake_multiplier,
        mungdda_multiplier,
        multiplier,
        final_score,
        is_gwangbak: flags.gwangbak,
        is_pibak: flags.pibak,
        is_gobak: flags.gobak,
        is_mungbak: flags.mungbak,
        is_jabak,
        is_yeokbak: detect_yeokbak(winner, loser, rules),
        score_formula: format!("{formula} = {final_score}"),
    }
}
