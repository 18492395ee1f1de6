//! Rules document that parameterizes scoring, special moves and penalties.
//!
//! Every struct is `#[serde(default)]`, so a rules file only needs to spell
//! out the values it changes. `Default` is the standard rule set;
//! [`RuleConfig::minimal`] is the fallback used when no rules file loads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{FlexRole, Month};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuleConfig {
    pub scoring: ScoringRules,
    pub go_stop: GoStopRules,
    pub special_moves: SpecialMoveRules,
    pub penalties: PenaltyRules,
    pub endgame: EndgameRules,
    pub chrysanthemum: ChrysanthemumRules,
    pub nagari: NagariRules,
    pub money: MoneyRules,
}

impl RuleConfig {
    /// Hardcoded fallback: plain category scoring, win at 7, nothing else.
    pub fn minimal() -> Self {
        let mut rules = Self::default();
        rules.go_stop.min_score = 7;
        rules.special_moves = SpecialMoveRules::disabled();
        rules.penalties = PenaltyRules::disabled();
        rules.endgame.instant_end_on_bak = InstantEndRules::default();
        rules.nagari.table_four_of_a_kind = false;
        rules
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringRules {
    pub brights: BrightRules,
    pub animals: AnimalRules,
    pub ribbons: RibbonRules,
    pub junk: JunkRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightRules {
    pub three: u32,
    /// Three brights that include the rain bright.
    pub three_with_rain: u32,
    pub four: u32,
    pub five: u32,
    pub rain_month: Month,
}

impl Default for BrightRules {
    fn default() -> Self {
        Self {
            three: 3,
            three_with_rain: 2,
            four: 4,
            five: 15,
            rain_month: 12,
        }
    }
}

/// `count >= min_count` scores `min_score + (count - min_count) * per_extra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountRule {
    pub min_count: u32,
    pub min_score: u32,
    pub per_extra: u32,
}

impl CountRule {
    pub fn points(&self, count: u32) -> u32 {
        if count < self.min_count {
            0
        } else {
            self.min_score + (count - self.min_count) * self.per_extra
        }
    }
}

impl Default for CountRule {
    fn default() -> Self {
        Self {
            min_count: 5,
            min_score: 1,
            per_extra: 1,
        }
    }
}

/// Fixed bonus for holding a card of every listed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetBonus {
    pub enabled: bool,
    pub months: Vec<Month>,
    pub points: u32,
}

impl SetBonus {
    fn new(months: &[Month], points: u32) -> Self {
        Self {
            enabled: true,
            months: months.to_vec(),
            points,
        }
    }
}

impl Default for SetBonus {
    fn default() -> Self {
        Self {
            enabled: false,
            months: Vec::new(),
            points: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalRules {
    pub count: CountRule,
    pub godori: SetBonus,
}

impl Default for AnimalRules {
    fn default() -> Self {
        Self {
            count: CountRule::default(),
            godori: SetBonus::new(&[2, 4, 8], 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RibbonSet {
    Red,
    Blue,
    Grass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonRules {
    pub count: CountRule,
    pub red: SetBonus,
    pub blue: SetBonus,
    pub grass: SetBonus,
}

impl RibbonRules {
    pub fn set(&self, set: RibbonSet) -> &SetBonus {
        match set {
            RibbonSet::Red => &self.red,
            RibbonSet::Blue => &self.blue,
            RibbonSet::Grass => &self.grass,
        }
    }
}

impl Default for RibbonRules {
    fn default() -> Self {
        Self {
            count: CountRule::default(),
            red: SetBonus::new(&[1, 2, 3], 3),
            blue: SetBonus::new(&[6, 9, 10], 3),
            grass: SetBonus::new(&[4, 5, 7], 3),
        }
    }
}

/// Plain junk of `month` counts one extra pi while the `requires` ribbon set
/// is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalPi {
    pub month: Month,
    pub requires: RibbonSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JunkRules {
    pub count: CountRule,
    pub conditional_double: Vec<ConditionalPi>,
}

impl Default for JunkRules {
    fn default() -> Self {
        Self {
            count: CountRule {
                min_count: 10,
                min_score: 1,
                per_extra: 1,
            },
            conditional_double: vec![ConditionalPi {
                month: 9,
                requires: RibbonSet::Blue,
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Go / Stop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoBonus {
    pub add: u32,
    pub multiply: u64,
}

impl Default for GoBonus {
    fn default() -> Self {
        Self { add: 0, multiply: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoStopRules {
    pub min_score: u32,
    /// Keyed by go count. Counts past the largest key keep its `add` and
    /// double its `multiply` once per extra go.
    pub go_bonuses: BTreeMap<u32, GoBonus>,
}

impl GoStopRules {
    pub fn bonus_for(&self, go_count: u32) -> GoBonus {
        let Some((&key, bonus)) = self.go_bonuses.range(..=go_count).next_back() else {
            return GoBonus::default();
        };
        let max_key = self.go_bonuses.keys().next_back().copied().unwrap_or(key);
        if go_count <= max_key {
            return *bonus;
        }
        let extra = go_count - max_key;
        GoBonus {
            add: bonus.add,
            multiply: bonus.multiply.saturating_mul(1u64 << extra.min(32)),
        }
    }
}

impl Default for GoStopRules {
    fn default() -> Self {
        let go_bonuses = [(1, 1, 1), (2, 2, 1), (3, 3, 2), (4, 4, 4)]
            .into_iter()
            .map(|(k, add, multiply)| (k, GoBonus { add, multiply }))
            .collect();
        Self {
            min_score: 7,
            go_bonuses,
        }
    }
}

// ---------------------------------------------------------------------------
// Special moves
// ---------------------------------------------------------------------------

/// Toggle plus payout for a simple special move.
///
/// `payout` is the number of pi stolen from the opponent, except for shake
/// where it is the per-occurrence score factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveRule {
    pub enabled: bool,
    pub payout: u32,
    pub description: String,
}

impl MoveRule {
    fn on(payout: u32, description: &str) -> Self {
        Self {
            enabled: true,
            payout,
            description: description.to_string(),
        }
    }

    fn off(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

impl Default for MoveRule {
    fn default() -> Self {
        Self {
            enabled: false,
            payout: 1,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombRule {
    pub enabled: bool,
    /// Pi stolen from the opponent.
    pub payout: u32,
    pub dummy_card_count: u32,
    pub description: String,
}

impl Default for BombRule {
    fn default() -> Self {
        Self {
            enabled: true,
            payout: 1,
            dummy_card_count: 2,
            description: "Three hand cards of a month onto its single table card".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChongtongRule {
    pub enabled: bool,
    pub initial_payout: u32,
    pub midgame_payout: u32,
    pub description: String,
}

impl Default for ChongtongRule {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_payout: 10,
            midgame_payout: 10,
            description: "All four cards of a month in hand".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MungddaRule {
    pub enabled: bool,
    /// Opponent pi count at or below this marks them pi-starved on a Go.
    pub pi_starved_threshold: u32,
    pub extra_pi: u32,
    /// Added to the score factor once per mungdda or bomb-mungdda.
    pub multiplier_add: u64,
    pub description: String,
}

impl Default for MungddaRule {
    fn default() -> Self {
        Self {
            enabled: false,
            pi_starved_threshold: 5,
            extra_pi: 1,
            multiplier_add: 1,
            description: "Ttadak or bomb against a pi-starved opponent".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpeokRule {
    pub enabled: bool,
    /// Pi the stacking player pays the opponent.
    pub creation_penalty_pi: u32,
    pub eat_steal_pi: u32,
    pub self_eat_steal_pi: u32,
    /// Stack that was already on the table at the deal.
    pub initial_eat_steal_pi: u32,
    pub description: String,
}

impl Default for PpeokRule {
    fn default() -> Self {
        Self {
            enabled: true,
            creation_penalty_pi: 1,
            eat_steal_pi: 1,
            self_eat_steal_pi: 2,
            initial_eat_steal_pi: 1,
            description: "Played pair matched again by the draw stays stacked".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialMoveRules {
    pub shake: MoveRule,
    pub bomb: BombRule,
    pub ttadak: MoveRule,
    pub jjok: MoveRule,
    pub seolsa: MoveRule,
    pub sweep: MoveRule,
    pub ppeok: PpeokRule,
    pub chongtong: ChongtongRule,
    pub mungdda: MungddaRule,
}

impl SpecialMoveRules {
    pub fn disabled() -> Self {
        let on = Self::default();
        Self {
            shake: on.shake.off(),
            bomb: BombRule {
                enabled: false,
                ..on.bomb
            },
            ttadak: on.ttadak.off(),
            jjok: on.jjok.off(),
            seolsa: on.seolsa.off(),
            sweep: on.sweep.off(),
            ppeok: PpeokRule {
                enabled: false,
                ..on.ppeok
            },
            chongtong: ChongtongRule {
                enabled: false,
                ..on.chongtong
            },
            mungdda: MungddaRule {
                enabled: false,
                ..on.mungdda
            },
        }
    }
}

impl Default for SpecialMoveRules {
    fn default() -> Self {
        Self {
            shake: MoveRule::on(2, "Reveal three cards of a month before playing one"),
            bomb: BombRule::default(),
            ttadak: MoveRule::on(1, "Play and draw both capture"),
            jjok: MoveRule::on(1, "Draw captures the card just played"),
            seolsa: MoveRule::on(1, "Capture the card the opponent left unmatched"),
            sweep: MoveRule::on(1, "Clear the table"),
            ppeok: PpeokRule::default(),
            chongtong: ChongtongRule::default(),
            mungdda: MungddaRule::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BakResolution {
    /// Multiply the final score.
    #[default]
    Multiplier,
    /// Settle by moving pi from loser to winner at Stop.
    PiTransfer,
}

/// A record that is present in a rules file is read against this type's
/// defaults, so give `threshold` explicitly when overriding a bak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyRule {
    pub enabled: bool,
    /// Meaning depends on the bak: loser's max brights for gwangbak, loser's
    /// safe pi count for pibak, winner's animal count for mungbak.
    pub threshold: u32,
    pub multiplier: u64,
    pub resolution_type: BakResolution,
    /// Pi moved when `resolution_type` is `pi_transfer`.
    pub transfer_pi: u32,
}

impl PenaltyRule {
    fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn multiplies(&self) -> bool {
        self.resolution_type == BakResolution::Multiplier
    }
}

impl Default for PenaltyRule {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0,
            multiplier: 2,
            resolution_type: BakResolution::Multiplier,
            transfer_pi: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PibakRule {
    pub enabled: bool,
    /// Loser pi count below this is pibak.
    pub threshold: u32,
    pub multiplier: u64,
    pub resolution_type: BakResolution,
    pub transfer_pi: u32,
    /// A loser with no pi at all is not pibak.
    pub exempt_zero_pi: bool,
}

impl PibakRule {
    pub fn as_rule(&self) -> PenaltyRule {
        PenaltyRule {
            enabled: self.enabled,
            threshold: self.threshold,
            multiplier: self.multiplier,
            resolution_type: self.resolution_type,
            transfer_pi: self.transfer_pi,
        }
    }
}

impl Default for PibakRule {
    fn default() -> Self {
        let base = PenaltyRule::with_threshold(6);
        Self {
            enabled: base.enabled,
            threshold: base.threshold,
            multiplier: base.multiplier,
            resolution_type: base.resolution_type,
            transfer_pi: base.transfer_pi,
            exempt_zero_pi: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JabakRule {
    pub enabled: bool,
    pub min_score: u32,
}

impl Default for JabakRule {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyRules {
    pub gwangbak: PenaltyRule,
    pub pibak: PibakRule,
    pub gobak: PenaltyRule,
    pub mungbak: PenaltyRule,
    pub jabak: JabakRule,
    pub yeokbak_enabled: bool,
    /// Category baks apply even when the winner never called Go.
    pub apply_without_go: bool,
    /// Every bak additionally requires the loser to have called Go.
    pub only_if_opponent_go: bool,
}

impl PenaltyRules {
    pub fn disabled() -> Self {
        let mut rules = Self::default();
        rules.gwangbak.enabled = false;
        rules.pibak.enabled = false;
        rules.gobak.enabled = false;
        rules.mungbak.enabled = false;
        rules.jabak.enabled = false;
        rules.yeokbak_enabled = false;
        rules
    }
}

impl Default for PenaltyRules {
    fn default() -> Self {
        Self {
            gwangbak: PenaltyRule::with_threshold(0),
            pibak: PibakRule::default(),
            gobak: PenaltyRule::default(),
            mungbak: PenaltyRule::with_threshold(7),
            jabak: JabakRule::default(),
            yeokbak_enabled: true,
            apply_without_go: true,
            only_if_opponent_go: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Endgame, chrysanthemum, nagari, money
// ---------------------------------------------------------------------------

/// Which baks end the round the moment they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstantEndRules {
    pub gwangbak: bool,
    pub pibak: bool,
    pub gobak: bool,
    pub mungbak: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndgameRules {
    /// Provisional final score that ends the round at once; 0 disables.
    pub max_round_score: u64,
    /// Go count that ends the round at once; 0 disables.
    pub max_go_count: u32,
    pub instant_end_on_bak: InstantEndRules,
}

impl Default for EndgameRules {
    fn default() -> Self {
        Self {
            max_round_score: 50,
            max_go_count: 5,
            instant_end_on_bak: InstantEndRules::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleChoiceTiming {
    /// Ask the capturing player.
    #[default]
    OnCapture,
    /// Always use the default role.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChrysanthemumRules {
    pub default_role: FlexRole,
    pub choice_timing: RoleChoiceTiming,
}

impl Default for ChrysanthemumRules {
    fn default() -> Self {
        Self {
            default_role: FlexRole::Animal,
            choice_timing: RoleChoiceTiming::OnCapture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NagariRules {
    /// Four cards of one month dealt to the table void the round.
    pub table_four_of_a_kind: bool,
}

impl Default for NagariRules {
    fn default() -> Self {
        Self {
            table_four_of_a_kind: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoneyRules {
    pub point_value: i64,
    pub starting_money: i64,
}

impl Default for MoneyRules {
    fn default() -> Self {
        Self {
            point_value: 100,
            starting_money: 100_000,
        }
    }
}
