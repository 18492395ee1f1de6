//! Score computation from a captured pile.
//!
//! Categories are evaluated independently and summed. The chrysanthemum
//! animal is classified through its selected role (or the configured
//! default) before any category is counted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{Card, Category, Month};
use crate::domain::rules::{RibbonSet, RuleConfig, SetBonus};

/// One line of a score breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreItem {
    pub name: String,
    pub count: u32,
    pub points: u32,
}

impl ScoreItem {
    fn new(name: &str, count: u32, points: u32) -> Self {
        Self {
            name: name.to_string(),
            count,
            points,
        }
    }
}

/// Captured cards of one effective category.
pub fn cards_of<'a>(captured: &'a [Card], category: Category, rules: &RuleConfig) -> Vec<&'a Card> {
    let role = rules.chrysanthemum.default_role;
    captured
        .iter()
        .filter(|c| c.effective_category(role) == category)
        .collect()
}

pub fn bright_count(captured: &[Card], rules: &RuleConfig) -> u32 {
    cards_of(captured, Category::Bright, rules).len() as u32
}

pub fn animal_count(captured: &[Card], rules: &RuleConfig) -> u32 {
    cards_of(captured, Category::Animal, rules).len() as u32
}

fn months_of(cards: &[&Card]) -> BTreeSet<Month> {
    cards.iter().filter_map(|c| c.month).collect()
}

fn set_held(bonus: &SetBonus, months: &BTreeSet<Month>) -> bool {
    bonus.enabled && !bonus.months.is_empty() && bonus.months.iter().all(|m| months.contains(m))
}

fn ribbon_set_held(captured: &[Card], set: RibbonSet, rules: &RuleConfig) -> bool {
    let ribbons = cards_of(captured, Category::Ribbon, rules);
    set_held(rules.scoring.ribbons.set(set), &months_of(&ribbons))
}

/// Pi units: junk 1, double junk 2, plus conditional bonuses.
pub fn pi_count(captured: &[Card], rules: &RuleConfig) -> u32 {
    let role = rules.chrysanthemum.default_role;
    let conditional: Vec<Month> = rules
        .scoring
        .junk
        .conditional_double
        .iter()
        .filter(|cond| ribbon_set_held(captured, cond.requires, rules))
        .map(|cond| cond.month)
        .collect();

    captured
        .iter()
        .map(|c| match c.effective_category(role) {
            Category::DoubleJunk => 2,
            Category::Junk if c.month.is_some_and(|m| conditional.contains(&m)) => 2,
            Category::Junk => 1,
            _ => 0,
        })
        .sum()
}

/// Itemized breakdown; items worth zero points are left out.
pub fn score_detail(captured: &[Card], rules: &RuleConfig) -> Vec<ScoreItem> {
    let scoring = &rules.scoring;
    let mut items = Vec::new();

    // Brights
    let brights = cards_of(captured, Category::Bright, rules);
    let has_rain = brights.iter().any(|c| c.is_month(scoring.brights.rain_month));
    let bright_item = match brights.len() {
        3 if has_rain => Some(("3 Brights", scoring.brights.three_with_rain)),
        3 => Some(("3 Brights", scoring.brights.three)),
        4 => Some(("4 Brights", scoring.brights.four)),
        n if n >= 5 => Some(("5 Brights", scoring.brights.five)),
        _ => None,
    };
    if let Some((name, points)) = bright_item {
        items.push(ScoreItem::new(name, brights.len() as u32, points));
    }

    // Animals
    let animals = cards_of(captured, Category::Animal, rules);
    items.push(ScoreItem::new(
        "Animals",
        animals.len() as u32,
        scoring.animals.count.points(animals.len() as u32),
    ));
    let godori = &scoring.animals.godori;
    if set_held(godori, &months_of(&animals)) {
        items.push(ScoreItem::new("Godori", godori.months.len() as u32, godori.points));
    }

    // Ribbons
    let ribbons = cards_of(captured, Category::Ribbon, rules);
    items.push(ScoreItem::new(
        "Ribbons",
        ribbons.len() as u32,
        scoring.ribbons.count.points(ribbons.len() as u32),
    ));
    let ribbon_months = months_of(&ribbons);
    for (set, name) in [
        (RibbonSet::Red, "Red Ribbons"),
        (RibbonSet::Blue, "Blue Ribbons"),
        (RibbonSet::Grass, "Grass Ribbons"),
    ] {
        let bonus = scoring.ribbons.set(set);
        if set_held(bonus, &ribbon_months) {
            items.push(ScoreItem::new(name, bonus.months.len() as u32, bonus.points));
        }
    }

    // Junk
    let pi = pi_count(captured, rules);
    items.push(ScoreItem::new("Junk", pi, scoring.junk.count.points(pi)));

    items.retain(|item| item.points > 0);
    items
}

pub fn total_score(captured: &[Card], rules: &RuleConfig) -> u32 {
    score_detail(captured, rules).iter().map(|i| i.points).sum()
}
