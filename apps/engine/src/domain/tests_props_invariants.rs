//! Property tests over dealing, scoring and penalty composition.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::domain::cards_types::{CardId, CardIdAllocator};
use crate::domain::dealing::{deal_round, Deal, DECK_SIZE, HAND_SIZE, TABLE_SIZE};
use crate::domain::penalty::calculate_penalties;
use crate::domain::player::Player;
use crate::domain::rules::RuleConfig;
use crate::domain::scoring::{score_detail, total_score};
use crate::domain::test_gens;
use crate::domain::test_prelude::proptest_config;

proptest! {
    #![proptest_config(proptest_config())]

    /// Every deal splits 48 distinct cards into 10/10/8 and the rest.
    #[test]
    fn prop_deal_partitions_the_deck(seed in test_gens::seed()) {
        let deal = deal_round(&mut CardIdAllocator::default(), seed);

        prop_assert_eq!(deal.hands[0].len(), HAND_SIZE);
        prop_assert_eq!(deal.hands[1].len(), HAND_SIZE);
        prop_assert_eq!(deal.table.len(), TABLE_SIZE);
        prop_assert_eq!(deal.deck.len(), DECK_SIZE - 2 * HAND_SIZE - TABLE_SIZE);

        let ids: HashSet<CardId> = deal.hands.iter().flatten()
            .chain(&deal.table)
            .chain(deal.deck.cards())
            .map(|c| c.id)
            .collect();
        prop_assert_eq!(ids.len(), DECK_SIZE);
    }

    /// Same seed, same deal.
    #[test]
    fn prop_deal_is_deterministic(seed in test_gens::seed()) {
        let a = deal_round(&mut CardIdAllocator::default(), seed);
        let b = deal_round(&mut CardIdAllocator::default(), seed);
        let ids = |d: &Deal| -> Vec<CardId> {
            d.deck.cards().iter().map(|c| c.id).collect()
        };
        prop_assert_eq!(ids(&a), ids(&b));
        prop_assert_eq!(&a.table, &b.table);
    }

    /// Capturing more never lowers the score.
    #[test]
    fn prop_score_is_monotone((small, large) in test_gens::pile_and_superset()) {
        let rules = RuleConfig::default();
        prop_assert!(total_score(&small, &rules) <= total_score(&large, &rules));
    }

    /// The breakdown only lists items that earn points, and they sum to the total.
    #[test]
    fn prop_detail_sums_to_total(pile in test_gens::captured_pile()) {
        let rules = RuleConfig::default();
        let items = score_detail(&pile, &rules);
        prop_assert!(items.iter().all(|i| i.points > 0));
        prop_assert_eq!(items.iter().map(|i| i.points).sum::<u32>(), total_score(&pile, &rules));
    }

    /// final = (base + go add) x multiplier, and never below base.
    #[test]
    fn prop_final_score_composition(
        (won, lost) in test_gens::two_piles(),
        go_count in 0u32..7,
        loser_go in 0u32..3,
        shakes in 0u32..3,
    ) {
        let rules = RuleConfig::default();
        let mut winner = Player::new(0, "w", false, 0);
        winner.captured = won;
        winner.go_count = go_count;
        winner.shake_count = shakes;
        let mut loser = Player::new(1, "l", false, 0);
        loser.captured = lost;
        loser.go_count = loser_go;

        let result = calculate_penalties(&winner, &loser, &rules);

        prop_assert!(result.final_score >= u64::from(result.base_score));
        prop_assert_eq!(
            result.final_score,
            u64::from(result.base_score + result.go_addition) * result.multiplier
        );
        let suffix = format!("= {}", result.final_score);
        prop_assert!(result.score_formula.ends_with(&suffix));
        if result.is_jabak {
            prop_assert_eq!(result.penalty_multiplier, 1);
        }
    }
}
