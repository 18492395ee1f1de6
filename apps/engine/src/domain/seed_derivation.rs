//! Per-round seed derivation.
//!
//! A game keeps one base seed; each round deals from a seed derived from it so
//! that a restart produces a new but reproducible deal.

/// Derive the dealing seed for `round_no` from the game's base seed.
pub fn derive_dealing_seed(game_seed: u64, round_no: u32) -> u64 {
    game_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(2)
}
