//! Weighted rarity selection.
//!
//! The roll draws a tier from the boosted weight table, then one character
//! uniformly within that tier. A hunt target short-circuits the draw
//! entirely. Stateless: each call reads the catalog and rolls fresh.

use crate::character::Character;
use crate::rarity::{Rarity, BASE_WEIGHTS_BP, ROLL_TIERS, WEIGHT_TOTAL_BP};
use rand::Rng;

/// Error type for roll selection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RollError {
    /// The drawn tier has no catalog entries. Fatal to the current roll;
    /// the caller must not charge for it.
    #[error("No characters available for tier {tier}")]
    NoCharactersAvailable { tier: Rarity },

    /// A hunt target was set but the catalog has no such character
    #[error("Hunt target not in catalog: {0}")]
    UnknownHuntTarget(String),
}

/// Apply a rarity boost to the base weight table.
///
/// Every non-Common tier scales by `1 + boost/100` (floored to whole basis
/// points, so never below base); Common takes whatever remains so the table
/// still sums to [`WEIGHT_TOTAL_BP`]. An extreme boost floors Common at the
/// rounding dust and renormalizes the rest to fill the table.
pub fn adjusted_weights(boost_percent: f64) -> Vec<u32> {
    let boost = if boost_percent.is_finite() && boost_percent > 0.0 {
        boost_percent
    } else {
        0.0
    };
    // Past WEIGHT_TOTAL_BP the renormalization below cancels the factor,
    // and an unclamped factor can push boosted_sum to infinity.
    let factor = (1.0 + boost / 100.0).min(f64::from(WEIGHT_TOTAL_BP));

    let boosted_sum: f64 = BASE_WEIGHTS_BP
        .iter()
        .skip(1)
        .map(|&w| f64::from(w) * factor)
        .sum();

    // Common can only absorb so much; past that the rest fills the table.
    let scale = if boosted_sum >= f64::from(WEIGHT_TOTAL_BP) {
        f64::from(WEIGHT_TOTAL_BP) / boosted_sum
    } else {
        1.0
    };

    let mut weights = Vec::with_capacity(BASE_WEIGHTS_BP.len());
    weights.push(0); // Common placeholder, filled below
    let mut others_total = 0u32;
    for &w in BASE_WEIGHTS_BP.iter().skip(1) {
        let adjusted = (f64::from(w) * factor * scale).floor() as u32;
        others_total += adjusted;
        weights.push(adjusted);
    }
    weights[0] = WEIGHT_TOTAL_BP - others_total;
    weights
}

/// Draw one rarity tier from a weight table aligned with [`ROLL_TIERS`].
pub fn draw_tier<R: Rng>(weights: &[u32], rng: &mut R) -> Rarity {
    let roll = rng.gen_range(0..WEIGHT_TOTAL_BP);
    let mut cumulative = 0u32;
    for (tier, &weight) in ROLL_TIERS.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *tier;
        }
    }
    // Weights sum to WEIGHT_TOTAL_BP, so the loop always returns.
    unreachable!("weight table does not cover the roll range")
}

/// Pick uniformly among the catalog characters of one tier.
pub fn pick_in_tier<'a, R: Rng>(
    catalog: &'a [Character],
    tier: Rarity,
    rng: &mut R,
) -> Result<&'a Character, RollError> {
    let candidates: Vec<&Character> = catalog.iter().filter(|c| c.rarity == tier).collect();
    if candidates.is_empty() {
        return Err(RollError::NoCharactersAvailable { tier });
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

/// Run one roll: boosted tier draw, then uniform pick within the tier.
///
/// A hunt target overrides the whole draw and resolves deterministically.
pub fn select_character<'a, R: Rng>(
    catalog: &'a [Character],
    boost_percent: f64,
    hunt_target: Option<&str>,
    rng: &mut R,
) -> Result<&'a Character, RollError> {
    if let Some(target) = hunt_target {
        return catalog
            .iter()
            .find(|c| c.id == target)
            .ok_or_else(|| RollError::UnknownHuntTarget(target.to_string()));
    }

    let weights = adjusted_weights(boost_percent);
    let tier = draw_tier(&weights, rng);
    pick_in_tier(catalog, tier, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn full_catalog() -> Vec<Character> {
        let mut catalog = Vec::new();
        for (i, tier) in Rarity::ALL.iter().enumerate() {
            catalog.push(Character::new(
                format!("char-{i}-a"),
                format!("Char {i}a"),
                "Test Series",
                *tier,
                100,
            ));
            catalog.push(Character::new(
                format!("char-{i}-b"),
                format!("Char {i}b"),
                "Test Series",
                *tier,
                100,
            ));
        }
        catalog
    }

    #[test]
    fn test_zero_boost_is_base_table() {
        assert_eq!(adjusted_weights(0.0), BASE_WEIGHTS_BP.to_vec());
        assert_eq!(adjusted_weights(-5.0), BASE_WEIGHTS_BP.to_vec());
        assert_eq!(adjusted_weights(f64::NAN), BASE_WEIGHTS_BP.to_vec());
    }

    #[test]
    fn test_boost_shifts_weight_off_common() {
        for boost in [1.0, 3.0, 10.0, 50.0, 100.0] {
            let weights = adjusted_weights(boost);
            assert_eq!(weights.iter().sum::<u32>(), WEIGHT_TOTAL_BP);
            // Common strictly decreases, everything else never drops below base.
            assert!(weights[0] < BASE_WEIGHTS_BP[0], "boost {boost}");
            for (i, &w) in weights.iter().enumerate().skip(1) {
                assert!(w >= BASE_WEIGHTS_BP[i], "tier {i} at boost {boost}");
            }
        }
    }

    #[test]
    fn test_extreme_boost_keeps_table_valid() {
        let weights = adjusted_weights(100_000.0);
        assert_eq!(weights.iter().sum::<u32>(), WEIGHT_TOTAL_BP);
        for (i, &w) in weights.iter().enumerate().skip(1) {
            assert!(w >= BASE_WEIGHTS_BP[i]);
        }
    }

    #[test]
    fn test_overflowing_boost_keeps_table_valid() {
        // Large enough that an unclamped factor would push the boosted
        // sum to infinity and zero out every non-Common weight.
        let weights = adjusted_weights(f64::MAX);
        assert_eq!(weights.iter().sum::<u32>(), WEIGHT_TOTAL_BP);
        for (i, &w) in weights.iter().enumerate().skip(1) {
            assert!(w >= BASE_WEIGHTS_BP[i]);
        }
        assert!(weights[0] < BASE_WEIGHTS_BP[0]);
    }

    #[test]
    fn test_three_percent_scenario() {
        // Equipped Titan (+2%) plus a completed set (+1%)
        let weights = adjusted_weights(3.0);
        assert!(weights[0] < 6000);
        assert_eq!(weights[1], 2575); // 2500 * 1.03
        assert_eq!(weights[2], 1030); // 1000 * 1.03
    }

    #[test]
    fn test_draw_never_returns_evolve() {
        let weights = adjusted_weights(500.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20_000 {
            assert_ne!(draw_tier(&weights, &mut rng), Rarity::Evolve);
        }
    }

    #[test]
    fn test_draw_distribution_approximates_base() {
        let weights = adjusted_weights(0.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut hist: HashMap<Rarity, u64> = HashMap::new();
        let draws = 100_000u64;
        for _ in 0..draws {
            *hist.entry(draw_tier(&weights, &mut rng)).or_default() += 1;
        }

        let common_share = *hist.get(&Rarity::Common).unwrap() as f64 / draws as f64;
        let rare_share = *hist.get(&Rarity::Rare).unwrap() as f64 / draws as f64;
        assert!((common_share - 0.60).abs() < 0.01, "common {common_share}");
        assert!((rare_share - 0.25).abs() < 0.01, "rare {rare_share}");
    }

    #[test]
    fn test_empty_tier_is_an_error() {
        let catalog = full_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let err = pick_in_tier(&[], Rarity::Secret, &mut rng).unwrap_err();
        assert_eq!(
            err,
            RollError::NoCharactersAvailable {
                tier: Rarity::Secret
            }
        );
        // A populated tier picks one of its members.
        let picked = pick_in_tier(&catalog, Rarity::Mythic, &mut rng).unwrap();
        assert_eq!(picked.rarity, Rarity::Mythic);
    }

    #[test]
    fn test_select_respects_tier_of_draw() {
        let catalog = full_catalog();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..5_000 {
            let picked = select_character(&catalog, 20.0, None, &mut rng).unwrap();
            assert_ne!(picked.rarity, Rarity::Evolve);
        }
    }

    #[test]
    fn test_hunt_override_is_deterministic() {
        let catalog = full_catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let picked = select_character(&catalog, 0.0, Some("char-8-a"), &mut rng).unwrap();
        assert_eq!(picked.id, "char-8-a");

        let err = select_character(&catalog, 0.0, Some("missing"), &mut rng).unwrap_err();
        assert_eq!(err, RollError::UnknownHuntTarget("missing".into()));
    }
}
