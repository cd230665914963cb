//! Bonus source aggregation.
//!
//! Four independent source kinds feed a single pair of modifiers: one
//! additive rarity-weight boost and one multiplicative currency multiplier.
//! Aggregation is a pure read; expired potions are excluded by timestamp
//! comparison, never deleted here.

use crate::rarity::Rarity;
use serde::{Deserialize, Serialize};

/// Maximum number of equipped characters counted toward bonuses
pub const EQUIP_SLOTS: usize = 3;

/// Rarity boost granted per completed series set, in percent
pub const SET_RARITY_BOOST: f64 = 1.0;

// Equipment boost per equipped rarity, in percent. Only Titan and above
// are equippable; lower tiers contribute nothing.
pub const EQUIP_TITAN_BOOST: f64 = 2.0;
pub const EQUIP_FUSION_BOOST: f64 = 2.5;
pub const EQUIP_SECRET_BOOST: f64 = 3.0;
pub const EQUIP_EVOLVE_BOOST: f64 = 1.0;

/// One active bonus source in a user's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusSource {
    /// An equipped ultra-rare character
    Equipment { rarity: Rarity },
    /// A fully collected series
    SeriesSet { series: String },
    /// A consumable effect, active until `expires_at` (unix seconds)
    Potion {
        rarity_boost: f64,
        currency_boost: f64,
        expires_at: i64,
    },
    /// The user's selected title
    Title {
        name: String,
        rarity_boost: f64,
        currency_boost: f64,
    },
}

/// Net modifiers for a user at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusTotals {
    /// Additive sum of all active rarity boosts, in percent
    pub rarity_boost_percent: f64,
    /// Product of `1 + pct/100` over all active currency boosts
    pub currency_multiplier: f64,
}

impl Default for BonusTotals {
    fn default() -> Self {
        Self {
            rarity_boost_percent: 0.0,
            currency_multiplier: 1.0,
        }
    }
}

/// Rarity boost an equipped character of the given tier grants, in percent.
pub fn equipment_boost(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Titan => EQUIP_TITAN_BOOST,
        Rarity::Fusion => EQUIP_FUSION_BOOST,
        Rarity::Secret => EQUIP_SECRET_BOOST,
        Rarity::Evolve => EQUIP_EVOLVE_BOOST,
        _ => 0.0,
    }
}

/// Clamp a percentage to a sane value. Malformed sources (NaN, infinite,
/// negative) contribute zero and get logged, the aggregation proceeds.
fn sanitize_percent(pct: f64, what: &str) -> f64 {
    if pct.is_finite() && pct >= 0.0 {
        pct
    } else {
        log::warn!("ignoring malformed bonus source: {what} = {pct}");
        0.0
    }
}

/// Aggregate a snapshot into net modifiers.
///
/// Pure function of the snapshot and `now` (unix seconds): calling it twice
/// with no state change yields identical output. With zero active sources
/// the result is the identity `{0, 1.0}`.
pub fn aggregate(sources: &[BonusSource], now: i64) -> BonusTotals {
    let mut rarity_boost = 0.0;
    let mut currency_mult = 1.0;
    let mut equip_used = 0usize;

    for source in sources {
        match source {
            BonusSource::Equipment { rarity } => {
                // Slot cap: anything past the first three equips is inert.
                if equip_used >= EQUIP_SLOTS {
                    continue;
                }
                equip_used += 1;
                rarity_boost += equipment_boost(*rarity);
            }
            BonusSource::SeriesSet { .. } => {
                rarity_boost += SET_RARITY_BOOST;
            }
            BonusSource::Potion {
                rarity_boost: rb,
                currency_boost: cb,
                expires_at,
            } => {
                if *expires_at <= now {
                    continue;
                }
                rarity_boost += sanitize_percent(*rb, "potion rarity_boost");
                currency_mult *= 1.0 + sanitize_percent(*cb, "potion currency_boost") / 100.0;
            }
            BonusSource::Title {
                name,
                rarity_boost: rb,
                currency_boost: cb,
            } => {
                rarity_boost += sanitize_percent(*rb, name);
                currency_mult *= 1.0 + sanitize_percent(*cb, name) / 100.0;
            }
        }
    }

    BonusTotals {
        rarity_boost_percent: rarity_boost,
        currency_multiplier: currency_mult,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_empty_snapshot_is_identity() {
        let totals = aggregate(&[], NOW);
        assert_eq!(totals.rarity_boost_percent, 0.0);
        assert_eq!(totals.currency_multiplier, 1.0);
    }

    #[test]
    fn test_titan_plus_set_scenario() {
        // One equipped Titan (+2%) and one completed set (+1%)
        let sources = vec![
            BonusSource::Equipment {
                rarity: Rarity::Titan,
            },
            BonusSource::SeriesSet {
                series: "Naruto".into(),
            },
        ];
        let totals = aggregate(&sources, NOW);
        assert_eq!(totals.rarity_boost_percent, 3.0);
        assert_eq!(totals.currency_multiplier, 1.0);
    }

    #[test]
    fn test_equipment_slot_cap() {
        let sources = vec![
            BonusSource::Equipment {
                rarity: Rarity::Secret,
            };
            5
        ];
        let totals = aggregate(&sources, NOW);
        // Only the first three count: 3 * 3%
        assert_eq!(totals.rarity_boost_percent, 9.0);
    }

    #[test]
    fn test_low_tier_equipment_contributes_nothing() {
        let sources = vec![BonusSource::Equipment {
            rarity: Rarity::Common,
        }];
        let totals = aggregate(&sources, NOW);
        assert_eq!(totals.rarity_boost_percent, 0.0);
    }

    #[test]
    fn test_expired_potion_excluded() {
        let sources = vec![BonusSource::Potion {
            rarity_boost: 10.0,
            currency_boost: 20.0,
            expires_at: NOW - 1,
        }];
        let totals = aggregate(&sources, NOW);
        assert_eq!(totals, BonusTotals::default());
    }

    #[test]
    fn test_active_potion_counted() {
        let sources = vec![BonusSource::Potion {
            rarity_boost: 10.0,
            currency_boost: 20.0,
            expires_at: NOW + 3600,
        }];
        let totals = aggregate(&sources, NOW);
        assert_eq!(totals.rarity_boost_percent, 10.0);
        assert!((totals.currency_multiplier - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_currency_multiplier_is_product() {
        let sources = vec![
            BonusSource::Potion {
                rarity_boost: 0.0,
                currency_boost: 10.0,
                expires_at: NOW + 1,
            },
            BonusSource::Title {
                name: "Collector".into(),
                rarity_boost: 0.0,
                currency_boost: 25.0,
            },
        ];
        let totals = aggregate(&sources, NOW);
        assert!((totals.currency_multiplier - 1.1 * 1.25).abs() < 1e-12);
        assert!(totals.currency_multiplier >= 1.0);
    }

    #[test]
    fn test_malformed_percent_treated_as_zero() {
        let sources = vec![
            BonusSource::Title {
                name: "Broken".into(),
                rarity_boost: f64::NAN,
                currency_boost: -50.0,
            },
            BonusSource::SeriesSet {
                series: "Bleach".into(),
            },
        ];
        let totals = aggregate(&sources, NOW);
        // The malformed title contributes zero but the set still counts.
        assert_eq!(totals.rarity_boost_percent, SET_RARITY_BOOST);
        assert_eq!(totals.currency_multiplier, 1.0);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let sources = vec![
            BonusSource::Equipment {
                rarity: Rarity::Evolve,
            },
            BonusSource::Potion {
                rarity_boost: 5.0,
                currency_boost: 5.0,
                expires_at: NOW + 60,
            },
        ];
        assert_eq!(aggregate(&sources, NOW), aggregate(&sources, NOW));
    }
}
