//! Rarity tier definitions and the static drop-weight table.

use serde::{Deserialize, Serialize};

/// Rarity tiers in ascending order of scarcity.
///
/// `Evolve` is craft-only: it is reachable through fusion and never through
/// the weighted roll.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Titan,
    Fusion,
    Secret,
    Evolve,
}

/// Tiers eligible for the weighted roll, in draw order. `Evolve` excluded.
pub const ROLL_TIERS: &[Rarity] = &[
    Rarity::Common,
    Rarity::Rare,
    Rarity::Epic,
    Rarity::Legendary,
    Rarity::Mythic,
    Rarity::Titan,
    Rarity::Fusion,
    Rarity::Secret,
];

/// Base drop weights in basis points, aligned with [`ROLL_TIERS`].
/// Must sum to [`WEIGHT_TOTAL_BP`].
pub const BASE_WEIGHTS_BP: &[u32] = &[6000, 2500, 1000, 350, 100, 35, 14, 1];

/// Total weight of the roll table (10000 bp = 100%).
pub const WEIGHT_TOTAL_BP: u32 = 10_000;

impl Rarity {
    /// All tiers including the craft-only `Evolve`.
    pub const ALL: &'static [Rarity] = &[
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Titan,
        Rarity::Fusion,
        Rarity::Secret,
        Rarity::Evolve,
    ];

    /// Whether this tier can come out of the weighted roll.
    pub fn is_rollable(&self) -> bool {
        *self != Rarity::Evolve
    }

    /// Base weight in basis points, or 0 for non-rollable tiers.
    pub fn base_weight_bp(&self) -> u32 {
        ROLL_TIERS
            .iter()
            .position(|t| t == self)
            .map(|i| BASE_WEIGHTS_BP[i])
            .unwrap_or(0)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Rare => write!(f, "rare"),
            Self::Epic => write!(f, "epic"),
            Self::Legendary => write!(f, "legendary"),
            Self::Mythic => write!(f, "mythic"),
            Self::Titan => write!(f, "titan"),
            Self::Fusion => write!(f, "fusion"),
            Self::Secret => write!(f, "secret"),
            Self::Evolve => write!(f, "evolve"),
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = ParseRarityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            "mythic" => Ok(Self::Mythic),
            "titan" => Ok(Self::Titan),
            "fusion" => Ok(Self::Fusion),
            "secret" => Ok(Self::Secret),
            "evolve" => Ok(Self::Evolve),
            _ => Err(ParseRarityError(s.to_string())),
        }
    }
}

/// Error for unrecognized rarity strings
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid rarity: {0}")]
pub struct ParseRarityError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weights_sum_to_total() {
        let sum: u32 = BASE_WEIGHTS_BP.iter().sum();
        assert_eq!(sum, WEIGHT_TOTAL_BP);
    }

    #[test]
    fn test_roll_tiers_exclude_evolve() {
        assert!(!ROLL_TIERS.contains(&Rarity::Evolve));
        assert_eq!(ROLL_TIERS.len(), BASE_WEIGHTS_BP.len());
        assert!(!Rarity::Evolve.is_rollable());
        assert_eq!(Rarity::Evolve.base_weight_bp(), 0);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Mythic < Rarity::Titan);
        assert!(Rarity::Secret < Rarity::Evolve);
    }

    #[test]
    fn test_rarity_roundtrip() {
        for tier in Rarity::ALL {
            let parsed: Rarity = tier.to_string().parse().unwrap();
            assert_eq!(parsed, *tier);
        }
        assert!("shiny".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_base_weight_lookup() {
        assert_eq!(Rarity::Common.base_weight_bp(), 6000);
        assert_eq!(Rarity::Secret.base_weight_bp(), 1);
    }
}
