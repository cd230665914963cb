//! Fusion rules.
//!
//! Fusing consumes duplicate copies of one character and yields a random
//! character of the next tier up. This is the only way to reach `Evolve`.

use crate::rarity::Rarity;

/// Copies of one character consumed by a fusion
pub const FUSION_COST: u32 = 5;

/// Tier produced by fusing a character of the given tier.
/// `Evolve` is terminal and cannot be fused further.
pub fn fusion_target(tier: Rarity) -> Option<Rarity> {
    match tier {
        Rarity::Common => Some(Rarity::Rare),
        Rarity::Rare => Some(Rarity::Epic),
        Rarity::Epic => Some(Rarity::Legendary),
        Rarity::Legendary => Some(Rarity::Mythic),
        Rarity::Mythic => Some(Rarity::Titan),
        Rarity::Titan => Some(Rarity::Fusion),
        Rarity::Fusion => Some(Rarity::Secret),
        Rarity::Secret => Some(Rarity::Evolve),
        Rarity::Evolve => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_chain_ascends() {
        let mut tier = Rarity::Common;
        let mut steps = 0;
        while let Some(next) = fusion_target(tier) {
            assert!(next > tier);
            tier = next;
            steps += 1;
        }
        assert_eq!(tier, Rarity::Evolve);
        assert_eq!(steps, 8);
    }

    #[test]
    fn test_evolve_only_from_secret() {
        for tier in Rarity::ALL {
            let produces_evolve = fusion_target(*tier) == Some(Rarity::Evolve);
            assert_eq!(produces_evolve, *tier == Rarity::Secret);
        }
    }

    #[test]
    fn test_evolve_is_terminal() {
        assert_eq!(fusion_target(Rarity::Evolve), None);
    }
}
