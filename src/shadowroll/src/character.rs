//! Character catalog types.

use crate::rarity::Rarity;
use serde::{Deserialize, Serialize};

/// A collectible character. Immutable once created except by explicit
/// catalog edit; inventory rows reference it by `id`, never duplicate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Stable text key (e.g. "naruto-uzumaki")
    pub id: String,
    pub name: String,
    /// Source series (anime) the character belongs to
    pub series: String,
    pub rarity: Rarity,
    /// Base sale value in coins, before currency multipliers
    pub base_value: i64,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl Character {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        series: impl Into<String>,
        rarity: Rarity,
        base_value: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            series: series.into(),
            rarity,
            base_value,
            image_ref: None,
        }
    }
}
