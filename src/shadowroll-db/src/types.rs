//! Shared types for the game database.
//!
//! These types are backend-agnostic; the repository trait speaks in them.

use serde::{Deserialize, Serialize};
use shadowroll::Character;

/// A user row: balance plus the pointers the bonus snapshot reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub balance: i64,
    pub selected_title: Option<String>,
    pub hunt_target: Option<String>,
    /// UTC date ("YYYY-MM-DD") of the last daily claim
    pub last_daily: Option<String>,
    pub created_at: String,
}

/// An inventory stack joined with its catalog character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedCharacter {
    pub character: Character,
    pub count: i64,
    pub acquired_at: String,
}

/// An equipped character and when it was slotted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedEntry {
    pub character: Character,
    pub equipped_at: String,
}

/// A title definition. Granted titles are linked per user; one of them may
/// be selected at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDef {
    pub id: i64,
    pub name: String,
    pub rarity_boost: f64,
    pub currency_boost: f64,
}

/// A potion row. Expiry is evaluated at aggregation time; an expired row
/// stays in the table and simply stops contributing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotionEntry {
    pub id: i64,
    pub name: String,
    pub rarity_boost: f64,
    pub currency_boost: f64,
    /// Unix seconds
    pub expires_at: i64,
}

/// Filter for catalog listings
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub series: Option<String>,
    pub rarity: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Database statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbStats {
    pub character_count: i64,
    pub user_count: i64,
    pub inventory_count: i64,
    pub potion_count: i64,
    pub title_count: i64,
}
