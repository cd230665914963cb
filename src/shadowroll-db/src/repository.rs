//! Repository trait for game state operations.
//!
//! This trait is the storage seam: the core stays pure and the presentation
//! layer reaches persistent state only through it.

use crate::types::*;
use shadowroll::{BonusSource, Character, ParseRarityError, Rarity};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Character not found: {0}")]
    NotFound(String),

    #[error("Character not owned: {0}")]
    NotOwned(String),

    #[error("Character cannot be equipped: {0}")]
    NotEquippable(String),

    #[error("Character cannot be hunted: {0}")]
    NotHuntable(String),

    #[error("All {0} equip slots are in use")]
    EquipSlotsFull(usize),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseRarityError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Trait for game state storage (synchronous, used by the CLI)
pub trait GameRepository {
    /// Initialize the database schema
    fn init(&self) -> RepoResult<()>;

    /// Get database statistics
    fn stats(&self) -> RepoResult<DbStats>;

    // === Character catalog ===

    /// Add one character to the catalog
    fn add_character(&self, character: &Character) -> RepoResult<()>;

    /// Get a character by id
    fn get_character(&self, id: &str) -> RepoResult<Option<Character>>;

    /// List catalog characters with optional filters
    fn list_characters(&self, filter: &CatalogFilter) -> RepoResult<Vec<Character>>;

    /// All characters of one tier
    fn characters_by_tier(&self, tier: Rarity) -> RepoResult<Vec<Character>>;

    /// The roll-eligible catalog (every tier except Evolve)
    fn roll_catalog(&self) -> RepoResult<Vec<Character>>;

    /// Overwrite a catalog character's fields (admin edit).
    /// Returns false when no character has that id.
    fn update_character(&self, character: &Character) -> RepoResult<bool>;

    /// Remove a character from the catalog
    fn delete_character(&self, id: &str) -> RepoResult<bool>;

    /// Bulk-insert seed characters, skipping ids that already exist.
    /// Returns how many were inserted.
    fn import_catalog(&self, characters: &[Character]) -> RepoResult<usize>;

    // === Users and balances ===

    /// Full profile row (created at zero balance on first touch)
    fn profile(&self, user: &str) -> RepoResult<UserProfile>;

    /// Current balance (created at zero on first touch)
    fn balance(&self, user: &str) -> RepoResult<i64>;

    /// Add coins; returns the new balance
    fn credit(&self, user: &str, amount: i64) -> RepoResult<i64>;

    /// Remove coins; returns the new balance. Fails with
    /// [`RepoError::InsufficientFunds`] without mutating when the balance
    /// cannot cover the amount.
    fn debit(&self, user: &str, amount: i64) -> RepoResult<i64>;

    // === Inventory ===

    /// All stacks the user owns, joined with catalog data
    fn inventory_of(&self, user: &str) -> RepoResult<Vec<OwnedCharacter>>;

    /// Stack size for one character (0 when unowned)
    fn count_owned(&self, user: &str, character_id: &str) -> RepoResult<i64>;

    // === Bonus state ===

    /// Snapshot of every bonus source for the aggregator. Malformed rows
    /// are logged and skipped rather than failing the whole read.
    fn bonus_snapshot(&self, user: &str) -> RepoResult<Vec<BonusSource>>;

    /// Series for which the user owns every catalog character
    fn completed_sets(&self, user: &str) -> RepoResult<Vec<String>>;

    /// Equip an owned Titan+ character (3-slot cap)
    fn equip(&self, user: &str, character_id: &str) -> RepoResult<()>;

    /// Unequip; returns whether a slot was freed
    fn unequip(&self, user: &str, character_id: &str) -> RepoResult<bool>;

    /// Currently equipped characters, oldest slot first
    fn equipped(&self, user: &str) -> RepoResult<Vec<EquippedEntry>>;

    /// Define a title; returns its id
    fn add_title(&self, name: &str, rarity_boost: f64, currency_boost: f64) -> RepoResult<i64>;

    /// Grant a title to a user
    fn grant_title(&self, user: &str, title: &str) -> RepoResult<()>;

    /// Select one granted title as active
    fn select_title(&self, user: &str, title: &str) -> RepoResult<()>;

    /// Titles granted to the user
    fn titles_of(&self, user: &str) -> RepoResult<Vec<TitleDef>>;

    /// Hand the user a potion effect
    fn add_potion(
        &self,
        user: &str,
        name: &str,
        rarity_boost: f64,
        currency_boost: f64,
        expires_at: i64,
    ) -> RepoResult<()>;

    /// All potion rows for the user, including expired ones
    fn potions_of(&self, user: &str) -> RepoResult<Vec<PotionEntry>>;

    // === Hunt ===

    /// Set the hunt target for the next roll
    fn set_hunt(&self, user: &str, character_id: &str) -> RepoResult<()>;

    /// Clear the hunt target; returns whether one was set
    fn clear_hunt(&self, user: &str) -> RepoResult<bool>;

    /// Current hunt target, if any
    fn hunt_target(&self, user: &str) -> RepoResult<Option<String>>;

    // === Transactional flows ===
    // Charge and inventory write happen in one SQLite transaction: either
    // both land or neither does.

    /// Debit the roll cost and add the rolled character to the inventory
    fn record_roll(&self, user: &str, character_id: &str, cost: i64) -> RepoResult<()>;

    /// Remove copies from the inventory and credit the payout
    fn record_sale(&self, user: &str, character_id: &str, count: i64, payout: i64)
        -> RepoResult<()>;

    /// Consume fusion copies and add the produced character
    fn record_craft(
        &self,
        user: &str,
        consumed_id: &str,
        copies: u32,
        produced_id: &str,
    ) -> RepoResult<()>;

    /// Credit the daily reward at most once per UTC day.
    /// Returns false when today's reward was already claimed.
    fn claim_daily(&self, user: &str, reward: i64, today: &str) -> RepoResult<bool>;
}
