//! Shadow Roll game core.
//!
//! Pure game rules for a gacha-collection economy: the static rarity weight
//! table, the bonus aggregator that folds equipment, series-set, potion and
//! title modifiers into a single pair of totals, and the weighted selector
//! that draws a tier then a character. No I/O lives here; the storage seam
//! is the `GameRepository` trait in the `shadowroll-db` crate.
//!
//! # Example
//!
//! ```
//! use shadowroll::{aggregate, select_character, BonusSource, Character, Rarity};
//!
//! let catalog = vec![Character::new("zoro", "Zoro", "One Piece", Rarity::Common, 50)];
//! let totals = aggregate(&[BonusSource::SeriesSet { series: "One Piece".into() }], 0);
//!
//! let mut rng = rand::thread_rng();
//! let picked = select_character(&catalog, totals.rarity_boost_percent, None, &mut rng);
//! assert!(picked.is_ok());
//! ```

pub mod bonus;
pub mod character;
pub mod craft;
pub mod economy;
pub mod rarity;
pub mod selector;

pub use bonus::{aggregate, BonusSource, BonusTotals, EQUIP_SLOTS};
pub use character::Character;
pub use craft::{fusion_target, FUSION_COST};
pub use economy::{daily_reward, ensure_funds, sale_value, EconomyError, DAILY_BASE, ROLL_COST};
pub use rarity::{ParseRarityError, Rarity, BASE_WEIGHTS_BP, ROLL_TIERS, WEIGHT_TOTAL_BP};
pub use selector::{adjusted_weights, draw_tier, pick_in_tier, select_character, RollError};
