//! Catalog command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Initialize the game database
    Init,

    /// Add a character to the catalog
    Add {
        /// Stable character id (e.g. "naruto-uzumaki")
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Source series
        #[arg(long)]
        series: String,

        /// Rarity tier (e.g. "mythic")
        #[arg(long)]
        rarity: String,

        /// Base sale value in coins
        #[arg(long, default_value_t = 50)]
        base_value: i64,

        /// Image reference
        #[arg(long)]
        image_ref: Option<String>,
    },

    /// Edit an existing catalog character
    Update {
        /// Character id
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New source series
        #[arg(long)]
        series: Option<String>,

        /// New rarity tier
        #[arg(long)]
        rarity: Option<String>,

        /// New base sale value in coins
        #[arg(long)]
        base_value: Option<i64>,

        /// New image reference
        #[arg(long)]
        image_ref: Option<String>,
    },

    /// Show details for one character
    Show {
        /// Character id
        id: String,
    },

    /// List catalog characters
    List {
        /// Filter by series
        #[arg(long)]
        series: Option<String>,

        /// Filter by rarity
        #[arg(long)]
        rarity: Option<String>,

        /// Maximum rows
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Remove a character from the catalog
    Remove {
        /// Character id
        id: String,
    },

    /// Import characters from a JSON seed file
    Import {
        /// Path to a JSON array of characters
        path: PathBuf,
    },

    /// Show database statistics
    Stats,
}
