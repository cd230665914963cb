//! Title, potion, and hunt command CLI definitions

use clap::Subcommand;

#[derive(Subcommand)]
pub enum TitleCommand {
    /// Define (or redefine) a title and its bonuses
    Define {
        /// Title name
        name: String,

        /// Rarity boost in percent
        #[arg(long, default_value_t = 0.0)]
        rarity_boost: f64,

        /// Currency boost in percent
        #[arg(long, default_value_t = 0.0)]
        currency_boost: f64,
    },

    /// Grant a title to the current user
    Grant {
        /// Title name
        name: String,
    },

    /// Select a granted title as active
    Select {
        /// Title name
        name: String,
    },

    /// List titles granted to the current user
    List,
}

#[derive(Subcommand)]
pub enum PotionCommand {
    /// Hand the current user a potion effect
    Add {
        /// Potion name
        name: String,

        /// Rarity boost in percent
        #[arg(long, default_value_t = 0.0)]
        rarity_boost: f64,

        /// Currency boost in percent
        #[arg(long, default_value_t = 0.0)]
        currency_boost: f64,

        /// Hours until the effect expires
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },

    /// List the current user's potions, expired ones included
    List,
}

#[derive(Subcommand)]
pub enum HuntCommand {
    /// Set the hunt target for the next roll
    Set {
        /// Character id
        id: String,
    },

    /// Clear the hunt target
    Clear,

    /// Show the current hunt target
    Show,
}
