//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::catalog::CatalogCommand;
use super::loadout::{HuntCommand, PotionCommand, TitleCommand};

#[derive(Parser)]
#[command(name = "sroll")]
#[command(about = "Shadow Roll - gacha collection game", long_about = None)]
pub struct Cli {
    /// Path to the game database (overrides the configured default)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// User to act as (overrides the configured default)
    #[arg(long, short, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure default settings
    Configure {
        /// Set the default user
        #[arg(long)]
        set_user: Option<String>,

        /// Set the default database path
        #[arg(long)]
        set_db: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },

    /// Character catalog operations
    #[command(visible_alias = "c")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Spend coins on one weighted roll
    #[command(visible_alias = "r")]
    Roll,

    /// Claim the daily reward
    Daily,

    /// Sell owned copies of a character
    Sell {
        /// Character id
        id: String,

        /// Copies to sell
        #[arg(long, default_value_t = 1)]
        count: i64,
    },

    /// Fuse duplicate copies into a random character of the next tier
    Craft {
        /// Character id to consume
        id: String,
    },

    /// List owned characters
    #[command(visible_alias = "inv")]
    Inventory,

    /// Show balance, selected title, and hunt target
    Profile,

    /// Show active bonus sources and the aggregated totals
    #[command(visible_alias = "b")]
    Bonus,

    /// Equip an owned ultra-rare character (3 slots)
    Equip {
        /// Character id
        id: String,
    },

    /// Free a character's equip slot
    Unequip {
        /// Character id
        id: String,
    },

    /// Title operations
    Title {
        #[command(subcommand)]
        command: TitleCommand,
    },

    /// Potion operations
    Potion {
        #[command(subcommand)]
        command: PotionCommand,
    },

    /// Hunt target operations (forces the next roll's result)
    Hunt {
        #[command(subcommand)]
        command: HuntCommand,
    },
}
