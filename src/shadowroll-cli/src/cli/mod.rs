//! CLI argument definitions for sroll
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod catalog;
mod core;
mod loadout;

pub use catalog::CatalogCommand;
pub use core::{Cli, Commands};
pub use loadout::{HuntCommand, PotionCommand, TitleCommand};
