//! Command handlers

pub mod catalog;
pub mod configure;
pub mod loadout;
pub mod play;

use crate::config::Config;
use anyhow::{Context, Result};
use shadowroll_db::{GameRepository, SqliteDb, DEFAULT_DB_PATH};
use std::path::PathBuf;

/// Open the game database, preferring the CLI flag over the configured
/// default, and make sure the schema is current.
pub fn open_db(cli_db: Option<&PathBuf>) -> Result<SqliteDb> {
    let path = match cli_db {
        Some(path) => path.clone(),
        None => Config::load()?
            .db_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
    };
    let db = SqliteDb::open(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    db.init().context("Failed to initialize database schema")?;
    Ok(db)
}

/// Resolve the acting user from the CLI flag or the config file.
pub fn resolve_user(cli_user: Option<&str>) -> Result<String> {
    if let Some(user) = cli_user {
        return Ok(user.to_string());
    }
    Config::load()?
        .user
        .context("No user set. Pass --user or run 'sroll configure --set-user <name>'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.db");
        let db = open_db(Some(&path)).unwrap();
        // Schema is in place: an empty catalog lists cleanly.
        assert!(db.roll_catalog().unwrap().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn resolve_user_prefers_cli_flag() {
        assert_eq!(resolve_user(Some("mireille")).unwrap(), "mireille");
    }
}
