//! Configure command handler

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(set_user: Option<String>, set_db: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if set_user.is_none() && set_db.is_none() || show {
        println!("Config file: {}", Config::config_path()?.display());
        println!(
            "  user:    {}",
            config.user.as_deref().unwrap_or("(not set)")
        );
        println!(
            "  db_path: {}",
            config
                .db_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        );
        return Ok(());
    }

    if let Some(user) = set_user {
        println!("Default user set to '{user}'");
        config.user = Some(user);
    }
    if let Some(db_path) = set_db {
        println!("Default database set to {}", db_path.display());
        config.db_path = Some(db_path);
    }
    config.save()?;

    Ok(())
}
