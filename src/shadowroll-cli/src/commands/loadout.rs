//! Bonus, equip, title, potion, and hunt command handlers

use anyhow::{Context, Result};
use chrono::Utc;
use shadowroll::{aggregate, BonusSource};
use shadowroll_db::{GameRepository, SqliteDb};

use crate::cli::{HuntCommand, PotionCommand, TitleCommand};

/// Handle the bonus command: list active sources and the aggregated totals.
pub fn bonus(db: &SqliteDb, user: &str) -> Result<()> {
    let now = Utc::now().timestamp();
    let snapshot = db.bonus_snapshot(user)?;

    if snapshot.is_empty() {
        println!("No active bonus sources.");
    } else {
        println!("Active bonus sources:");
        for source in &snapshot {
            match source {
                BonusSource::Equipment { rarity } => {
                    println!("  equipment    [{rarity}]");
                }
                BonusSource::SeriesSet { series } => {
                    println!("  series set   {series}");
                }
                BonusSource::Potion {
                    rarity_boost,
                    currency_boost,
                    expires_at,
                } => {
                    let state = if *expires_at <= now { "expired" } else { "active" };
                    println!(
                        "  potion       +{rarity_boost:.1}% rarity, +{currency_boost:.1}% currency ({state})"
                    );
                }
                BonusSource::Title {
                    name,
                    rarity_boost,
                    currency_boost,
                } => {
                    println!(
                        "  title        {name} (+{rarity_boost:.1}% rarity, +{currency_boost:.1}% currency)"
                    );
                }
            }
        }
    }

    let totals = aggregate(&snapshot, now);
    println!("\nrarity boost:       +{:.1}%", totals.rarity_boost_percent);
    println!("currency multiplier: x{:.2}", totals.currency_multiplier);
    Ok(())
}

/// Handle the equip command
pub fn equip(db: &SqliteDb, user: &str, id: &str) -> Result<()> {
    let character = db
        .get_character(id)?
        .with_context(|| format!("No character with id '{id}'"))?;
    db.equip(user, id)?;
    println!("Equipped {} [{}]", character.name, character.rarity);
    Ok(())
}

/// Handle the unequip command
pub fn unequip(db: &SqliteDb, user: &str, id: &str) -> Result<()> {
    if db.unequip(user, id)? {
        println!("Unequipped '{id}'");
    } else {
        println!("'{id}' was not equipped");
    }
    Ok(())
}

/// Handle title subcommands
pub fn title(db: &SqliteDb, user: &str, command: TitleCommand) -> Result<()> {
    match command {
        TitleCommand::Define {
            name,
            rarity_boost,
            currency_boost,
        } => {
            db.add_title(&name, rarity_boost, currency_boost)?;
            println!(
                "Defined title '{name}' (+{rarity_boost:.1}% rarity, +{currency_boost:.1}% currency)"
            );
        }
        TitleCommand::Grant { name } => {
            db.grant_title(user, &name)?;
            println!("Granted '{name}' to {user}");
        }
        TitleCommand::Select { name } => {
            db.select_title(user, &name)?;
            println!("{user} now wears '{name}'");
        }
        TitleCommand::List => {
            let titles = db.titles_of(user)?;
            if titles.is_empty() {
                println!("{user} holds no titles.");
                return Ok(());
            }
            let selected = db.profile(user)?.selected_title;
            for t in &titles {
                let marker = if selected.as_deref() == Some(t.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {:<24} +{:.1}% rarity, +{:.1}% currency",
                    t.name, t.rarity_boost, t.currency_boost
                );
            }
        }
    }
    Ok(())
}

/// Handle potion subcommands
pub fn potion(db: &SqliteDb, user: &str, command: PotionCommand) -> Result<()> {
    match command {
        PotionCommand::Add {
            name,
            rarity_boost,
            currency_boost,
            hours,
        } => {
            let expires_at = Utc::now().timestamp() + hours * 3600;
            db.add_potion(user, &name, rarity_boost, currency_boost, expires_at)?;
            println!("Added potion '{name}' expiring in {hours}h");
        }
        PotionCommand::List => {
            let potions = db.potions_of(user)?;
            if potions.is_empty() {
                println!("{user} has no potions.");
                return Ok(());
            }
            let now = Utc::now().timestamp();
            for p in &potions {
                let remaining = p.expires_at - now;
                let state = if remaining <= 0 {
                    "expired".to_string()
                } else {
                    format!("{}h left", remaining / 3600)
                };
                println!(
                    "  {:<24} +{:.1}% rarity, +{:.1}% currency ({state})",
                    p.name, p.rarity_boost, p.currency_boost
                );
            }
        }
    }
    Ok(())
}

/// Handle hunt subcommands
pub fn hunt(db: &SqliteDb, user: &str, command: HuntCommand) -> Result<()> {
    match command {
        HuntCommand::Set { id } => {
            let character = db
                .get_character(&id)?
                .with_context(|| format!("No character with id '{id}'"))?;
            db.set_hunt(user, &id)?;
            println!("Hunting {} [{}]", character.name, character.rarity);
        }
        HuntCommand::Clear => {
            if db.clear_hunt(user)? {
                println!("Hunt target cleared");
            } else {
                println!("No hunt target was set");
            }
        }
        HuntCommand::Show => match db.hunt_target(user)? {
            Some(id) => {
                let name = db
                    .get_character(&id)?
                    .map_or_else(|| id.clone(), |c| c.name);
                println!("Hunting: {name}");
            }
            None => println!("No hunt target set"),
        },
    }
    Ok(())
}
