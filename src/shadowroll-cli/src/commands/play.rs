//! Roll, daily, sell, craft, and inventory command handlers

use anyhow::{bail, Context, Result};
use chrono::Utc;
use shadowroll::{
    aggregate, daily_reward, ensure_funds, fusion_target, pick_in_tier, sale_value,
    select_character, BonusTotals, FUSION_COST, ROLL_COST,
};
use shadowroll_db::{GameRepository, SqliteDb};

/// Aggregate the user's bonus snapshot as of now.
fn current_totals(db: &SqliteDb, user: &str) -> Result<BonusTotals> {
    let snapshot = db.bonus_snapshot(user)?;
    Ok(aggregate(&snapshot, Utc::now().timestamp()))
}

/// Handle the roll command
pub fn roll(db: &SqliteDb, user: &str) -> Result<()> {
    let balance = db.balance(user)?;
    ensure_funds(balance, ROLL_COST)?;

    let totals = current_totals(db, user)?;
    let catalog = db.roll_catalog()?;
    let hunt = db.hunt_target(user)?;

    let mut rng = rand::thread_rng();
    let picked = select_character(
        &catalog,
        totals.rarity_boost_percent,
        hunt.as_deref(),
        &mut rng,
    )?
    .clone();

    db.record_roll(user, &picked.id, ROLL_COST)?;
    if hunt.is_some() {
        // A hunt target applies to exactly one roll.
        db.clear_hunt(user)?;
    }

    println!(
        "{} rolled: {} [{}] from {}",
        user, picked.name, picked.rarity, picked.series
    );
    if totals.rarity_boost_percent > 0.0 {
        println!("  rarity boost: +{:.1}%", totals.rarity_boost_percent);
    }
    println!("  balance: {} coins", db.balance(user)?);
    Ok(())
}

/// Handle the daily command
pub fn daily(db: &SqliteDb, user: &str) -> Result<()> {
    let totals = current_totals(db, user)?;
    let reward = daily_reward(&totals);
    let today = Utc::now().format("%Y-%m-%d").to_string();

    if db.claim_daily(user, reward, &today)? {
        println!("{user} claimed {reward} coins");
        println!("  balance: {} coins", db.balance(user)?);
    } else {
        println!("Daily reward already claimed today");
    }
    Ok(())
}

/// Handle the sell command
pub fn sell(db: &SqliteDb, user: &str, id: &str, count: i64) -> Result<()> {
    if count <= 0 {
        bail!("Count must be positive");
    }
    let character = db
        .get_character(id)?
        .with_context(|| format!("No character with id '{id}'"))?;
    let owned = db.count_owned(user, id)?;
    if owned < count {
        bail!("You own {owned} of '{id}', cannot sell {count}");
    }

    let totals = current_totals(db, user)?;
    let payout = sale_value(character.base_value, &totals) * count;
    db.record_sale(user, id, count, payout)?;

    println!("Sold {count}x {} for {payout} coins", character.name);
    println!("  balance: {} coins", db.balance(user)?);
    Ok(())
}

/// Handle the craft command
pub fn craft(db: &SqliteDb, user: &str, id: &str) -> Result<()> {
    let character = db
        .get_character(id)?
        .with_context(|| format!("No character with id '{id}'"))?;
    let Some(target_tier) = fusion_target(character.rarity) else {
        bail!("{} is already at the top tier", character.name);
    };
    let owned = db.count_owned(user, id)?;
    if owned < i64::from(FUSION_COST) {
        bail!(
            "Fusion needs {FUSION_COST} copies of '{id}', you own {owned}"
        );
    }

    // No charge has happened yet, so an empty target tier aborts cleanly.
    let candidates = db.characters_by_tier(target_tier)?;
    let mut rng = rand::thread_rng();
    let produced = pick_in_tier(&candidates, target_tier, &mut rng)?.clone();

    db.record_craft(user, id, FUSION_COST, &produced.id)?;

    println!(
        "Fused {FUSION_COST}x {} into {} [{}]",
        character.name, produced.name, produced.rarity
    );
    Ok(())
}

/// Handle the inventory command
pub fn inventory(db: &SqliteDb, user: &str) -> Result<()> {
    let entries = db.inventory_of(user)?;
    if entries.is_empty() {
        println!("{user} owns no characters yet. Try 'sroll roll'.");
        return Ok(());
    }

    println!(
        "{:<24} {:<20} {:<20} {:<10} {:>6}",
        "ID", "Name", "Series", "Rarity", "Count"
    );
    println!("{}", "-".repeat(84));
    let mut total = 0;
    for entry in &entries {
        total += entry.count;
        println!(
            "{:<24} {:<20} {:<20} {:<10} {:>6}",
            entry.character.id,
            entry.character.name,
            entry.character.series,
            entry.character.rarity.to_string(),
            entry.count
        );
    }
    println!("\n{total} cards across {} stacks", entries.len());
    Ok(())
}

/// Handle the profile command
pub fn profile(db: &SqliteDb, user: &str) -> Result<()> {
    let profile = db.profile(user)?;
    println!("{}", profile.name);
    println!("  balance: {} coins", profile.balance);
    println!(
        "  title:   {}",
        profile.selected_title.as_deref().unwrap_or("(none)")
    );
    println!(
        "  hunt:    {}",
        profile.hunt_target.as_deref().unwrap_or("(none)")
    );
    if let Some(last) = &profile.last_daily {
        println!("  last daily: {last}");
    }
    Ok(())
}
