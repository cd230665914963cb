//! Catalog command handlers

use crate::cli::CatalogCommand;
use anyhow::{bail, Context, Result};
use shadowroll::{Character, Rarity};
use shadowroll_db::{CatalogFilter, GameRepository, SqliteDb};
use std::path::Path;

/// Handle the catalog command
pub fn handle(db: &SqliteDb, command: CatalogCommand) -> Result<()> {
    match command {
        CatalogCommand::Init => init(db),
        CatalogCommand::Add {
            id,
            name,
            series,
            rarity,
            base_value,
            image_ref,
        } => add(db, &id, &name, &series, &rarity, base_value, image_ref),
        CatalogCommand::Update {
            id,
            name,
            series,
            rarity,
            base_value,
            image_ref,
        } => update(db, &id, name, series, rarity, base_value, image_ref),
        CatalogCommand::Show { id } => show(db, &id),
        CatalogCommand::List {
            series,
            rarity,
            limit,
        } => list(db, series, rarity, limit),
        CatalogCommand::Remove { id } => remove(db, &id),
        CatalogCommand::Import { path } => import(db, &path),
        CatalogCommand::Stats => stats(db),
    }
}

fn init(db: &SqliteDb) -> Result<()> {
    // open_db already ran init; this just confirms it for scripts.
    db.init()?;
    println!("Database initialized");
    Ok(())
}

fn add(
    db: &SqliteDb,
    id: &str,
    name: &str,
    series: &str,
    rarity: &str,
    base_value: i64,
    image_ref: Option<String>,
) -> Result<()> {
    let rarity: Rarity = rarity
        .parse()
        .with_context(|| format!("Unknown rarity '{rarity}'"))?;
    let mut character = Character::new(id, name, series, rarity, base_value);
    character.image_ref = image_ref;
    db.add_character(&character)?;
    println!("Added {} ({}, {})", character.name, character.series, rarity);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update(
    db: &SqliteDb,
    id: &str,
    name: Option<String>,
    series: Option<String>,
    rarity: Option<String>,
    base_value: Option<i64>,
    image_ref: Option<String>,
) -> Result<()> {
    let Some(mut character) = db.get_character(id)? else {
        bail!("No character with id '{id}'");
    };
    if let Some(name) = name {
        character.name = name;
    }
    if let Some(series) = series {
        character.series = series;
    }
    if let Some(rarity) = rarity {
        character.rarity = rarity
            .parse()
            .with_context(|| format!("Unknown rarity '{rarity}'"))?;
    }
    if let Some(base_value) = base_value {
        character.base_value = base_value;
    }
    if let Some(image_ref) = image_ref {
        character.image_ref = Some(image_ref);
    }
    db.update_character(&character)?;
    println!(
        "Updated {} ({}, {})",
        character.name, character.series, character.rarity
    );
    Ok(())
}

fn show(db: &SqliteDb, id: &str) -> Result<()> {
    let Some(character) = db.get_character(id)? else {
        bail!("No character with id '{id}'");
    };
    println!("{}", character.name);
    println!("  id:         {}", character.id);
    println!("  series:     {}", character.series);
    println!("  rarity:     {}", character.rarity);
    println!("  base value: {} coins", character.base_value);
    if let Some(image) = &character.image_ref {
        println!("  image:      {image}");
    }
    Ok(())
}

fn list(
    db: &SqliteDb,
    series: Option<String>,
    rarity: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let filter = CatalogFilter {
        series,
        rarity,
        limit,
        offset: None,
    };
    let characters = db.list_characters(&filter)?;

    if characters.is_empty() {
        println!("No characters match");
        return Ok(());
    }

    println!(
        "{:<24} {:<20} {:<20} {:<10} {:>8}",
        "ID", "Name", "Series", "Rarity", "Value"
    );
    println!("{}", "-".repeat(86));
    for c in &characters {
        println!(
            "{:<24} {:<20} {:<20} {:<10} {:>8}",
            c.id,
            c.name,
            c.series,
            c.rarity.to_string(),
            c.base_value
        );
    }
    println!("\n{} characters", characters.len());
    Ok(())
}

fn remove(db: &SqliteDb, id: &str) -> Result<()> {
    if db.delete_character(id)? {
        println!("Removed '{id}'");
    } else {
        println!("No character with id '{id}'");
    }
    Ok(())
}

fn import(db: &SqliteDb, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let characters: Vec<Character> =
        serde_json::from_str(&contents).context("Failed to parse seed file")?;

    let inserted = db.import_catalog(&characters)?;
    let skipped = characters.len() - inserted;
    println!("Imported {inserted} characters from {}", path.display());
    if skipped > 0 {
        println!("  {skipped} already present, skipped");
    }
    Ok(())
}

fn stats(db: &SqliteDb) -> Result<()> {
    let stats = db.stats()?;
    println!("Characters: {}", stats.character_count);
    println!("Users:      {}", stats.user_count);
    println!("Stacks:     {}", stats.inventory_count);
    println!("Potions:    {}", stats.potion_count);
    println!("Titles:     {}", stats.title_count);
    Ok(())
}
