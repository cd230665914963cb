//! SQLite implementation using rusqlite (synchronous).
//!
//! Charge-and-write flows (`record_roll`, `record_sale`, `record_craft`)
//! run inside one transaction so a failed debit never leaves a stray
//! inventory row, and vice versa.

use crate::repository::*;
use crate::shared::{self, CHARACTER_SELECT_COLUMNS};
use crate::types::*;
use rusqlite::{params, Connection, OptionalExtension};
use shadowroll::bonus::equipment_boost;
use shadowroll::{BonusSource, Character, ParseRarityError, Rarity, EQUIP_SLOTS, ROLL_TIERS};
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "shadowroll.db";

/// SQLite-backed game database
pub struct SqliteDb {
    conn: Connection,
}

fn db_err(e: rusqlite::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

fn row_to_character(row: &rusqlite::Row<'_>) -> rusqlite::Result<Character> {
    let rarity_str: String = row.get(3)?;
    let rarity = rarity_str.parse().map_err(|e: ParseRarityError| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        series: row.get(2)?,
        rarity,
        base_value: row.get(4)?,
        image_ref: row.get(5)?,
    })
}

impl SqliteDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Create a user row at zero balance if it does not exist yet
    fn ensure_user(&self, user: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO users (name) VALUES (?1)",
                params![user],
            )
            .map_err(db_err)?;
        Ok(())
    }

    /// Check if a migration has been applied
    fn is_migration_applied(&self, version: &str) -> RepoResult<bool> {
        let result: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(result.is_some())
    }

    /// Mark a migration as applied
    fn mark_migration_applied(&self, version: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                params![version],
            )
            .map_err(db_err)?;
        Ok(())
    }

    /// Run pending migrations
    fn run_migrations(&self) -> RepoResult<()> {
        if !self.is_migration_applied("0001_base_schema")? {
            let batch = [
                shared::schema::CHARACTERS_TABLE,
                shared::schema::TITLES_TABLE,
                shared::schema::USERS_TABLE,
                shared::schema::INVENTORY_TABLE,
                shared::schema::EQUIPPED_TABLE,
                shared::schema::POTIONS_TABLE,
                shared::schema::USER_TITLES_TABLE,
            ]
            .join(";");
            self.conn.execute_batch(&batch).map_err(db_err)?;
            self.mark_migration_applied("0001_base_schema")?;
        }

        // Indexes after all migrations
        self.conn
            .execute_batch(shared::schema::INDEXES)
            .map_err(db_err)?;

        Ok(())
    }
}

impl GameRepository for SqliteDb {
    fn init(&self) -> RepoResult<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version TEXT PRIMARY KEY NOT NULL,
                    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .map_err(db_err)?;

        self.run_migrations()
    }

    fn stats(&self) -> RepoResult<DbStats> {
        let count = |table: &str| -> RepoResult<i64> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .map_err(db_err)
        };
        Ok(DbStats {
            character_count: count("characters")?,
            user_count: count("users")?,
            inventory_count: count("inventory")?,
            potion_count: count("potions")?,
            title_count: count("titles")?,
        })
    }

    fn add_character(&self, character: &Character) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO characters (id, name, series, rarity, base_value, image_ref)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    character.id,
                    character.name,
                    character.series,
                    character.rarity.to_string(),
                    character.base_value,
                    character.image_ref,
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn update_character(&self, character: &Character) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute(
                "UPDATE characters SET name = ?2, series = ?3, rarity = ?4,
                        base_value = ?5, image_ref = ?6
                 WHERE id = ?1",
                params![
                    character.id,
                    character.name,
                    character.series,
                    character.rarity.to_string(),
                    character.base_value,
                    character.image_ref,
                ],
            )
            .map_err(db_err)?;
        Ok(rows > 0)
    }

    fn get_character(&self, id: &str) -> RepoResult<Option<Character>> {
        let sql = format!(
            "SELECT {} FROM characters WHERE id = ?1",
            CHARACTER_SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let character = stmt
            .query_row(params![id], row_to_character)
            .optional()
            .map_err(db_err)?;
        Ok(character)
    }

    fn list_characters(&self, filter: &CatalogFilter) -> RepoResult<Vec<Character>> {
        let (sql, _) = shared::build_list_query(filter);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(series) = &filter.series {
            params_vec.push(Box::new(series.clone()));
        }
        if let Some(rarity) = &filter.rarity {
            params_vec.push(Box::new(rarity.clone()));
        }
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let characters = stmt
            .query_map(params_refs.as_slice(), row_to_character)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(characters)
    }

    fn characters_by_tier(&self, tier: Rarity) -> RepoResult<Vec<Character>> {
        let sql = format!(
            "SELECT {} FROM characters WHERE rarity = ?1 ORDER BY name",
            CHARACTER_SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let characters = stmt
            .query_map(params![tier.to_string()], row_to_character)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(characters)
    }

    fn roll_catalog(&self) -> RepoResult<Vec<Character>> {
        let placeholders = ROLL_TIERS
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM characters WHERE rarity IN ({placeholders})",
            CHARACTER_SELECT_COLUMNS
        );
        let tier_names: Vec<String> = ROLL_TIERS.iter().map(|t| t.to_string()).collect();
        let params_refs: Vec<&dyn rusqlite::ToSql> = tier_names
            .iter()
            .map(|t| t as &dyn rusqlite::ToSql)
            .collect();
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let characters = stmt
            .query_map(params_refs.as_slice(), row_to_character)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(characters)
    }

    fn delete_character(&self, id: &str) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM characters WHERE id = ?1", params![id])
            .map_err(db_err)?;
        Ok(rows > 0)
    }

    fn import_catalog(&self, characters: &[Character]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;
        let mut inserted = 0;
        for character in characters {
            let rows = tx
                .execute(
                    "INSERT OR IGNORE INTO characters (id, name, series, rarity, base_value, image_ref)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        character.id,
                        character.name,
                        character.series,
                        character.rarity.to_string(),
                        character.base_value,
                        character.image_ref,
                    ],
                )
                .map_err(db_err)?;
            inserted += rows;
        }
        tx.commit().map_err(db_err)?;
        Ok(inserted)
    }

    fn profile(&self, user: &str) -> RepoResult<UserProfile> {
        self.ensure_user(user)?;
        self.conn
            .query_row(
                "SELECT u.name, u.balance, t.name, u.hunt_target, u.last_daily, u.created_at
                 FROM users u LEFT JOIN titles t ON t.id = u.selected_title
                 WHERE u.name = ?1",
                params![user],
                |row| {
                    Ok(UserProfile {
                        name: row.get(0)?,
                        balance: row.get(1)?,
                        selected_title: row.get(2)?,
                        hunt_target: row.get(3)?,
                        last_daily: row.get(4)?,
                        created_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    })
                },
            )
            .map_err(db_err)
    }

    fn balance(&self, user: &str) -> RepoResult<i64> {
        self.ensure_user(user)?;
        self.conn
            .query_row(
                "SELECT balance FROM users WHERE name = ?1",
                params![user],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    fn credit(&self, user: &str, amount: i64) -> RepoResult<i64> {
        self.ensure_user(user)?;
        self.conn
            .execute(
                "UPDATE users SET balance = balance + ?2 WHERE name = ?1",
                params![user, amount],
            )
            .map_err(db_err)?;
        self.balance(user)
    }

    fn debit(&self, user: &str, amount: i64) -> RepoResult<i64> {
        self.ensure_user(user)?;
        let rows = self
            .conn
            .execute(
                "UPDATE users SET balance = balance - ?2
                 WHERE name = ?1 AND balance >= ?2",
                params![user, amount],
            )
            .map_err(db_err)?;
        if rows == 0 {
            let available = self.balance(user)?;
            return Err(RepoError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balance(user)
    }

    fn inventory_of(&self, user: &str) -> RepoResult<Vec<OwnedCharacter>> {
        let sql = format!(
            "SELECT {}, i.count, i.acquired_at
             FROM inventory i JOIN characters c ON c.id = i.character_id
             WHERE i.user = ?1",
            CHARACTER_SELECT_COLUMNS
                .split(", ")
                .map(|col| format!("c.{col}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let mut entries = stmt
            .query_map(params![user], |row| {
                Ok(OwnedCharacter {
                    character: row_to_character(row)?,
                    count: row.get(6)?,
                    acquired_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        // SQL would order the rarity text alphabetically; sort by tier here.
        entries.sort_by(|a, b| {
            b.character
                .rarity
                .cmp(&a.character.rarity)
                .then_with(|| a.character.name.cmp(&b.character.name))
        });
        Ok(entries)
    }

    fn count_owned(&self, user: &str, character_id: &str) -> RepoResult<i64> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT count FROM inventory WHERE user = ?1 AND character_id = ?2",
                params![user, character_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(count.unwrap_or(0))
    }

    fn bonus_snapshot(&self, user: &str) -> RepoResult<Vec<BonusSource>> {
        let mut sources = Vec::new();

        // Equipment, oldest slot first (the aggregator caps at 3)
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.rarity FROM equipped e
                 JOIN characters c ON c.id = e.character_id
                 WHERE e.user = ?1 ORDER BY e.equipped_at, e.id",
            )
            .map_err(db_err)?;
        let rarities = stmt
            .query_map(params![user], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        for rarity_str in rarities {
            match rarity_str.parse::<Rarity>() {
                Ok(rarity) => sources.push(BonusSource::Equipment { rarity }),
                Err(e) => log::warn!("skipping malformed equipped row for {user}: {e}"),
            }
        }

        // Completed series sets
        for series in self.completed_sets(user)? {
            sources.push(BonusSource::SeriesSet { series });
        }

        // Potions: every row, expired ones included; expiry is the
        // aggregator's call, deletion a maintenance concern.
        for potion in self.potions_of(user)? {
            sources.push(BonusSource::Potion {
                rarity_boost: potion.rarity_boost,
                currency_boost: potion.currency_boost,
                expires_at: potion.expires_at,
            });
        }

        // Selected title, if any
        let title: Option<(String, f64, f64)> = self
            .conn
            .query_row(
                "SELECT t.name, t.rarity_boost, t.currency_boost
                 FROM users u JOIN titles t ON t.id = u.selected_title
                 WHERE u.name = ?1",
                params![user],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(db_err)?;
        if let Some((name, rarity_boost, currency_boost)) = title {
            sources.push(BonusSource::Title {
                name,
                rarity_boost,
                currency_boost,
            });
        }

        Ok(sources)
    }

    fn completed_sets(&self, user: &str) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT series FROM (
                    SELECT c.series AS series,
                           COUNT(*) AS total,
                           SUM(CASE WHEN i.character_id IS NOT NULL THEN 1 ELSE 0 END) AS owned
                    FROM characters c
                    LEFT JOIN inventory i
                        ON i.character_id = c.id AND i.user = ?1
                    GROUP BY c.series
                ) WHERE owned = total ORDER BY series",
            )
            .map_err(db_err)?;
        let series = stmt
            .query_map(params![user], |row| row.get(0))
            .map_err(db_err)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(db_err)?;
        Ok(series)
    }

    fn equip(&self, user: &str, character_id: &str) -> RepoResult<()> {
        let character = self
            .get_character(character_id)?
            .ok_or_else(|| RepoError::NotFound(character_id.to_string()))?;
        if equipment_boost(character.rarity) <= 0.0 {
            return Err(RepoError::NotEquippable(character_id.to_string()));
        }
        if self.count_owned(user, character_id)? == 0 {
            return Err(RepoError::NotOwned(character_id.to_string()));
        }
        let slots: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM equipped WHERE user = ?1",
                params![user],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if slots >= EQUIP_SLOTS as i64 {
            return Err(RepoError::EquipSlotsFull(EQUIP_SLOTS));
        }
        self.conn
            .execute(
                "INSERT OR IGNORE INTO equipped (user, character_id) VALUES (?1, ?2)",
                params![user, character_id],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn unequip(&self, user: &str, character_id: &str) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM equipped WHERE user = ?1 AND character_id = ?2",
                params![user, character_id],
            )
            .map_err(db_err)?;
        Ok(rows > 0)
    }

    fn equipped(&self, user: &str) -> RepoResult<Vec<EquippedEntry>> {
        let sql = format!(
            "SELECT {}, e.equipped_at
             FROM equipped e JOIN characters c ON c.id = e.character_id
             WHERE e.user = ?1 ORDER BY e.equipped_at, e.id",
            CHARACTER_SELECT_COLUMNS
                .split(", ")
                .map(|col| format!("c.{col}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let entries = stmt
            .query_map(params![user], |row| {
                Ok(EquippedEntry {
                    character: row_to_character(row)?,
                    equipped_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(entries)
    }

    fn add_title(&self, name: &str, rarity_boost: f64, currency_boost: f64) -> RepoResult<i64> {
        self.conn
            .execute(
                "INSERT INTO titles (name, rarity_boost, currency_boost) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET
                    rarity_boost = excluded.rarity_boost,
                    currency_boost = excluded.currency_boost",
                params![name, rarity_boost, currency_boost],
            )
            .map_err(db_err)?;
        self.conn
            .query_row(
                "SELECT id FROM titles WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    fn grant_title(&self, user: &str, title: &str) -> RepoResult<()> {
        self.ensure_user(user)?;
        let rows = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO user_titles (user, title_id)
                 SELECT ?1, id FROM titles WHERE name = ?2",
                params![user, title],
            )
            .map_err(db_err)?;
        // Re-granting an already-held title is a no-op, not an error.
        if rows == 0 && !self.titles_of(user)?.iter().any(|t| t.name == title) {
            return Err(RepoError::NotFound(title.to_string()));
        }
        Ok(())
    }

    fn select_title(&self, user: &str, title: &str) -> RepoResult<()> {
        self.ensure_user(user)?;
        let rows = self
            .conn
            .execute(
                "UPDATE users SET selected_title = (
                    SELECT ut.title_id FROM user_titles ut
                    JOIN titles t ON t.id = ut.title_id
                    WHERE ut.user = ?1 AND t.name = ?2
                 )
                 WHERE name = ?1 AND EXISTS (
                    SELECT 1 FROM user_titles ut
                    JOIN titles t ON t.id = ut.title_id
                    WHERE ut.user = ?1 AND t.name = ?2
                 )",
                params![user, title],
            )
            .map_err(db_err)?;
        if rows == 0 {
            return Err(RepoError::NotFound(title.to_string()));
        }
        Ok(())
    }

    fn titles_of(&self, user: &str) -> RepoResult<Vec<TitleDef>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.id, t.name, t.rarity_boost, t.currency_boost
                 FROM user_titles ut JOIN titles t ON t.id = ut.title_id
                 WHERE ut.user = ?1 ORDER BY t.name",
            )
            .map_err(db_err)?;
        let titles = stmt
            .query_map(params![user], |row| {
                Ok(TitleDef {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    rarity_boost: row.get(2)?,
                    currency_boost: row.get(3)?,
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(titles)
    }

    fn add_potion(
        &self,
        user: &str,
        name: &str,
        rarity_boost: f64,
        currency_boost: f64,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.ensure_user(user)?;
        self.conn
            .execute(
                "INSERT INTO potions (user, name, rarity_boost, currency_boost, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user, name, rarity_boost, currency_boost, expires_at],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn potions_of(&self, user: &str) -> RepoResult<Vec<PotionEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, rarity_boost, currency_boost, expires_at
                 FROM potions WHERE user = ?1 ORDER BY expires_at",
            )
            .map_err(db_err)?;
        let potions = stmt
            .query_map(params![user], |row| {
                Ok(PotionEntry {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    rarity_boost: row.get(2)?,
                    currency_boost: row.get(3)?,
                    expires_at: row.get(4)?,
                })
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(potions)
    }

    fn set_hunt(&self, user: &str, character_id: &str) -> RepoResult<()> {
        let Some(character) = self.get_character(character_id)? else {
            return Err(RepoError::NotFound(character_id.to_string()));
        };
        // Craft-only tiers never appear in the roll catalog, so a hunt for
        // one could never resolve.
        if !character.rarity.is_rollable() {
            return Err(RepoError::NotHuntable(character_id.to_string()));
        }
        self.ensure_user(user)?;
        self.conn
            .execute(
                "UPDATE users SET hunt_target = ?2 WHERE name = ?1",
                params![user, character_id],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn clear_hunt(&self, user: &str) -> RepoResult<bool> {
        self.ensure_user(user)?;
        let had_target = self.hunt_target(user)?.is_some();
        self.conn
            .execute(
                "UPDATE users SET hunt_target = NULL WHERE name = ?1",
                params![user],
            )
            .map_err(db_err)?;
        Ok(had_target)
    }

    fn hunt_target(&self, user: &str) -> RepoResult<Option<String>> {
        self.ensure_user(user)?;
        self.conn
            .query_row(
                "SELECT hunt_target FROM users WHERE name = ?1",
                params![user],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    fn record_roll(&self, user: &str, character_id: &str, cost: i64) -> RepoResult<()> {
        self.ensure_user(user)?;
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;

        let debited = tx
            .execute(
                "UPDATE users SET balance = balance - ?2 WHERE name = ?1 AND balance >= ?2",
                params![user, cost],
            )
            .map_err(db_err)?;
        if debited == 0 {
            let available: i64 = tx
                .query_row(
                    "SELECT balance FROM users WHERE name = ?1",
                    params![user],
                    |row| row.get(0),
                )
                .map_err(db_err)?;
            // Dropping the transaction rolls it back.
            return Err(RepoError::InsufficientFunds {
                needed: cost,
                available,
            });
        }

        tx.execute(
            "INSERT INTO inventory (user, character_id, count) VALUES (?1, ?2, 1)
             ON CONFLICT(user, character_id) DO UPDATE SET count = count + 1",
            params![user, character_id],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }

    fn record_sale(
        &self,
        user: &str,
        character_id: &str,
        count: i64,
        payout: i64,
    ) -> RepoResult<()> {
        self.ensure_user(user)?;
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;

        let removed = tx
            .execute(
                "UPDATE inventory SET count = count - ?3
                 WHERE user = ?1 AND character_id = ?2 AND count >= ?3",
                params![user, character_id, count],
            )
            .map_err(db_err)?;
        if removed == 0 {
            return Err(RepoError::NotOwned(character_id.to_string()));
        }

        tx.execute(
            "DELETE FROM inventory WHERE user = ?1 AND character_id = ?2 AND count <= 0",
            params![user, character_id],
        )
        .map_err(db_err)?;

        // Selling the last copy also frees its equip slot.
        tx.execute(
            "DELETE FROM equipped WHERE user = ?1 AND character_id = ?2
             AND NOT EXISTS (
                 SELECT 1 FROM inventory
                 WHERE user = ?1 AND character_id = ?2
             )",
            params![user, character_id],
        )
        .map_err(db_err)?;

        tx.execute(
            "UPDATE users SET balance = balance + ?2 WHERE name = ?1",
            params![user, payout],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }

    fn record_craft(
        &self,
        user: &str,
        consumed_id: &str,
        copies: u32,
        produced_id: &str,
    ) -> RepoResult<()> {
        self.ensure_user(user)?;
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;

        let removed = tx
            .execute(
                "UPDATE inventory SET count = count - ?3
                 WHERE user = ?1 AND character_id = ?2 AND count >= ?3",
                params![user, consumed_id, i64::from(copies)],
            )
            .map_err(db_err)?;
        if removed == 0 {
            return Err(RepoError::NotOwned(consumed_id.to_string()));
        }

        tx.execute(
            "DELETE FROM inventory WHERE user = ?1 AND character_id = ?2 AND count <= 0",
            params![user, consumed_id],
        )
        .map_err(db_err)?;

        tx.execute(
            "DELETE FROM equipped WHERE user = ?1 AND character_id = ?2
             AND NOT EXISTS (
                 SELECT 1 FROM inventory
                 WHERE user = ?1 AND character_id = ?2
             )",
            params![user, consumed_id],
        )
        .map_err(db_err)?;

        tx.execute(
            "INSERT INTO inventory (user, character_id, count) VALUES (?1, ?2, 1)
             ON CONFLICT(user, character_id) DO UPDATE SET count = count + 1",
            params![user, produced_id],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }

    fn claim_daily(&self, user: &str, reward: i64, today: &str) -> RepoResult<bool> {
        self.ensure_user(user)?;
        let rows = self
            .conn
            .execute(
                "UPDATE users SET balance = balance + ?3, last_daily = ?2
                 WHERE name = ?1 AND (last_daily IS NULL OR last_daily < ?2)",
                params![user, today, reward],
            )
            .map_err(db_err)?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowroll::{aggregate, BonusTotals};

    fn seed_catalog(db: &SqliteDb) {
        let characters = [
            Character::new("luffy", "Luffy", "One Piece", Rarity::Common, 50),
            Character::new("zoro", "Zoro", "One Piece", Rarity::Rare, 120),
            Character::new("naruto", "Naruto", "Naruto", Rarity::Common, 50),
            Character::new("madara", "Madara", "Naruto", Rarity::Titan, 900),
            Character::new("aizen", "Aizen", "Bleach", Rarity::Secret, 2500),
            Character::new("ichigo-final", "Ichigo (Final)", "Bleach", Rarity::Evolve, 5000),
        ];
        db.import_catalog(&characters).unwrap();
    }

    fn test_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.init().unwrap();
        seed_catalog(&db);
        db
    }

    #[test]
    fn test_init_is_idempotent() {
        let db = test_db();
        db.init().unwrap();
        let stats = db.stats().unwrap();
        assert_eq!(stats.character_count, 6);
    }

    #[test]
    fn test_catalog_crud() {
        let db = test_db();

        let zoro = db.get_character("zoro").unwrap().unwrap();
        assert_eq!(zoro.rarity, Rarity::Rare);
        assert_eq!(zoro.base_value, 120);

        let filter = CatalogFilter {
            series: Some("One Piece".into()),
            ..Default::default()
        };
        assert_eq!(db.list_characters(&filter).unwrap().len(), 2);

        let titans = db.characters_by_tier(Rarity::Titan).unwrap();
        assert_eq!(titans.len(), 1);
        assert_eq!(titans[0].id, "madara");

        assert!(db.delete_character("aizen").unwrap());
        assert!(!db.delete_character("aizen").unwrap());
        assert!(db.get_character("aizen").unwrap().is_none());
    }

    #[test]
    fn test_import_skips_existing() {
        let db = test_db();
        let batch = [
            Character::new("luffy", "Luffy", "One Piece", Rarity::Common, 50),
            Character::new("sanji", "Sanji", "One Piece", Rarity::Epic, 200),
        ];
        assert_eq!(db.import_catalog(&batch).unwrap(), 1);
    }

    #[test]
    fn test_roll_catalog_excludes_evolve() {
        let db = test_db();
        let catalog = db.roll_catalog().unwrap();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.iter().all(|c| c.rarity != Rarity::Evolve));
    }

    #[test]
    fn test_balance_starts_at_zero() {
        let db = test_db();
        assert_eq!(db.balance("alice").unwrap(), 0);
        assert_eq!(db.credit("alice", 500).unwrap(), 500);
    }

    #[test]
    fn test_record_roll_charges_and_stacks() {
        let db = test_db();
        db.credit("alice", 250).unwrap();

        db.record_roll("alice", "luffy", 100).unwrap();
        db.record_roll("alice", "luffy", 100).unwrap();

        assert_eq!(db.balance("alice").unwrap(), 50);
        assert_eq!(db.count_owned("alice", "luffy").unwrap(), 2);
    }

    #[test]
    fn test_record_roll_insufficient_funds_mutates_nothing() {
        let db = test_db();
        db.credit("bob", 50).unwrap();

        let err = db.record_roll("bob", "luffy", 100).unwrap_err();
        assert!(matches!(
            err,
            RepoError::InsufficientFunds {
                needed: 100,
                available: 50
            }
        ));
        assert_eq!(db.balance("bob").unwrap(), 50);
        assert_eq!(db.count_owned("bob", "luffy").unwrap(), 0);
        assert!(db.inventory_of("bob").unwrap().is_empty());
    }

    #[test]
    fn test_record_sale_decrements_and_credits() {
        let db = test_db();
        db.credit("alice", 200).unwrap();
        db.record_roll("alice", "zoro", 100).unwrap();
        db.record_roll("alice", "zoro", 100).unwrap();

        db.record_sale("alice", "zoro", 1, 120).unwrap();
        assert_eq!(db.count_owned("alice", "zoro").unwrap(), 1);
        assert_eq!(db.balance("alice").unwrap(), 120);

        // Selling more copies than owned fails without mutation
        let err = db.record_sale("alice", "zoro", 5, 600).unwrap_err();
        assert!(matches!(err, RepoError::NotOwned(_)));
        assert_eq!(db.count_owned("alice", "zoro").unwrap(), 1);
        assert_eq!(db.balance("alice").unwrap(), 120);

        // Selling the last copy removes the stack entirely
        db.record_sale("alice", "zoro", 1, 120).unwrap();
        assert_eq!(db.count_owned("alice", "zoro").unwrap(), 0);
        assert!(db.inventory_of("alice").unwrap().is_empty());
    }

    #[test]
    fn test_selling_last_copy_frees_equip_slot() {
        let db = test_db();
        db.credit("alice", 100).unwrap();
        db.record_roll("alice", "madara", 100).unwrap();
        db.equip("alice", "madara").unwrap();
        assert_eq!(db.equipped("alice").unwrap().len(), 1);

        db.record_sale("alice", "madara", 1, 900).unwrap();
        assert!(db.equipped("alice").unwrap().is_empty());
    }

    #[test]
    fn test_equip_rules() {
        let db = test_db();
        db.credit("alice", 1000).unwrap();

        // Not owned yet
        assert!(matches!(
            db.equip("alice", "madara").unwrap_err(),
            RepoError::NotOwned(_)
        ));

        // Common tier is not equippable even when owned
        db.record_roll("alice", "luffy", 100).unwrap();
        assert!(matches!(
            db.equip("alice", "luffy").unwrap_err(),
            RepoError::NotEquippable(_)
        ));

        // Unknown character
        assert!(matches!(
            db.equip("alice", "nobody").unwrap_err(),
            RepoError::NotFound(_)
        ));

        db.record_roll("alice", "madara", 100).unwrap();
        db.equip("alice", "madara").unwrap();
        assert!(db.unequip("alice", "madara").unwrap());
        assert!(!db.unequip("alice", "madara").unwrap());
    }

    #[test]
    fn test_equip_slot_cap() {
        let db = test_db();
        let extras = [
            Character::new("t1", "T1", "X", Rarity::Titan, 1),
            Character::new("t2", "T2", "X", Rarity::Titan, 1),
            Character::new("t3", "T3", "X", Rarity::Titan, 1),
            Character::new("t4", "T4", "X", Rarity::Titan, 1),
        ];
        db.import_catalog(&extras).unwrap();
        db.credit("alice", 400).unwrap();
        for id in ["t1", "t2", "t3", "t4"] {
            db.record_roll("alice", id, 100).unwrap();
        }
        db.equip("alice", "t1").unwrap();
        db.equip("alice", "t2").unwrap();
        db.equip("alice", "t3").unwrap();
        assert!(matches!(
            db.equip("alice", "t4").unwrap_err(),
            RepoError::EquipSlotsFull(3)
        ));
    }

    #[test]
    fn test_completed_sets() {
        let db = test_db();
        db.credit("alice", 300).unwrap();
        db.record_roll("alice", "luffy", 100).unwrap();
        assert!(db.completed_sets("alice").unwrap().is_empty());

        db.record_roll("alice", "zoro", 100).unwrap();
        assert_eq!(db.completed_sets("alice").unwrap(), vec!["One Piece"]);
    }

    #[test]
    fn test_bonus_snapshot_assembles_all_sources() {
        let db = test_db();
        db.credit("alice", 500).unwrap();
        db.record_roll("alice", "luffy", 100).unwrap();
        db.record_roll("alice", "zoro", 100).unwrap(); // completes One Piece
        db.record_roll("alice", "madara", 100).unwrap();
        db.equip("alice", "madara").unwrap();
        db.add_potion("alice", "lucky brew", 5.0, 10.0, 2_000_000_000)
            .unwrap();
        db.add_title("Collector", 1.5, 0.0).unwrap();
        db.grant_title("alice", "Collector").unwrap();
        db.select_title("alice", "Collector").unwrap();

        let snapshot = db.bonus_snapshot("alice").unwrap();
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot
            .iter()
            .any(|s| matches!(s, BonusSource::Equipment { rarity: Rarity::Titan })));
        assert!(snapshot
            .iter()
            .any(|s| matches!(s, BonusSource::SeriesSet { series } if series == "One Piece")));
        assert!(snapshot
            .iter()
            .any(|s| matches!(s, BonusSource::Potion { .. })));
        assert!(snapshot
            .iter()
            .any(|s| matches!(s, BonusSource::Title { name, .. } if name == "Collector")));

        // Feeding the snapshot through the aggregator: 2 + 1 + 5 + 1.5
        let totals: BonusTotals = aggregate(&snapshot, 1_700_000_000);
        assert!((totals.rarity_boost_percent - 9.5).abs() < 1e-9);
        assert!((totals.currency_multiplier - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_expired_potion_row_persists() {
        let db = test_db();
        db.add_potion("alice", "stale brew", 5.0, 0.0, 1).unwrap();
        let potions = db.potions_of("alice").unwrap();
        assert_eq!(potions.len(), 1);

        // The row is in the snapshot; exclusion happens at aggregation.
        let snapshot = db.bonus_snapshot("alice").unwrap();
        let totals = aggregate(&snapshot, 1_700_000_000);
        assert_eq!(totals.rarity_boost_percent, 0.0);
    }

    #[test]
    fn test_title_flow() {
        let db = test_db();
        db.add_title("Veteran", 0.5, 5.0).unwrap();

        // Selecting before the grant fails
        assert!(matches!(
            db.select_title("alice", "Veteran").unwrap_err(),
            RepoError::NotFound(_)
        ));
        // Granting an undefined title fails
        assert!(matches!(
            db.grant_title("alice", "Nobody").unwrap_err(),
            RepoError::NotFound(_)
        ));

        db.grant_title("alice", "Veteran").unwrap();
        db.grant_title("alice", "Veteran").unwrap(); // idempotent
        db.select_title("alice", "Veteran").unwrap();

        let titles = db.titles_of("alice").unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(db.profile("alice").unwrap().selected_title.as_deref(), Some("Veteran"));
    }

    #[test]
    fn test_hunt_target_lifecycle() {
        let db = test_db();
        assert_eq!(db.hunt_target("alice").unwrap(), None);
        assert!(matches!(
            db.set_hunt("alice", "nobody").unwrap_err(),
            RepoError::NotFound(_)
        ));

        db.set_hunt("alice", "aizen").unwrap();
        assert_eq!(db.hunt_target("alice").unwrap().as_deref(), Some("aizen"));
        assert!(db.clear_hunt("alice").unwrap());
        assert!(!db.clear_hunt("alice").unwrap());
    }

    #[test]
    fn test_record_craft_consumes_and_produces() {
        let db = test_db();
        db.credit("alice", 500).unwrap();
        for _ in 0..5 {
            db.record_roll("alice", "luffy", 100).unwrap();
        }
        db.record_craft("alice", "luffy", 5, "zoro").unwrap();
        assert_eq!(db.count_owned("alice", "luffy").unwrap(), 0);
        assert_eq!(db.count_owned("alice", "zoro").unwrap(), 1);

        // Not enough copies fails without consuming anything
        let err = db.record_craft("alice", "zoro", 5, "aizen").unwrap_err();
        assert!(matches!(err, RepoError::NotOwned(_)));
        assert_eq!(db.count_owned("alice", "zoro").unwrap(), 1);
    }

    #[test]
    fn test_claim_daily_once_per_day() {
        let db = test_db();
        assert!(db.claim_daily("alice", 250, "2026-08-29").unwrap());
        assert_eq!(db.balance("alice").unwrap(), 250);

        assert!(!db.claim_daily("alice", 250, "2026-08-29").unwrap());
        assert_eq!(db.balance("alice").unwrap(), 250);

        assert!(db.claim_daily("alice", 300, "2026-08-30").unwrap());
        assert_eq!(db.balance("alice").unwrap(), 550);
    }

    #[test]
    fn test_update_character_overwrites_fields() {
        let db = test_db();
        let mut zoro = db.get_character("zoro").unwrap().unwrap();
        zoro.rarity = Rarity::Epic;
        zoro.base_value = 200;
        assert!(db.update_character(&zoro).unwrap());

        let zoro = db.get_character("zoro").unwrap().unwrap();
        assert_eq!(zoro.rarity, Rarity::Epic);
        assert_eq!(zoro.base_value, 200);

        let ghost = Character::new("nobody", "Nobody", "Nowhere", Rarity::Common, 1);
        assert!(!db.update_character(&ghost).unwrap());
    }

    #[test]
    fn test_debit_requires_funds() {
        let db = test_db();
        db.credit("alice", 150).unwrap();
        assert_eq!(db.debit("alice", 100).unwrap(), 50);

        let err = db.debit("alice", 100).unwrap_err();
        assert!(matches!(
            err,
            RepoError::InsufficientFunds {
                needed: 100,
                available: 50
            }
        ));
        assert_eq!(db.balance("alice").unwrap(), 50);
    }

    #[test]
    fn test_corrupt_rarity_surfaces_as_error() {
        let db = test_db();
        db.conn
            .execute("UPDATE characters SET rarity = 'ultra' WHERE id = 'luffy'", [])
            .unwrap();
        assert!(db.get_character("luffy").is_err());
    }

    #[test]
    fn test_hunt_rejects_craft_only_tier() {
        let db = test_db();
        let err = db.set_hunt("alice", "ichigo-final").unwrap_err();
        assert!(matches!(err, RepoError::NotHuntable(_)));
        assert!(db.hunt_target("alice").unwrap().is_none());
    }

    #[test]
    fn test_inventory_ordered_by_tier() {
        let db = test_db();
        db.credit("alice", 300).unwrap();
        db.record_roll("alice", "luffy", 100).unwrap();
        db.record_roll("alice", "madara", 100).unwrap();
        db.record_roll("alice", "zoro", 100).unwrap();

        let ids: Vec<_> = db
            .inventory_of("alice")
            .unwrap()
            .into_iter()
            .map(|e| e.character.id)
            .collect();
        assert_eq!(ids, ["madara", "zoro", "luffy"]);
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.db");
        {
            let db = SqliteDb::open(&path).unwrap();
            db.init().unwrap();
            db.add_character(&Character::new("rem", "Rem", "Re:Zero", Rarity::Mythic, 400))
                .unwrap();
        }
        let db = SqliteDb::open(&path).unwrap();
        db.init().unwrap();
        assert!(db.get_character("rem").unwrap().is_some());
    }
}
