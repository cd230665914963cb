//! Shared constants and query building for database implementations.

use crate::types::CatalogFilter;

/// Column list for character SELECTs.
/// Order must match the positional indices in the row mapper.
pub const CHARACTER_SELECT_COLUMNS: &str = "id, name, series, rarity, base_value, image_ref";

/// SQLite schema definitions
pub mod schema {
    /// Character catalog
    pub const CHARACTERS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS characters (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            series TEXT NOT NULL,
            rarity TEXT NOT NULL,
            base_value INTEGER NOT NULL DEFAULT 0,
            image_ref TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    /// User rows: balance plus bonus-state pointers
    pub const USERS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS users (
            name TEXT PRIMARY KEY NOT NULL,
            balance INTEGER NOT NULL DEFAULT 0,
            selected_title INTEGER REFERENCES titles(id),
            hunt_target TEXT REFERENCES characters(id),
            last_daily TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    /// Inventory stacks, one row per (user, character)
    pub const INVENTORY_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
            count INTEGER NOT NULL DEFAULT 1,
            acquired_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user, character_id)
        )
    "#;

    /// Equipped characters (bonus slots)
    pub const EQUIPPED_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS equipped (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
            equipped_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user, character_id)
        )
    "#;

    /// Potion effects; expired rows persist and are filtered at read time
    pub const POTIONS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS potions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            name TEXT NOT NULL,
            rarity_boost REAL NOT NULL DEFAULT 0,
            currency_boost REAL NOT NULL DEFAULT 0,
            expires_at INTEGER NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    /// Title definitions
    pub const TITLES_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS titles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            rarity_boost REAL NOT NULL DEFAULT 0,
            currency_boost REAL NOT NULL DEFAULT 0
        )
    "#;

    /// Titles granted per user
    pub const USER_TITLES_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS user_titles (
            user TEXT NOT NULL,
            title_id INTEGER NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
            granted_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user, title_id)
        )
    "#;

    /// Indexes created after migrations
    pub const INDEXES: &str = r#"
        CREATE INDEX IF NOT EXISTS idx_characters_series ON characters(series);
        CREATE INDEX IF NOT EXISTS idx_characters_rarity ON characters(rarity);
        CREATE INDEX IF NOT EXISTS idx_inventory_user ON inventory(user);
        CREATE INDEX IF NOT EXISTS idx_equipped_user ON equipped(user);
        CREATE INDEX IF NOT EXISTS idx_potions_user ON potions(user);
    "#;
}

/// Build the catalog list query. Returns the SQL and the number of bound
/// parameters (filters bind in declaration order: series, rarity).
pub fn build_list_query(filter: &CatalogFilter) -> (String, usize) {
    let mut sql = format!(
        "SELECT {} FROM characters",
        CHARACTER_SELECT_COLUMNS
    );
    let mut clauses = Vec::new();
    let mut param_count = 0;

    if filter.series.is_some() {
        param_count += 1;
        clauses.push(format!("series = ?{param_count}"));
    }
    if filter.rarity.is_some() {
        param_count += 1;
        clauses.push(format!("rarity = ?{param_count}"));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY series, name");

    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
        if let Some(offset) = filter.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    (sql, param_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_list_query_no_filter() {
        let (sql, n) = build_list_query(&CatalogFilter::default());
        assert!(!sql.contains("WHERE"));
        assert_eq!(n, 0);
    }

    #[test]
    fn test_build_list_query_filters_and_paging() {
        let filter = CatalogFilter {
            series: Some("Naruto".into()),
            rarity: Some("mythic".into()),
            limit: Some(10),
            offset: Some(20),
        };
        let (sql, n) = build_list_query(&filter);
        assert!(sql.contains("series = ?1"));
        assert!(sql.contains("rarity = ?2"));
        assert!(sql.contains("LIMIT 10 OFFSET 20"));
        assert_eq!(n, 2);
    }
}
