//! SQLite-based storage for recipes, beans, and brew logs.
//!
//! Also provides a key-value table the CLI uses to persist session
//! state between invocations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::bean::{Bean, RoastLevel};
use crate::brew_log::{BrewLog, NewBrewLog, TasteNote, MAX_SCORE};
use crate::error::{CoreError, DatabaseError, ValidationError};
use crate::recipe::{Equipment, GrindSize, Recipe};
use crate::session::BrewLogSink;

/// Aggregate brewing statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrewStats {
    pub total_brews: u64,
    pub total_brew_secs: u64,
    pub mean_rating: f64,
    pub today_brews: u64,
}

/// SQLite database at `~/.config/brewhub/brewhub.db`.
///
/// Ingesting a brew log is the point where bean stock is decremented --
/// the session engine never touches stock itself.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the default location, creating the file and
    /// schema if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("brewhub.db");
        Self::open_at(path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS recipes (
                id                TEXT PRIMARY KEY,
                title             TEXT NOT NULL,
                equipment         TEXT NOT NULL DEFAULT 'OTHER',
                coffee_grams      REAL NOT NULL,
                total_water_ml    INTEGER NOT NULL,
                water_temperature REAL NOT NULL,
                grind_size        TEXT NOT NULL DEFAULT 'MEDIUM',
                steps             TEXT NOT NULL DEFAULT '[]',
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS beans (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL,
                roaster_name TEXT NOT NULL DEFAULT '',
                origin       TEXT NOT NULL DEFAULT '',
                roast_level  TEXT NOT NULL DEFAULT 'MEDIUM',
                process      TEXT NOT NULL DEFAULT '',
                roast_date   TEXT,
                stock_grams  REAL NOT NULL DEFAULT 0,
                flavor_notes TEXT NOT NULL DEFAULT '[]',
                created_at   TEXT NOT NULL,
                updated_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS brew_logs (
                id              TEXT PRIMARY KEY,
                recipe_id       TEXT NOT NULL,
                bean_id         TEXT,
                brew_date       TEXT NOT NULL,
                actual_duration INTEGER NOT NULL,
                rating          INTEGER NOT NULL,
                taste_notes     TEXT NOT NULL DEFAULT '[]',
                memo            TEXT NOT NULL DEFAULT '',
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_brew_logs_brew_date ON brew_logs(brew_date);
            CREATE INDEX IF NOT EXISTS idx_brew_logs_recipe_id ON brew_logs(recipe_id);",
        )?;
        Ok(())
    }

    // ── Recipes ──────────────────────────────────────────────────────

    pub fn save_recipe(&self, recipe: &Recipe) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO recipes
                 (id, title, equipment, coffee_grams, total_water_ml,
                  water_temperature, grind_size, steps, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                recipe.id,
                recipe.title,
                recipe.equipment.as_str(),
                recipe.coffee_grams,
                recipe.total_water_ml,
                recipe.water_temperature,
                recipe.grind_size.as_str(),
                to_json(&recipe.steps)?,
                recipe.created_at.to_rfc3339(),
                recipe.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_recipes(&self) -> Result<Vec<Recipe>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, equipment, coffee_grams, total_water_ml,
                    water_temperature, grind_size, steps, created_at, updated_at
             FROM recipes ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_recipe)?;
        rows.collect()
    }

    pub fn get_recipe(&self, id: &str) -> Result<Recipe, rusqlite::Error> {
        self.conn.query_row(
            "SELECT id, title, equipment, coffee_grams, total_water_ml,
                    water_temperature, grind_size, steps, created_at, updated_at
             FROM recipes WHERE id = ?1",
            params![id],
            row_to_recipe,
        )
    }

    // ── Beans ────────────────────────────────────────────────────────

    pub fn save_bean(&self, bean: &Bean) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO beans
                 (id, name, roaster_name, origin, roast_level, process,
                  roast_date, stock_grams, flavor_notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                bean.id,
                bean.name,
                bean.roaster_name,
                bean.origin,
                bean.roast_level.as_str(),
                bean.process,
                bean.roast_date.map(|d| d.to_string()),
                bean.stock_grams,
                to_json(&bean.flavor_notes)?,
                bean.created_at.to_rfc3339(),
                bean.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_beans(&self) -> Result<Vec<Bean>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, roaster_name, origin, roast_level, process,
                    roast_date, stock_grams, flavor_notes, created_at, updated_at
             FROM beans ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_bean)?;
        rows.collect()
    }

    pub fn get_bean(&self, id: &str) -> Result<Bean, rusqlite::Error> {
        self.conn.query_row(
            "SELECT id, name, roaster_name, origin, roast_level, process,
                    roast_date, stock_grams, flavor_notes, created_at, updated_at
             FROM beans WHERE id = ?1",
            params![id],
            row_to_bean,
        )
    }

    // ── Brew logs ────────────────────────────────────────────────────

    /// Ingest a finished brew. Inserts the log and, when both a recipe
    /// and a bean are referenced, decrements the bean's stock by the
    /// recipe's coffee dose, floored at zero, in one transaction.
    pub fn create_brew_log(&self, new: NewBrewLog) -> Result<BrewLog, rusqlite::Error> {
        let now = Utc::now();
        let log = BrewLog {
            id: Uuid::new_v4().to_string(),
            recipe_id: new.recipe_id,
            bean_id: new.bean_id,
            brew_date: now,
            actual_duration: new.actual_duration,
            rating: new.rating,
            taste_notes: new.taste_notes,
            memo: new.memo,
            created_at: now,
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO brew_logs
                 (id, recipe_id, bean_id, brew_date, actual_duration,
                  rating, taste_notes, memo, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                log.id,
                log.recipe_id,
                log.bean_id,
                log.brew_date.to_rfc3339(),
                log.actual_duration,
                log.rating,
                to_json(&log.taste_notes)?,
                log.memo,
                log.created_at.to_rfc3339(),
            ],
        )?;
        if let Some(bean_id) = &log.bean_id {
            tx.execute(
                "UPDATE beans
                    SET stock_grams = MAX(stock_grams -
                            (SELECT coffee_grams FROM recipes WHERE id = ?1), 0),
                        updated_at = ?3
                  WHERE id = ?2
                    AND EXISTS (SELECT 1 FROM recipes WHERE id = ?1)",
                params![log.recipe_id, bean_id, now.to_rfc3339()],
            )?;
        }
        tx.commit()?;
        Ok(log)
    }

    pub fn list_brew_logs(&self, limit: Option<u32>) -> Result<Vec<BrewLog>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recipe_id, bean_id, brew_date, actual_duration,
                    rating, taste_notes, memo, created_at
             FROM brew_logs ORDER BY brew_date DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit.map(i64::from).unwrap_or(-1)], row_to_log)?;
        rows.collect()
    }

    /// Update the evaluation fields on an existing log.
    pub fn rate_brew_log(
        &self,
        id: &str,
        rating: u8,
        memo: Option<&str>,
    ) -> Result<(), CoreError> {
        if rating > MAX_SCORE {
            return Err(ValidationError::InvalidValue {
                field: "rating".to_string(),
                message: format!("must be 0..={MAX_SCORE}, got {rating}"),
            }
            .into());
        }
        let changed = match memo {
            Some(memo) => self.conn.execute(
                "UPDATE brew_logs SET rating = ?2, memo = ?3 WHERE id = ?1",
                params![id, rating, memo],
            ),
            None => self.conn.execute(
                "UPDATE brew_logs SET rating = ?2 WHERE id = ?1",
                params![id, rating],
            ),
        }
        .map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("brew log {id}")).into());
        }
        Ok(())
    }

    pub fn brew_stats(&self) -> Result<BrewStats, rusqlite::Error> {
        let (total_brews, total_brew_secs, mean_rating) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(actual_duration), 0), COALESCE(AVG(rating), 0)
             FROM brew_logs",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            },
        )?;
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let today_brews = self.conn.query_row(
            "SELECT COUNT(*) FROM brew_logs WHERE brew_date >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(BrewStats {
            total_brews,
            total_brew_secs,
            mean_rating,
            today_brews,
        })
    }

    // ── Key-value ────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        rows.next().transpose()
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl BrewLogSink for Database {
    fn create(&self, log: NewBrewLog) -> Result<BrewLog, CoreError> {
        self.create_brew_log(log).map_err(DatabaseError::from).map_err(Into::into)
    }
}

// ── Row mapping ──────────────────────────────────────────────────────

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, rusqlite::Error> {
    serde_json::to_string(value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn parse_ts(idx: usize, s: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_recipe(row: &Row<'_>) -> Result<Recipe, rusqlite::Error> {
    let steps: String = row.get(7)?;
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        equipment: Equipment::parse(&row.get::<_, String>(2)?),
        coffee_grams: row.get(3)?,
        total_water_ml: row.get(4)?,
        water_temperature: row.get(5)?,
        grind_size: GrindSize::parse(&row.get::<_, String>(6)?),
        steps: serde_json::from_str(&steps).unwrap_or_default(),
        created_at: parse_ts(8, row.get(8)?)?,
        updated_at: parse_ts(9, row.get(9)?)?,
    })
}

fn row_to_bean(row: &Row<'_>) -> Result<Bean, rusqlite::Error> {
    let flavor_notes: String = row.get(8)?;
    Ok(Bean {
        id: row.get(0)?,
        name: row.get(1)?,
        roaster_name: row.get(2)?,
        origin: row.get(3)?,
        roast_level: RoastLevel::parse(&row.get::<_, String>(4)?),
        process: row.get(5)?,
        roast_date: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        stock_grams: row.get(7)?,
        flavor_notes: serde_json::from_str(&flavor_notes).unwrap_or_default(),
        created_at: parse_ts(9, row.get(9)?)?,
        updated_at: parse_ts(10, row.get(10)?)?,
    })
}

fn row_to_log(row: &Row<'_>) -> Result<BrewLog, rusqlite::Error> {
    let taste_notes: String = row.get(6)?;
    let taste_notes: Vec<TasteNote> = serde_json::from_str(&taste_notes).unwrap_or_default();
    Ok(BrewLog {
        id: row.get(0)?,
        recipe_id: row.get(1)?,
        bean_id: row.get(2)?,
        brew_date: parse_ts(3, row.get(3)?)?,
        actual_duration: row.get(4)?,
        rating: row.get(5)?,
        taste_notes,
        memo: row.get(7)?,
        created_at: parse_ts(8, row.get(8)?)?,
    })
}
