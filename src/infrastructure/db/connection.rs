use crate::domain::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

pub async fn connect_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {e}")))?
        .create_if_missing(true);

    SqlitePool::connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))
}

/// Applies the schema additively; safe to run on every startup.
pub async fn init_db(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS itp_templates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            created_at INTEGER NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS itp_items (
            id TEXT PRIMARY KEY,
            itp_template_id TEXT NOT NULL REFERENCES itp_templates(id),
            description TEXT NOT NULL,
            item_type TEXT NOT NULL,
            order_index INTEGER NOT NULL,
            acceptance_criteria TEXT
        )",
        "CREATE TABLE IF NOT EXISTS lots (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'IN_PROGRESS',
            itp_template_id TEXT REFERENCES itp_templates(id),
            created_at INTEGER NOT NULL
        )",
        // One answer per (lot, item); the upsert path depends on this key.
        "CREATE TABLE IF NOT EXISTS conformance_records (
            id TEXT PRIMARY KEY,
            lot_id TEXT NOT NULL REFERENCES lots(id),
            itp_item_id TEXT NOT NULL REFERENCES itp_items(id),
            pass_fail_value TEXT,
            text_value TEXT,
            numeric_value REAL,
            comment TEXT,
            completed_by TEXT,
            updated_at INTEGER NOT NULL,
            UNIQUE(lot_id, itp_item_id)
        )",
        "CREATE TABLE IF NOT EXISTS diary_entries (
            id TEXT PRIMARY KEY,
            lot_id TEXT NOT NULL REFERENCES lots(id),
            entry_date TEXT NOT NULL,
            weather TEXT,
            temperature_celsius REAL,
            labour_count INTEGER,
            plant_notes TEXT,
            events TEXT,
            created_by TEXT,
            updated_at INTEGER NOT NULL,
            UNIQUE(lot_id, entry_date)
        )",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to apply schema: {e}")))?;
    }

    Ok(())
}
