use crate::domain::diary::{DiaryEntry, DiaryEntryInput};
use crate::domain::error::{AppError, Result};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

pub struct DiaryRepository {
    pool: SqlitePool,
}

impl DiaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One entry per lot per day: the second save of a day overwrites the
    /// first via ON CONFLICT(lot_id, entry_date).
    pub async fn upsert_entry(&self, input: &DiaryEntryInput) -> Result<DiaryEntry> {
        let updated_at = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            "INSERT INTO diary_entries
                (id, lot_id, entry_date, weather, temperature_celsius, labour_count, plant_notes, events, created_by, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(lot_id, entry_date) DO UPDATE SET
                weather = excluded.weather,
                temperature_celsius = excluded.temperature_celsius,
                labour_count = excluded.labour_count,
                plant_notes = excluded.plant_notes,
                events = excluded.events,
                created_by = excluded.created_by,
                updated_at = excluded.updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.lot_id)
        .bind(&input.entry_date)
        .bind(&input.weather)
        .bind(input.temperature_celsius)
        .bind(input.labour_count)
        .bind(&input.plant_notes)
        .bind(&input.events)
        .bind(&input.created_by)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to upsert diary entry: {e}")))?;

        self.get_entry(&input.lot_id, &input.entry_date).await
    }

    pub async fn get_entry(&self, lot_id: &str, entry_date: &str) -> Result<DiaryEntry> {
        let entry = sqlx::query_as::<_, DiaryEntryEntity>(
            "SELECT id, lot_id, entry_date, weather, temperature_celsius, labour_count, plant_notes, events, created_by, updated_at
             FROM diary_entries WHERE lot_id = ? AND entry_date = ?",
        )
        .bind(lot_id)
        .bind(entry_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch diary entry: {e}")))?;

        match entry {
            Some(entry) => Ok(entry.into()),
            None => Err(AppError::NotFound(format!(
                "Diary entry not found for lot {} on {}",
                lot_id, entry_date
            ))),
        }
    }

    pub async fn list_for_lot(&self, lot_id: &str) -> Result<Vec<DiaryEntry>> {
        let entries = sqlx::query_as::<_, DiaryEntryEntity>(
            "SELECT id, lot_id, entry_date, weather, temperature_celsius, labour_count, plant_notes, events, created_by, updated_at
             FROM diary_entries WHERE lot_id = ? ORDER BY entry_date DESC",
        )
        .bind(lot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list diary entries: {e}")))?;

        Ok(entries.into_iter().map(|entry| entry.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct DiaryEntryEntity {
    id: String,
    lot_id: String,
    entry_date: String,
    weather: Option<String>,
    temperature_celsius: Option<f64>,
    labour_count: Option<i64>,
    plant_notes: Option<String>,
    events: Option<String>,
    created_by: Option<String>,
    updated_at: i64,
}

impl From<DiaryEntryEntity> for DiaryEntry {
    fn from(entity: DiaryEntryEntity) -> Self {
        Self {
            id: entity.id,
            lot_id: entity.lot_id,
            entry_date: entity.entry_date,
            weather: entity.weather,
            temperature_celsius: entity.temperature_celsius,
            labour_count: entity.labour_count,
            plant_notes: entity.plant_notes,
            events: entity.events,
            created_by: entity.created_by,
            updated_at: entity.updated_at,
        }
    }
}
