use crate::domain::diary::{DiaryEntry, DiaryEntryInput};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::diary::DiaryRepository;
use crate::infrastructure::db::lots::LotRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Daily site-diary entry: weather, labour, plant and events for one lot on
/// one calendar day. Saving twice on the same day overwrites the day's entry.
pub struct DiaryUseCase {
    diary: Arc<DiaryRepository>,
    lots: Arc<LotRepository>,
}

impl DiaryUseCase {
    pub fn new(diary: Arc<DiaryRepository>, lots: Arc<LotRepository>) -> Self {
        Self { diary, lots }
    }

    pub async fn save_entry(&self, input: DiaryEntryInput) -> Result<DiaryEntry> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // The regex only checks shape; reject dates like 2024-13-40 here.
        chrono::NaiveDate::parse_from_str(&input.entry_date, "%Y-%m-%d").map_err(|_| {
            AppError::ValidationError(format!("Not a calendar date: {}", input.entry_date))
        })?;

        // Diary entries must belong to a real lot.
        self.lots.get_lot(&input.lot_id).await?;

        let entry = self.diary.upsert_entry(&input).await?;
        info!(lot_id = %entry.lot_id, entry_date = %entry.entry_date, "Saved diary entry");
        Ok(entry)
    }

    pub async fn get_entry(&self, lot_id: &str, entry_date: &str) -> Result<DiaryEntry> {
        self.diary.get_entry(lot_id, entry_date).await
    }

    pub async fn list_entries(&self, lot_id: &str) -> Result<Vec<DiaryEntry>> {
        self.diary.list_for_lot(lot_id).await
    }
}
