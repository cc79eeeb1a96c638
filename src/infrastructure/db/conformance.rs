use crate::domain::checklist::{ChecklistItem, ChecklistWithAnswers, ItemType};
use crate::domain::conformance::{
    AnswerValue, ConformanceRecord, ConformanceRecordPatch, PassFailValue,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::ConformanceStore;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

pub struct ConformanceRepository {
    pool: SqlitePool,
}

impl ConformanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_items(&self, template_id: &str) -> Result<Vec<ChecklistItem>> {
        let items = sqlx::query_as::<_, ItpItemEntity>(
            "SELECT id, itp_template_id, description, item_type, order_index, acceptance_criteria
             FROM itp_items WHERE itp_template_id = ? ORDER BY order_index",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch checklist items: {e}")))?;

        items.into_iter().map(ChecklistItem::try_from).collect()
    }

    async fn fetch_answers(&self, lot_id: &str) -> Result<Vec<ConformanceRecord>> {
        let answers = sqlx::query_as::<_, ConformanceRecordEntity>(
            "SELECT id, lot_id, itp_item_id, pass_fail_value, text_value, numeric_value, comment, completed_by, updated_at
             FROM conformance_records WHERE lot_id = ?",
        )
        .bind(lot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch conformance records: {e}")))?;

        answers.into_iter().map(ConformanceRecord::try_from).collect()
    }
}

#[async_trait]
impl ConformanceStore for ConformanceRepository {
    async fn upsert_conformance_records(&self, patches: &[ConformanceRecordPatch]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {e}")))?;

        for patch in patches {
            let (pass_fail_value, text_value, numeric_value) = split_answer(&patch.answer);

            sqlx::query(
                "INSERT INTO conformance_records
                    (id, lot_id, itp_item_id, pass_fail_value, text_value, numeric_value, comment, completed_by, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(lot_id, itp_item_id) DO UPDATE SET
                    pass_fail_value = excluded.pass_fail_value,
                    text_value = excluded.text_value,
                    numeric_value = excluded.numeric_value,
                    comment = excluded.comment,
                    completed_by = excluded.completed_by,
                    updated_at = excluded.updated_at",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&patch.lot_id)
            .bind(&patch.itp_item_id)
            .bind(pass_fail_value)
            .bind(text_value)
            .bind(numeric_value)
            .bind(&patch.comment)
            .bind(&patch.completed_by)
            .bind(patch.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to upsert conformance record: {e}"))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit upsert batch: {e}")))
    }

    async fn fetch_checklist_with_answers(&self, lot_id: &str) -> Result<ChecklistWithAnswers> {
        let template_id = sqlx::query_scalar::<_, Option<String>>(
            "SELECT itp_template_id FROM lots WHERE id = ?",
        )
        .bind(lot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch lot: {e}")))?
        .ok_or_else(|| AppError::NotFound(format!("Lot not found: {}", lot_id)))?;

        // A lot with no ITP assigned has nothing to inspect yet.
        let items = match template_id {
            Some(template_id) => self.fetch_items(&template_id).await?,
            None => Vec::new(),
        };
        let answers = self.fetch_answers(lot_id).await?;

        Ok(ChecklistWithAnswers { items, answers })
    }
}

fn split_answer(answer: &Option<AnswerValue>) -> (Option<&'static str>, Option<String>, Option<f64>) {
    match answer {
        Some(AnswerValue::PassFail(value)) => (Some(value.as_str()), None, None),
        Some(AnswerValue::Text(value)) => (None, Some(value.clone()), None),
        Some(AnswerValue::Numeric(value)) => (None, None, Some(*value)),
        None => (None, None, None),
    }
}

#[derive(sqlx::FromRow)]
struct ItpItemEntity {
    id: String,
    itp_template_id: String,
    description: String,
    item_type: String,
    order_index: i64,
    acceptance_criteria: Option<String>,
}

impl TryFrom<ItpItemEntity> for ChecklistItem {
    type Error = AppError;

    fn try_from(entity: ItpItemEntity) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            itp_template_id: entity.itp_template_id,
            description: entity.description,
            item_type: ItemType::parse(&entity.item_type)?,
            order_index: entity.order_index,
            acceptance_criteria: entity.acceptance_criteria,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ConformanceRecordEntity {
    id: String,
    lot_id: String,
    itp_item_id: String,
    pass_fail_value: Option<String>,
    text_value: Option<String>,
    numeric_value: Option<f64>,
    comment: Option<String>,
    completed_by: Option<String>,
    updated_at: i64,
}

impl TryFrom<ConformanceRecordEntity> for ConformanceRecord {
    type Error = AppError;

    fn try_from(entity: ConformanceRecordEntity) -> Result<Self> {
        let answer = match (&entity.pass_fail_value, &entity.text_value, entity.numeric_value) {
            (Some(value), _, _) => Some(AnswerValue::PassFail(PassFailValue::parse(value)?)),
            (None, Some(value), _) => Some(AnswerValue::Text(value.clone())),
            (None, None, Some(value)) => Some(AnswerValue::Numeric(value)),
            (None, None, None) => None,
        };

        Ok(Self {
            id: entity.id,
            lot_id: entity.lot_id,
            itp_item_id: entity.itp_item_id,
            answer,
            comment: entity.comment,
            completed_by: entity.completed_by,
            updated_at: entity.updated_at,
        })
    }
}
