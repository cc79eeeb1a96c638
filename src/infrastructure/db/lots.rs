use crate::domain::error::{AppError, Result};
use crate::domain::lot::{Lot, LotStatus};
use sqlx::sqlite::SqlitePool;

pub struct LotRepository {
    pool: SqlitePool,
}

impl LotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_lot(&self, lot: &Lot) -> Result<()> {
        sqlx::query(
            "INSERT INTO lots (id, project_id, name, description, status, itp_template_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&lot.id)
        .bind(&lot.project_id)
        .bind(&lot.name)
        .bind(&lot.description)
        .bind(lot.status.as_str())
        .bind(&lot.itp_template_id)
        .bind(lot.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert lot: {e}")))?;

        Ok(())
    }

    pub async fn get_lot(&self, lot_id: &str) -> Result<Lot> {
        let lot = sqlx::query_as::<_, LotEntity>(
            "SELECT id, project_id, name, description, status, itp_template_id, created_at
             FROM lots WHERE id = ?",
        )
        .bind(lot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch lot: {e}")))?;

        match lot {
            Some(lot) => Lot::try_from(lot),
            None => Err(AppError::NotFound(format!("Lot not found: {}", lot_id))),
        }
    }

    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<Lot>> {
        let lots = sqlx::query_as::<_, LotEntity>(
            "SELECT id, project_id, name, description, status, itp_template_id, created_at
             FROM lots WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list lots: {e}")))?;

        lots.into_iter().map(Lot::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct LotEntity {
    id: String,
    project_id: String,
    name: String,
    description: Option<String>,
    status: String,
    itp_template_id: Option<String>,
    created_at: i64,
}

impl TryFrom<LotEntity> for Lot {
    type Error = AppError;

    fn try_from(entity: LotEntity) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            project_id: entity.project_id,
            name: entity.name,
            description: entity.description,
            status: LotStatus::parse(&entity.status)?,
            itp_template_id: entity.itp_template_id,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::testing::memory_pool;

    fn lot(id: &str, created_at: i64) -> Lot {
        Lot {
            id: id.to_string(),
            project_id: "project-1".to_string(),
            name: format!("Lot {}", id),
            description: None,
            status: LotStatus::InProgress,
            itp_template_id: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_round_trip() {
        let pool = memory_pool().await;
        let repo = LotRepository::new(pool);

        repo.insert_lot(&lot("lot-1", 10)).await.unwrap();

        let fetched = repo.get_lot("lot-1").await.unwrap();
        assert_eq!(fetched.name, "Lot lot-1");
        assert_eq!(fetched.status, LotStatus::InProgress);
    }

    #[tokio::test]
    async fn missing_lot_is_not_found() {
        let pool = memory_pool().await;
        let repo = LotRepository::new(pool);

        let err = repo.get_lot("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn project_lots_list_newest_first() {
        let pool = memory_pool().await;
        let repo = LotRepository::new(pool);

        repo.insert_lot(&lot("lot-1", 10)).await.unwrap();
        repo.insert_lot(&lot("lot-2", 20)).await.unwrap();

        let lots = repo.list_for_project("project-1").await.unwrap();
        let ids: Vec<&str> = lots.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["lot-2", "lot-1"]);
    }
}
