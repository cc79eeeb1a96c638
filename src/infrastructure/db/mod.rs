pub mod connection;
pub mod conformance;
pub mod diary;
pub mod lots;

use crate::domain::checklist::ChecklistWithAnswers;
use crate::domain::conformance::ConformanceRecordPatch;
use crate::domain::error::Result;
use async_trait::async_trait;

/// Persistence collaborator for the inspection workflow. The workflow takes
/// this as an injected handle rather than reaching for a shared client, so
/// tests can swap in a recording fake.
#[async_trait]
pub trait ConformanceStore: Send + Sync {
    /// Insert-or-update on the natural key (lot_id, itp_item_id); the whole
    /// batch goes through one transaction and is idempotent under retry with
    /// an identical payload.
    async fn upsert_conformance_records(&self, patches: &[ConformanceRecordPatch]) -> Result<()>;

    /// Read path used once at view load to seed the draft store.
    async fn fetch_checklist_with_answers(&self, lot_id: &str) -> Result<ChecklistWithAnswers>;
}
