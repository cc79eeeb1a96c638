pub mod completion;
pub mod diary;
pub mod draft_store;
pub mod inspection;
pub mod persister;

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::checklist::ChecklistWithAnswers;
    use crate::domain::conformance::ConformanceRecordPatch;
    use crate::domain::error::{AppError, Result};
    use crate::infrastructure::db::ConformanceStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake persistence collaborator: records every upsert batch and serves
    /// a canned checklist snapshot.
    #[derive(Default)]
    pub struct RecordingStore {
        fail_upserts: bool,
        snapshot: Mutex<Option<ChecklistWithAnswers>>,
        upserts: Mutex<Vec<Vec<ConformanceRecordPatch>>>,
    }

    impl RecordingStore {
        pub fn failing() -> Self {
            Self {
                fail_upserts: true,
                ..Default::default()
            }
        }

        pub fn with_snapshot(snapshot: ChecklistWithAnswers) -> Self {
            Self {
                snapshot: Mutex::new(Some(snapshot)),
                ..Default::default()
            }
        }

        pub fn failing_with_snapshot(snapshot: ChecklistWithAnswers) -> Self {
            Self {
                fail_upserts: true,
                snapshot: Mutex::new(Some(snapshot)),
                ..Default::default()
            }
        }

        pub fn upsert_calls(&self) -> Vec<Vec<ConformanceRecordPatch>> {
            self.upserts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConformanceStore for RecordingStore {
        async fn upsert_conformance_records(
            &self,
            patches: &[ConformanceRecordPatch],
        ) -> Result<()> {
            self.upserts.lock().unwrap().push(patches.to_vec());
            if self.fail_upserts {
                return Err(AppError::DatabaseError("connection reset".to_string()));
            }
            Ok(())
        }

        async fn fetch_checklist_with_answers(&self, lot_id: &str) -> Result<ChecklistWithAnswers> {
            self.snapshot
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AppError::NotFound(format!("Lot not found: {}", lot_id)))
        }
    }
}
