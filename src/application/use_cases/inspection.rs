use crate::application::use_cases::completion::completion_percent;
use crate::application::use_cases::draft_store::{DraftEdit, DraftStore, SaveState};
use crate::application::use_cases::persister::DebouncedPersister;
use crate::domain::checklist::ChecklistItem;
use crate::domain::conformance::ConformanceRecordPatch;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::ConformanceStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// One inspector working through one lot's checklist. Holds the draft store
/// seeded at load, an injected persistence handle, and the debounced
/// persister that trails every edit.
pub struct InspectionSession {
    lot_id: String,
    items: Arc<Vec<ChecklistItem>>,
    drafts: Arc<Mutex<DraftStore>>,
    store: Arc<dyn ConformanceStore>,
    persister: DebouncedPersister,
}

impl InspectionSession {
    /// Fetches the lot's checklist and persisted answers, seeds the draft
    /// store, and starts with every draft Clean.
    pub async fn load(
        store: Arc<dyn ConformanceStore>,
        lot_id: &str,
        quiet_period: Duration,
    ) -> Result<Self> {
        let snapshot = store.fetch_checklist_with_answers(lot_id).await?;

        let mut items = snapshot.items;
        items.sort_by_key(|item| item.order_index);
        let items = Arc::new(items);

        let mut drafts = DraftStore::new();
        drafts.seed(&snapshot.answers);
        let drafts = Arc::new(Mutex::new(drafts));

        info!(
            lot_id = %lot_id,
            items = items.len(),
            answers = snapshot.answers.len(),
            "Loaded inspection checklist"
        );

        let persister = DebouncedPersister::new(
            lot_id.to_string(),
            Arc::clone(&items),
            Arc::clone(&drafts),
            Arc::clone(&store),
            quiet_period,
        );

        Ok(Self {
            lot_id: lot_id.to_string(),
            items,
            drafts,
            store,
            persister,
        })
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Merges a partial edit into the item's draft and schedules a debounced
    /// flush. Unknown item ids are rejected so no record can reference an
    /// item outside the lot's checklist.
    pub fn set_answer(&self, item_id: &str, edit: DraftEdit) -> Result<()> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return Err(AppError::NotFound(format!(
                "Checklist item not in this lot's ITP: {}",
                item_id
            )));
        }

        self.drafts.lock().unwrap().set(item_id, edit);
        self.persister.schedule_flush(item_id);
        Ok(())
    }

    pub fn save_state(&self, item_id: &str) -> SaveState {
        self.drafts.lock().unwrap().state(item_id)
    }

    /// "Save Progress": gathers the latest merged value for every item,
    /// drops the empty ones, and submits the rest as one batch upsert. The
    /// only path with user-visible confirmation and the only one safe to
    /// rely on before navigating away. Returns the number of items saved;
    /// on failure drafts are kept so the inspector can retry as-is.
    pub async fn save_progress(&self) -> Result<usize> {
        let patches: Vec<ConformanceRecordPatch> = {
            let mut guard = self.drafts.lock().unwrap();

            for item in self.items.iter() {
                if let Some(draft) = guard.get(&item.id) {
                    if draft.has_invalid_numeric(item.item_type) {
                        return Err(AppError::ValidationError(format!(
                            "\"{}\" has a value that is not a number",
                            item.description
                        )));
                    }
                }
            }

            let patches: Vec<ConformanceRecordPatch> = self
                .items
                .iter()
                .filter_map(|item| {
                    guard
                        .get(&item.id)
                        .map(|draft| draft.to_patch(&self.lot_id, item))
                })
                .filter(|patch| !patch.is_empty())
                .collect();

            for patch in &patches {
                guard.mark_flushing(&patch.itp_item_id);
            }
            patches
        };

        if patches.is_empty() {
            return Ok(0);
        }

        match self.store.upsert_conformance_records(&patches).await {
            Ok(()) => {
                let mut guard = self.drafts.lock().unwrap();
                for patch in &patches {
                    if guard.state(&patch.itp_item_id) == SaveState::Flushing {
                        guard.mark_clean(&patch.itp_item_id);
                    }
                }
                info!(lot_id = %self.lot_id, saved = patches.len(), "Saved inspection progress");
                Ok(patches.len())
            }
            Err(e) => {
                let mut guard = self.drafts.lock().unwrap();
                for patch in &patches {
                    if guard.state(&patch.itp_item_id) == SaveState::Flushing {
                        guard.mark_dirty(&patch.itp_item_id);
                    }
                }
                Err(e)
            }
        }
    }

    pub fn completion_percent(&self) -> u8 {
        let guard = self.drafts.lock().unwrap();
        completion_percent(&self.items, &guard)
    }

    /// Leaving the view: cancel pending debounce timers without flushing.
    pub fn close(&self) {
        self.persister.cancel_all();
    }
}
