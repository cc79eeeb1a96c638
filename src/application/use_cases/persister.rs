use crate::application::use_cases::draft_store::{DraftStore, SaveState};
use crate::domain::checklist::ChecklistItem;
use crate::domain::error::Result;
use crate::infrastructure::db::ConformanceStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1500);

/// Watches draft mutations and flushes each item after a quiet period with no
/// further edits to it. One cancellable timer per item: rescheduling aborts
/// the pending timer, so rapid edits coalesce into a single upsert carrying
/// the latest merged draft. Flush failures are logged and the draft stays
/// Dirty for the next edit-triggered debounce or a manual flush; there is no
/// retry loop of its own.
pub struct DebouncedPersister {
    lot_id: String,
    items: Arc<Vec<ChecklistItem>>,
    drafts: Arc<Mutex<DraftStore>>,
    store: Arc<dyn ConformanceStore>,
    quiet_period: Duration,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl DebouncedPersister {
    pub fn new(
        lot_id: String,
        items: Arc<Vec<ChecklistItem>>,
        drafts: Arc<Mutex<DraftStore>>,
        store: Arc<dyn ConformanceStore>,
        quiet_period: Duration,
    ) -> Self {
        Self {
            lot_id,
            items,
            drafts,
            store,
            quiet_period,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Resets the per-item timer. Called after every draft mutation.
    pub fn schedule_flush(&self, item_id: &str) {
        let lot_id = self.lot_id.clone();
        let items = Arc::clone(&self.items);
        let drafts = Arc::clone(&self.drafts);
        let store = Arc::clone(&self.store);
        let quiet_period = self.quiet_period;
        let id = item_id.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if let Err(e) = flush_item(&lot_id, &id, &items, &drafts, store.as_ref()).await {
                warn!(error = %e, item_id = %id, "Debounced flush failed; draft kept for retry");
            }
        });

        let mut timers = self.timers.lock().unwrap();
        if let Some(previous) = timers.insert(item_id.to_string(), handle) {
            previous.abort();
        }
    }

    /// View unmount: drop all pending timers without flushing. Unsaved edits
    /// are lost, which is the accepted behavior for navigation.
    pub fn cancel_all(&self) {
        let mut timers = self.timers.lock().unwrap();
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }

    pub fn pending_count(&self) -> usize {
        let timers = self.timers.lock().unwrap();
        timers.values().filter(|handle| !handle.is_finished()).count()
    }
}

impl Drop for DebouncedPersister {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn flush_item(
    lot_id: &str,
    item_id: &str,
    items: &[ChecklistItem],
    drafts: &Mutex<DraftStore>,
    store: &dyn ConformanceStore,
) -> Result<()> {
    let Some(item) = items.iter().find(|item| item.id == item_id) else {
        return Ok(());
    };

    let patch = {
        let mut guard = drafts.lock().unwrap();
        let Some(draft) = guard.get(item_id) else {
            return Ok(());
        };
        if draft.state != SaveState::Dirty {
            return Ok(());
        }
        // A dirty NUMERIC draft that does not parse is held back; manual
        // flush surfaces it to the inspector.
        if draft.has_invalid_numeric(item.item_type) {
            return Ok(());
        }
        let patch = draft.to_patch(lot_id, item);
        if patch.is_empty() {
            // Nothing worth a row; do not create empty records.
            guard.mark_clean(item_id);
            return Ok(());
        }
        guard.mark_flushing(item_id);
        patch
    };

    match store.upsert_conformance_records(std::slice::from_ref(&patch)).await {
        Ok(()) => {
            let mut guard = drafts.lock().unwrap();
            // An edit that landed while the upsert was in flight re-dirtied
            // the draft; leave it for the timer that edit scheduled.
            if guard.state(item_id) == SaveState::Flushing {
                guard.mark_clean(item_id);
            }
            Ok(())
        }
        Err(e) => {
            let mut guard = drafts.lock().unwrap();
            if guard.state(item_id) == SaveState::Flushing {
                guard.mark_dirty(item_id);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::draft_store::DraftEdit;
    use crate::application::use_cases::testing::RecordingStore;
    use crate::domain::checklist::ItemType;
    use crate::domain::conformance::{AnswerValue, PassFailValue};

    fn checklist() -> Arc<Vec<ChecklistItem>> {
        Arc::new(vec![
            ChecklistItem {
                id: "item-1".to_string(),
                itp_template_id: "tpl-1".to_string(),
                description: "Formwork alignment".to_string(),
                item_type: ItemType::PassFail,
                order_index: 1,
                acceptance_criteria: None,
            },
            ChecklistItem {
                id: "item-2".to_string(),
                itp_template_id: "tpl-1".to_string(),
                description: "Concrete temperature".to_string(),
                item_type: ItemType::Numeric,
                order_index: 2,
                acceptance_criteria: Some("5-35 degrees C".to_string()),
            },
        ])
    }

    fn persister(
        store: Arc<RecordingStore>,
        drafts: Arc<Mutex<DraftStore>>,
    ) -> DebouncedPersister {
        DebouncedPersister::new(
            "lot-1".to_string(),
            checklist(),
            drafts,
            store,
            Duration::from_millis(1500),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn two_schedules_within_window_flush_once_with_latest_value() {
        let store = Arc::new(RecordingStore::default());
        let drafts = Arc::new(Mutex::new(DraftStore::new()));
        let persister = persister(Arc::clone(&store), Arc::clone(&drafts));

        drafts.lock().unwrap().set(
            "item-1",
            DraftEdit {
                pass_fail_value: Some(PassFailValue::Fail),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-1");

        tokio::time::sleep(Duration::from_millis(500)).await;

        drafts.lock().unwrap().set(
            "item-1",
            DraftEdit {
                pass_fail_value: Some(PassFailValue::Pass),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-1");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let calls = store.upsert_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(
            calls[0][0].answer,
            Some(AnswerValue::PassFail(PassFailValue::Pass))
        );
        assert_eq!(drafts.lock().unwrap().state("item-1"), SaveState::Clean);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_draft_never_reaches_the_store() {
        let store = Arc::new(RecordingStore::default());
        let drafts = Arc::new(Mutex::new(DraftStore::new()));
        let persister = persister(Arc::clone(&store), Arc::clone(&drafts));

        drafts.lock().unwrap().set(
            "item-2",
            DraftEdit {
                numeric_value: Some("  ".to_string()),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-2");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert!(store.upsert_calls().is_empty());
        assert_eq!(drafts.lock().unwrap().state("item-2"), SaveState::Clean);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_flush_leaves_draft_dirty_for_retry() {
        let store = Arc::new(RecordingStore::failing());
        let drafts = Arc::new(Mutex::new(DraftStore::new()));
        let persister = persister(Arc::clone(&store), Arc::clone(&drafts));

        drafts.lock().unwrap().set(
            "item-1",
            DraftEdit {
                pass_fail_value: Some(PassFailValue::Pass),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-1");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(store.upsert_calls().len(), 1);
        assert_eq!(drafts.lock().unwrap().state("item-1"), SaveState::Dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_drops_pending_timers_without_flushing() {
        let store = Arc::new(RecordingStore::default());
        let drafts = Arc::new(Mutex::new(DraftStore::new()));
        let persister = persister(Arc::clone(&store), Arc::clone(&drafts));

        drafts.lock().unwrap().set(
            "item-1",
            DraftEdit {
                pass_fail_value: Some(PassFailValue::Pass),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-1");
        assert_eq!(persister.pending_count(), 1);
        persister.cancel_all();
        assert_eq!(persister.pending_count(), 0);

        tokio::time::sleep(Duration::from_millis(3000)).await;

        assert!(store.upsert_calls().is_empty());
        assert_eq!(drafts.lock().unwrap().state("item-1"), SaveState::Dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_to_different_items_flush_independently() {
        let store = Arc::new(RecordingStore::default());
        let drafts = Arc::new(Mutex::new(DraftStore::new()));
        let persister = persister(Arc::clone(&store), Arc::clone(&drafts));

        drafts.lock().unwrap().set(
            "item-1",
            DraftEdit {
                pass_fail_value: Some(PassFailValue::Pass),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-1");

        drafts.lock().unwrap().set(
            "item-2",
            DraftEdit {
                numeric_value: Some("21.5".to_string()),
                ..Default::default()
            },
        );
        persister.schedule_flush("item-2");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let calls = store.upsert_calls();
        assert_eq!(calls.len(), 2);
        let flushed: Vec<&str> = calls
            .iter()
            .map(|batch| batch[0].itp_item_id.as_str())
            .collect();
        assert!(flushed.contains(&"item-1"));
        assert!(flushed.contains(&"item-2"));
    }
}
