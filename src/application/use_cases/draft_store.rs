use crate::domain::checklist::{ChecklistItem, ItemType};
use crate::domain::conformance::{
    AnswerValue, ConformanceRecord, ConformanceRecordPatch, PassFailValue,
};
use std::collections::HashMap;

/// Save lifecycle of one item's draft. Edits move a draft to Dirty, the
/// persister moves it to Flushing while an upsert is in flight, and back to
/// Clean on success or Dirty on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Clean,
    Dirty,
    Flushing,
}

/// Transient, in-memory partial answer for one checklist item. A superset of
/// the persisted record's fields; any subset may be populated. Numeric input
/// is kept as the raw string the inspector typed and only parsed at flush
/// time.
#[derive(Debug, Clone)]
pub struct Draft {
    pub pass_fail_value: Option<PassFailValue>,
    pub text_value: Option<String>,
    pub numeric_value: Option<String>,
    pub comment: Option<String>,
    pub completed_by: Option<String>,
    pub state: SaveState,
}

/// The partial applied by a single edit event. Present fields overwrite the
/// draft's fields; absent fields leave them untouched.
#[derive(Debug, Clone, Default)]
pub struct DraftEdit {
    pub pass_fail_value: Option<PassFailValue>,
    pub text_value: Option<String>,
    pub numeric_value: Option<String>,
    pub comment: Option<String>,
    pub completed_by: Option<String>,
}

impl Draft {
    fn empty() -> Self {
        Self {
            pass_fail_value: None,
            text_value: None,
            numeric_value: None,
            comment: None,
            completed_by: None,
            state: SaveState::Clean,
        }
    }

    fn from_record(record: &ConformanceRecord) -> Self {
        let mut draft = Self::empty();
        match &record.answer {
            Some(AnswerValue::PassFail(value)) => draft.pass_fail_value = Some(*value),
            Some(AnswerValue::Text(value)) => draft.text_value = Some(value.clone()),
            Some(AnswerValue::Numeric(value)) => draft.numeric_value = Some(value.to_string()),
            None => {}
        }
        draft.comment = record.comment.clone();
        draft.completed_by = record.completed_by.clone();
        draft
    }

    fn merge(&mut self, edit: DraftEdit) {
        if let Some(value) = edit.pass_fail_value {
            self.pass_fail_value = Some(value);
        }
        if let Some(value) = edit.text_value {
            self.text_value = Some(value);
        }
        if let Some(value) = edit.numeric_value {
            self.numeric_value = Some(value);
        }
        if let Some(value) = edit.comment {
            self.comment = Some(value);
        }
        if let Some(value) = edit.completed_by {
            self.completed_by = Some(value);
        }
        self.state = SaveState::Dirty;
    }

    /// Type-directed answer shaping: only the field legal for the item's
    /// declared type is considered. Empty or whitespace text yields no
    /// answer; an empty or unparseable numeric string yields no answer.
    pub fn answer_for(&self, item_type: ItemType) -> Option<AnswerValue> {
        match item_type {
            ItemType::PassFail => self.pass_fail_value.map(AnswerValue::PassFail),
            ItemType::TextInput => self
                .text_value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| AnswerValue::Text(text.to_string())),
            ItemType::Numeric => self
                .numeric_value
                .as_deref()
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .and_then(|raw| raw.parse::<f64>().ok())
                .map(AnswerValue::Numeric),
        }
    }

    /// True when a NUMERIC item holds a non-empty raw value that does not
    /// parse. Debounced flushes skip such drafts; manual flush reports them.
    pub fn has_invalid_numeric(&self, item_type: ItemType) -> bool {
        if item_type != ItemType::Numeric {
            return false;
        }
        match self.numeric_value.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<f64>().is_err(),
            _ => false,
        }
    }

    pub fn to_patch(&self, lot_id: &str, item: &ChecklistItem) -> ConformanceRecordPatch {
        ConformanceRecordPatch {
            lot_id: lot_id.to_string(),
            itp_item_id: item.id.clone(),
            answer: self.answer_for(item.item_type),
            comment: self
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|comment| !comment.is_empty())
                .map(|comment| comment.to_string()),
            completed_by: self.completed_by.clone(),
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// In-memory map from checklist-item id to its current (possibly unsaved)
/// draft, seeded from previously persisted records at view load. Discarded
/// when the inspection view closes; unsaved edits are lost by design.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: HashMap<String, Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, records: &[ConformanceRecord]) {
        for record in records {
            self.drafts
                .insert(record.itp_item_id.clone(), Draft::from_record(record));
        }
    }

    pub fn get(&self, item_id: &str) -> Option<&Draft> {
        self.drafts.get(item_id)
    }

    /// Field-wise merge of the edit into the item's draft; the last value
    /// written per field wins. Always succeeds and marks the draft Dirty.
    pub fn set(&mut self, item_id: &str, edit: DraftEdit) {
        self.drafts
            .entry(item_id.to_string())
            .or_insert_with(Draft::empty)
            .merge(edit);
    }

    pub fn state(&self, item_id: &str) -> SaveState {
        self.drafts
            .get(item_id)
            .map(|draft| draft.state)
            .unwrap_or(SaveState::Clean)
    }

    pub fn mark_flushing(&mut self, item_id: &str) {
        if let Some(draft) = self.drafts.get_mut(item_id) {
            draft.state = SaveState::Flushing;
        }
    }

    pub fn mark_clean(&mut self, item_id: &str) {
        if let Some(draft) = self.drafts.get_mut(item_id) {
            draft.state = SaveState::Clean;
        }
    }

    pub fn mark_dirty(&mut self, item_id: &str) {
        if let Some(draft) = self.drafts.get_mut(item_id) {
            draft.state = SaveState::Dirty;
        }
    }
}
