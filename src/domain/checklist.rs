use crate::domain::conformance::ConformanceRecord;
use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    PassFail,
    TextInput,
    Numeric,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::PassFail => "PASS_FAIL",
            ItemType::TextInput => "TEXT_INPUT",
            ItemType::Numeric => "NUMERIC",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "PASS_FAIL" => Ok(ItemType::PassFail),
            "TEXT_INPUT" => Ok(ItemType::TextInput),
            "NUMERIC" => Ok(ItemType::Numeric),
            other => Err(AppError::ParseError(format!(
                "Unknown checklist item type: {}",
                other
            ))),
        }
    }
}

/// One line of an ITP checklist. Authored with the template (out of this
/// crate's write path); the inspection workflow only ever reads these.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub itp_template_id: String,
    pub description: String,
    pub item_type: ItemType,
    pub order_index: i64,
    pub acceptance_criteria: Option<String>,
}

/// Read-path snapshot for one lot: the checklist items of its assigned ITP
/// plus whatever answers have already been persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistWithAnswers {
    pub items: Vec<ChecklistItem>,
    pub answers: Vec<ConformanceRecord>,
}
