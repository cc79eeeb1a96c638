use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassFailValue {
    Pass,
    Fail,
    #[serde(rename = "N/A")]
    Na,
}

impl PassFailValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassFailValue::Pass => "PASS",
            PassFailValue::Fail => "FAIL",
            PassFailValue::Na => "N/A",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "PASS" => Ok(PassFailValue::Pass),
            "FAIL" => Ok(PassFailValue::Fail),
            "N/A" => Ok(PassFailValue::Na),
            other => Err(AppError::ParseError(format!(
                "Unknown pass/fail value: {}",
                other
            ))),
        }
    }
}

/// The answer to one checklist item. Tagged by item type so a PASS_FAIL item
/// can never carry a numeric value and vice versa.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum AnswerValue {
    PassFail(PassFailValue),
    Text(String),
    Numeric(f64),
}

/// Persisted answer for one (lot, checklist item) pair. At most one row per
/// pair; the persistence layer upserts on (lot_id, itp_item_id).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceRecord {
    pub id: String,
    pub lot_id: String,
    pub itp_item_id: String,
    pub answer: Option<AnswerValue>,
    pub comment: Option<String>,
    pub completed_by: Option<String>,
    pub updated_at: i64,
}

/// Upsert payload for one (lot, item) pair. Built from the merged draft view,
/// so it always carries the full current row state for that pair.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceRecordPatch {
    pub lot_id: String,
    pub itp_item_id: String,
    pub answer: Option<AnswerValue>,
    pub comment: Option<String>,
    pub completed_by: Option<String>,
    pub updated_at: i64,
}

impl ConformanceRecordPatch {
    /// Patches with no answer and no comment are never flushed; flushing one
    /// would create an empty row.
    pub fn is_empty(&self) -> bool {
        self.answer.is_none() && self.comment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_value_serializes_tagged_by_kind() {
        let json = serde_json::to_value(AnswerValue::PassFail(PassFailValue::Na)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "passFail", "value": "N/A" }));

        let json = serde_json::to_value(AnswerValue::Numeric(42.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "numeric", "value": 42.5 }));
    }

    #[test]
    fn pass_fail_parse_round_trips() {
        for value in [PassFailValue::Pass, PassFailValue::Fail, PassFailValue::Na] {
            assert_eq!(PassFailValue::parse(value.as_str()).unwrap(), value);
        }
        assert!(PassFailValue::parse("MAYBE").is_err());
    }

    #[test]
    fn patch_with_only_a_comment_is_not_empty() {
        let patch = ConformanceRecordPatch {
            lot_id: "lot-1".to_string(),
            itp_item_id: "item-1".to_string(),
            answer: None,
            comment: Some("holding on survey".to_string()),
            completed_by: None,
            updated_at: 0,
        };
        assert!(!patch.is_empty());
    }
}
