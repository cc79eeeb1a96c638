use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Daily site-diary record for a lot. One entry per lot per calendar day,
/// upserted on (lot_id, entry_date) so re-saving during the day overwrites.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub lot_id: String,
    pub entry_date: String,
    pub weather: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub labour_count: Option<i64>,
    pub plant_notes: Option<String>,
    pub events: Option<String>,
    pub created_by: Option<String>,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryInput {
    pub lot_id: String,
    #[validate(regex(path = *ENTRY_DATE_RE, message = "entry date must be YYYY-MM-DD"))]
    pub entry_date: String,
    #[validate(length(max = 200))]
    pub weather: Option<String>,
    pub temperature_celsius: Option<f64>,
    #[validate(range(min = 0))]
    pub labour_count: Option<i64>,
    #[validate(length(max = 2000))]
    pub plant_notes: Option<String>,
    #[validate(length(max = 5000))]
    pub events: Option<String>,
    pub created_by: Option<String>,
}

pub static ENTRY_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid entry date regex"));
