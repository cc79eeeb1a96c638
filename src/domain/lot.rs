use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    InProgress,
    Completed,
    Approved,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::InProgress => "IN_PROGRESS",
            LotStatus::Completed => "COMPLETED",
            LotStatus::Approved => "APPROVED",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "IN_PROGRESS" => Ok(LotStatus::InProgress),
            "COMPLETED" => Ok(LotStatus::Completed),
            "APPROVED" => Ok(LotStatus::Approved),
            other => Err(AppError::ParseError(format!(
                "Unknown lot status: {}",
                other
            ))),
        }
    }
}

/// A discrete, inspectable portion of a project. Owns zero-or-one ITP
/// assignment and the conformance records written against it. Status
/// transitions happen in the approval workflow, never here.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: LotStatus,
    pub itp_template_id: Option<String>,
    pub created_at: i64,
}
