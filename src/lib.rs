pub mod application;
pub mod domain;
pub mod infrastructure;

pub use crate::application::{DiaryUseCase, DraftEdit, InspectionSession, SaveState};
pub use crate::domain::checklist::{ChecklistItem, ChecklistWithAnswers, ItemType};
pub use crate::domain::conformance::{
    AnswerValue, ConformanceRecord, ConformanceRecordPatch, PassFailValue,
};
pub use crate::domain::diary::{DiaryEntry, DiaryEntryInput};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::lot::{Lot, LotStatus};
pub use crate::infrastructure::bootstrap::{init_tracing, AppContext};
pub use crate::infrastructure::config::Settings;
pub use crate::infrastructure::db::ConformanceStore;
