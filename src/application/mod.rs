pub mod use_cases;

pub use use_cases::diary::DiaryUseCase;
pub use use_cases::draft_store::{Draft, DraftEdit, DraftStore, SaveState};
pub use use_cases::inspection::InspectionSession;
pub use use_cases::persister::DebouncedPersister;
