pub mod checklist;
pub mod conformance;
pub mod diary;
pub mod error;
pub mod lot;
