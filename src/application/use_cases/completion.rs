use crate::application::use_cases::draft_store::DraftStore;
use crate::domain::checklist::ChecklistItem;

/// Percent-complete for a checklist: items whose type-appropriate field is
/// populated in the merged draft view, over total items. A lot with no items
/// is 0% complete, never a divide-by-zero.
pub fn completion_percent(items: &[ChecklistItem], drafts: &DraftStore) -> u8 {
    if items.is_empty() {
        return 0;
    }

    let answered = items
        .iter()
        .filter(|item| {
            drafts
                .get(&item.id)
                .and_then(|draft| draft.answer_for(item.item_type))
                .is_some()
        })
        .count();

    let percent = 100.0 * answered as f64 / items.len() as f64;
    percent.round() as u8
}
