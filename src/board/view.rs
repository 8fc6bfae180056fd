//! Pure queries over the note collection. Nothing here is cached; callers
//! recompute on every frame.

use super::Note;

/// A note that survived the search filter, with its position in the
/// unfiltered collection.
#[derive(Debug, Clone, Copy)]
pub struct FilteredNote<'a> {
    pub index: usize,
    pub note: &'a Note,
}

pub fn matches(note: &Note, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || note.title.to_lowercase().contains(needle_lower)
        || note.text.to_lowercase().contains(needle_lower)
}

pub fn filter_notes<'a>(notes: &'a [Note], search_text: &str) -> Vec<FilteredNote<'a>> {
    let needle = search_text.to_lowercase();
    notes
        .iter()
        .enumerate()
        .filter(|(_, note)| matches(note, &needle))
        .map(|(index, note)| FilteredNote { index, note })
        .collect()
}

pub fn total_pages(filtered_len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    filtered_len.div_ceil(per_page)
}

/// Offset of the first entry of a 1-based `page`. Page 0 maps to 0.
pub fn page_offset(page: usize, per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(per_page)
}

pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page_offset(page, per_page).min(items.len());
    let end = page.saturating_mul(per_page).min(items.len());
    if end <= start {
        return &[];
    }
    &items[start..end]
}

/// Position in the filtered view of the entry shown at `display_index`
/// on a page starting at `page_offset`.
pub fn absolute_index(display_index: usize, page_offset: usize) -> usize {
    display_index + page_offset
}
