use thiserror::Error;
use time::OffsetDateTime;

pub mod view;

pub use view::{absolute_index, page_offset, total_pages, FilteredNote};

pub const NOTES_PER_PAGE: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub text: String,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub text: String,
}

impl Draft {
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.text.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Creating,
    Editing {
        index: usize,
    },
}

impl FormMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing { .. })
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Creating => "Add Note",
            FormMode::Editing { .. } => "Update Note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("note title and text must not be blank")]
    EmptyDraft,
    #[error("no note is being edited")]
    NotEditing,
    #[error("note index {index} is out of range for {len} note(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Session-scoped note state: the collection, the input form and the
/// search/page parameters the views are derived from.
#[derive(Debug, Clone)]
pub struct NoteBoard {
    notes: Vec<Note>,
    draft: Draft,
    mode: FormMode,
    search_text: String,
    current_page: usize,
    notes_per_page: usize,
}

impl Default for NoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteBoard {
    pub fn new() -> Self {
        Self::with_page_size(NOTES_PER_PAGE)
    }

    pub fn with_page_size(notes_per_page: usize) -> Self {
        Self {
            notes: Vec::new(),
            draft: Draft::default(),
            mode: FormMode::Creating,
            search_text: String::new(),
            current_page: 1,
            notes_per_page: notes_per_page.max(1),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn set_draft_title<S: Into<String>>(&mut self, title: S) {
        self.draft.title = title.into();
    }

    pub fn set_draft_text<S: Into<String>>(&mut self, text: S) {
        self.draft.text = text.into();
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn notes_per_page(&self) -> usize {
        self.notes_per_page
    }

    /// Appends the draft as a new note and returns its index.
    pub fn add_note(&mut self) -> Result<usize, BoardError> {
        if !self.draft.is_submittable() {
            return Err(BoardError::EmptyDraft);
        }
        let note = Note {
            title: std::mem::take(&mut self.draft.title),
            text: std::mem::take(&mut self.draft.text),
            timestamp: OffsetDateTime::now_utc(),
        };
        self.notes.push(note);
        Ok(self.notes.len() - 1)
    }

    /// Commits the draft over the note being edited. The timestamp of the
    /// original note is kept.
    pub fn update_note(&mut self) -> Result<usize, BoardError> {
        if !self.draft.is_submittable() {
            return Err(BoardError::EmptyDraft);
        }
        let FormMode::Editing { index } = self.mode else {
            return Err(BoardError::NotEditing);
        };
        let len = self.notes.len();
        let note = self
            .notes
            .get_mut(index)
            .ok_or(BoardError::IndexOutOfRange { index, len })?;
        note.title = std::mem::take(&mut self.draft.title);
        note.text = std::mem::take(&mut self.draft.text);
        self.mode = FormMode::Creating;
        Ok(index)
    }

    /// Loads the note shown at `display_index` on the current page into the
    /// draft and returns its position in the collection. The display index
    /// plus the page offset addresses the filtered view, so with a search
    /// active the target is that entry's backing note, not
    /// `notes[display_index + offset]`.
    pub fn edit_note(&mut self, display_index: usize) -> Result<usize, BoardError> {
        let index = self.resolve_display_index(display_index)?;
        let note = &self.notes[index];
        self.draft.title = note.title.clone();
        self.draft.text = note.text.clone();
        self.mode = FormMode::Editing { index };
        Ok(index)
    }

    pub fn delete_note(&mut self, index: usize) -> Result<Note, BoardError> {
        if index >= self.notes.len() {
            return Err(BoardError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            });
        }
        let removed = self.notes.remove(index);
        if let FormMode::Editing { index: target } = self.mode {
            if target == index {
                self.mode = FormMode::Creating;
            } else if target > index {
                self.mode = FormMode::Editing { index: target - 1 };
            }
        }
        Ok(removed)
    }

    /// Leaves edit mode without touching the collection. Returns whether an
    /// edit was actually discarded.
    pub fn cancel_edit(&mut self) -> bool {
        if !self.mode.is_editing() {
            return false;
        }
        self.draft.clear();
        self.mode = FormMode::Creating;
        true
    }

    pub fn search<S: Into<String>>(&mut self, text: S) {
        self.search_text = text.into();
    }

    pub fn paginate(&mut self, page: usize) {
        self.current_page = page;
    }

    pub fn filtered_notes(&self) -> Vec<FilteredNote<'_>> {
        view::filter_notes(&self.notes, &self.search_text)
    }

    pub fn total_pages(&self) -> usize {
        view::total_pages(self.filtered_notes().len(), self.notes_per_page)
    }

    pub fn current_page_notes(&self) -> Vec<FilteredNote<'_>> {
        let filtered = self.filtered_notes();
        view::page_slice(&filtered, self.current_page, self.notes_per_page).to_vec()
    }

    pub fn page_offset(&self) -> usize {
        view::page_offset(self.current_page, self.notes_per_page)
    }

    /// Maps a position on the current page to the note's position in the
    /// unfiltered collection, going through the filtered view.
    pub fn resolve_display_index(&self, display_index: usize) -> Result<usize, BoardError> {
        let filtered = self.filtered_notes();
        let page = view::page_slice(&filtered, self.current_page, self.notes_per_page);
        if display_index >= page.len() {
            return Err(BoardError::IndexOutOfRange {
                index: display_index,
                len: page.len(),
            });
        }
        let filtered_index = view::absolute_index(display_index, self.page_offset());
        Ok(filtered[filtered_index].index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn board_with(notes: &[(&str, &str)]) -> NoteBoard {
        let mut board = NoteBoard::new();
        for (title, text) in notes {
            board.set_draft_title(*title);
            board.set_draft_text(*text);
            board.add_note().expect("valid draft");
        }
        board
    }

    fn numbered(count: usize) -> NoteBoard {
        let mut board = NoteBoard::new();
        for idx in 0..count {
            board.set_draft_title(format!("Note {idx}"));
            board.set_draft_text(format!("body {idx}"));
            board.add_note().expect("valid draft");
        }
        board
    }

    fn titles(notes: &[FilteredNote<'_>]) -> Vec<String> {
        notes.iter().map(|entry| entry.note.title.clone()).collect()
    }

    #[test]
    fn blank_drafts_are_rejected_without_changes() {
        let mut board = board_with(&[("Keep", "me")]);
        for (title, text) in [("", "body"), ("title", ""), ("   ", "body"), ("title", "\n\t ")] {
            board.set_draft_title(title);
            board.set_draft_text(text);
            assert_matches!(board.add_note(), Err(BoardError::EmptyDraft));
            assert_eq!(board.len(), 1);
        }

        board.edit_note(0).expect("edit");
        board.set_draft_title("  ");
        assert_matches!(board.update_note(), Err(BoardError::EmptyDraft));
        assert_eq!(board.notes()[0].title, "Keep");
        assert!(board.mode().is_editing());
    }

    #[test]
    fn add_appends_and_clears_draft() {
        let mut board = numbered(2);
        let before = OffsetDateTime::now_utc();
        board.set_draft_title("Third");
        board.set_draft_text("text");
        board.search("zzz");
        board.paginate(4);

        let index = board.add_note().expect("add");
        assert_eq!(index, 2);
        assert_eq!(board.len(), 3);
        assert_eq!(board.notes()[2].title, "Third");
        assert!(board.notes()[2].timestamp >= before);
        assert_eq!(board.draft(), &Draft::default());
        assert_eq!(board.search_text(), "zzz");
        assert_eq!(board.current_page(), 4);
    }

    #[test]
    fn add_keeps_untrimmed_text() {
        let board = board_with(&[("  padded ", " body ")]);
        assert_eq!(board.notes()[0].title, "  padded ");
        assert_eq!(board.notes()[0].text, " body ");
    }

    #[test]
    fn update_preserves_timestamp_and_leaves_edit_mode() {
        let mut board = numbered(4);
        let original = board.notes()[2].clone();

        board.edit_note(2).expect("edit");
        assert_eq!(board.mode(), FormMode::Editing { index: 2 });
        assert_eq!(board.draft().title, "Note 2");
        board.set_draft_title("X");
        board.update_note().expect("update");

        let updated = &board.notes()[2];
        assert_eq!(updated.title, "X");
        assert_eq!(updated.text, original.text);
        assert_eq!(updated.timestamp, original.timestamp);
        assert_eq!(board.mode(), FormMode::Creating);
        assert_eq!(board.draft(), &Draft::default());
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn update_without_edit_target_is_rejected() {
        let mut board = numbered(1);
        board.set_draft_title("t");
        board.set_draft_text("b");
        assert_matches!(board.update_note(), Err(BoardError::NotEditing));
        assert_eq!(board.notes()[0].title, "Note 0");
    }

    #[test]
    fn editing_again_retargets() {
        let mut board = numbered(3);
        board.edit_note(0).expect("edit");
        board.edit_note(1).expect("retarget");
        assert_eq!(board.mode(), FormMode::Editing { index: 1 });
        assert_eq!(board.draft().title, "Note 1");
    }

    #[test]
    fn delete_removes_and_shifts() {
        let mut board = numbered(4);
        let removed = board.delete_note(1).expect("delete");
        assert_eq!(removed.title, "Note 1");
        let remaining: Vec<_> = board.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(remaining, vec!["Note 0", "Note 2", "Note 3"]);
    }

    #[test]
    fn delete_out_of_range_is_rejected() {
        let mut board = numbered(2);
        assert_matches!(
            board.delete_note(2),
            Err(BoardError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn delete_does_not_move_page() {
        let mut board = numbered(8);
        board.paginate(2);
        board.delete_note(7).expect("delete");
        assert_eq!(board.current_page(), 2);
        assert!(board.current_page_notes().is_empty());
        assert_eq!(board.total_pages(), 1);
    }

    #[test]
    fn deleting_edited_note_returns_to_creating() {
        let mut board = numbered(3);
        board.edit_note(1).expect("edit");
        board.delete_note(1).expect("delete");
        assert_eq!(board.mode(), FormMode::Creating);
        assert_eq!(board.draft().title, "Note 1");
    }

    #[test]
    fn deleting_earlier_note_keeps_edit_target() {
        let mut board = numbered(3);
        board.edit_note(2).expect("edit");
        board.delete_note(0).expect("delete");
        assert_eq!(board.mode(), FormMode::Editing { index: 1 });
        board.set_draft_title("Renamed");
        board.update_note().expect("update");
        assert_eq!(board.notes()[1].title, "Renamed");
        assert_eq!(board.notes()[0].title, "Note 1");
    }

    #[test]
    fn cancel_edit_discards_draft() {
        let mut board = numbered(2);
        assert!(!board.cancel_edit());
        board.edit_note(1).expect("edit");
        board.set_draft_title("changed");
        assert!(board.cancel_edit());
        assert_eq!(board.mode(), FormMode::Creating);
        assert_eq!(board.draft(), &Draft::default());
        assert_eq!(board.notes()[1].title, "Note 1");
    }

    #[test]
    fn search_matches_title_or_text_case_insensitively() {
        let mut board = board_with(&[("A", "hello world"), ("Shopping", "milk"), ("b", "eggs")]);
        board.search("WORLD");
        assert_eq!(titles(&board.filtered_notes()), vec!["A"]);
        board.search("shop");
        assert_eq!(titles(&board.filtered_notes()), vec!["Shopping"]);
        board.search("xyz");
        assert!(board.filtered_notes().is_empty());
        board.search("");
        assert_eq!(titles(&board.filtered_notes()), vec!["A", "Shopping", "b"]);
    }

    #[test]
    fn search_does_not_reset_page() {
        let mut board = numbered(10);
        board.paginate(2);
        board.search("Note 1");
        assert_eq!(board.current_page(), 2);
    }

    #[test]
    fn eight_notes_make_two_pages() {
        let mut board = numbered(8);
        assert_eq!(board.total_pages(), 2);
        board.paginate(2);
        assert_eq!(titles(&board.current_page_notes()), vec!["Note 7"]);
    }

    #[test]
    fn edit_through_filtered_page_targets_backing_note() {
        let mut board = NoteBoard::new();
        for idx in 0..20 {
            let title = if idx % 2 == 0 {
                format!("even {idx}")
            } else {
                format!("odd {idx}")
            };
            board.set_draft_title(title);
            board.set_draft_text("body");
            board.add_note().expect("add");
        }
        board.search("odd");
        board.paginate(2);
        // page 2 of the odd notes starts at "odd 15"
        let index = board.edit_note(0).expect("edit");
        assert_eq!(index, 15);
        assert_eq!(board.draft().title, "odd 15");
    }

    #[test]
    fn stale_display_index_is_rejected() {
        let mut board = numbered(8);
        board.paginate(2);
        assert_matches!(
            board.edit_note(1),
            Err(BoardError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(board.mode(), FormMode::Creating);
        assert_eq!(board.draft(), &Draft::default());
    }

    #[test]
    fn paginate_accepts_any_page() {
        let mut board = numbered(3);
        board.paginate(0);
        assert!(board.current_page_notes().is_empty());
        board.paginate(9);
        assert!(board.current_page_notes().is_empty());
        board.paginate(1);
        assert_eq!(board.current_page_notes().len(), 3);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let board = NoteBoard::with_page_size(0);
        assert_eq!(board.notes_per_page(), 1);
    }
}
