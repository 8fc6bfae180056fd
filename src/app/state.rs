use unicode_segmentation::UnicodeSegmentation;

use crate::board::{BoardError, FilteredNote, FormMode, NoteBoard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Title,
    Body,
    Search,
    Notes,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Title => FocusPane::Body,
            FocusPane::Body => FocusPane::Search,
            FocusPane::Search => FocusPane::Notes,
            FocusPane::Notes => FocusPane::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FocusPane::Title => FocusPane::Notes,
            FocusPane::Body => FocusPane::Title,
            FocusPane::Search => FocusPane::Body,
            FocusPane::Notes => FocusPane::Search,
        }
    }

    pub fn is_form(self) -> bool {
        matches!(self, FocusPane::Title | FocusPane::Body)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub focus: FocusPane,
    pub board: NoteBoard,
    /// Selected card, relative to the current page.
    pub selected: usize,
    pub preview_chars: usize,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(board: NoteBoard, preview_chars: usize) -> Self {
        Self {
            focus: FocusPane::Title,
            board,
            selected: 0,
            preview_chars,
            status_message: None,
        }
    }

    pub fn page_notes(&self) -> Vec<FilteredNote<'_>> {
        self.board.current_page_notes()
    }

    pub fn page_len(&self) -> usize {
        self.board.current_page_notes().len()
    }

    pub fn selected_on_page(&self) -> Option<usize> {
        if self.selected < self.page_len() {
            Some(self.selected)
        } else {
            None
        }
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_input_char(&mut self, ch: char) {
        match self.focus {
            FocusPane::Title => self.board.draft_mut().title.push(ch),
            FocusPane::Body => self.board.draft_mut().text.push(ch),
            FocusPane::Search => {
                let mut text = self.board.search_text().to_string();
                text.push(ch);
                self.apply_search(text);
            }
            FocusPane::Notes => {}
        }
    }

    pub fn pop_input_char(&mut self) -> bool {
        match self.focus {
            FocusPane::Title => pop_grapheme(&mut self.board.draft_mut().title),
            FocusPane::Body => pop_grapheme(&mut self.board.draft_mut().text),
            FocusPane::Search => {
                let mut text = self.board.search_text().to_string();
                if !pop_grapheme(&mut text) {
                    return false;
                }
                self.apply_search(text);
                true
            }
            FocusPane::Notes => false,
        }
    }

    fn apply_search(&mut self, text: String) {
        self.board.search(text);
        self.normalize_selection();
    }

    /// Runs the form's submit action for the current mode.
    pub fn submit_form(&mut self) {
        let mode = self.board.mode();
        let result = match mode {
            FormMode::Creating => self.board.add_note(),
            FormMode::Editing { .. } => self.board.update_note(),
        };
        match result {
            Ok(index) => {
                tracing::debug!(index, ?mode, "note committed");
                let message = if mode.is_editing() {
                    "Note updated"
                } else {
                    "Note added"
                };
                self.set_status_message(Some(message));
                self.focus = FocusPane::Title;
            }
            Err(BoardError::EmptyDraft) => {
                tracing::debug!(?mode, "ignoring submit with blank title or text");
            }
            Err(err) => {
                tracing::warn!(%err, ?mode, "submit rejected");
                self.set_status_message(Some(format!("Cannot save note: {err}")));
            }
        }
        self.normalize_selection();
    }

    pub fn edit_selected(&mut self) {
        let Some(display_index) = self.selected_on_page() else {
            return;
        };
        match self.board.edit_note(display_index) {
            Ok(index) => {
                tracing::debug!(display_index, index, "editing note");
                self.focus = FocusPane::Title;
                self.set_status_message(Some(
                    "Editing note: Ctrl-s to update • Esc to discard",
                ));
            }
            Err(err) => {
                tracing::warn!(%err, display_index, "edit target is stale");
                self.set_status_message(Some("That note is no longer on this page"));
                self.normalize_selection();
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(display_index) = self.selected_on_page() else {
            return;
        };
        let result = self
            .board
            .resolve_display_index(display_index)
            .and_then(|index| self.board.delete_note(index));
        match result {
            Ok(note) => {
                tracing::debug!(title = %note.title, "note deleted");
                self.set_status_message(Some(format!("Deleted \"{}\"", note.title)));
            }
            Err(err) => {
                tracing::warn!(%err, display_index, "delete target is stale");
                self.set_status_message(Some("That note is no longer on this page"));
            }
        }
        self.normalize_selection();
    }

    pub fn cancel_edit(&mut self) -> bool {
        if self.board.cancel_edit() {
            self.set_status_message(Some("Edit discarded"));
            true
        } else {
            false
        }
    }

    /// Page buttons only exist for `1..=total_pages`; anything else is not
    /// offered.
    pub fn jump_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.board.total_pages() {
            return false;
        }
        self.board.paginate(page);
        self.selected = 0;
        true
    }

    /// Steps through the page buttons. Stepping back from a page past the
    /// last one (left behind by a search or delete) lands on the last page.
    pub fn move_page(&mut self, delta: isize) -> bool {
        let total = self.board.total_pages();
        let current = self.board.current_page();
        if delta < 0 && current > total {
            return self.jump_to_page(total);
        }
        let target = current as isize + delta;
        if target < 1 {
            return false;
        }
        self.jump_to_page(target as usize)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.page_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    pub fn normalize_selection(&mut self) {
        let len = self.page_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

fn pop_grapheme(text: &mut String) -> bool {
    let Some((idx, _)) = text.grapheme_indices(true).next_back() else {
        return false;
    };
    text.truncate(idx);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(count: usize) -> AppState {
        let mut board = NoteBoard::new();
        for idx in 0..count {
            board.set_draft_title(format!("Note {idx}"));
            board.set_draft_text(format!("body {idx}"));
            board.add_note().expect("add");
        }
        AppState::new(board, 50)
    }

    fn type_str(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            state.push_input_char(ch);
        }
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut state = state_with(0);
        assert_eq!(state.focus, FocusPane::Title);
        state.focus_next();
        state.focus_next();
        state.focus_next();
        assert_eq!(state.focus, FocusPane::Notes);
        state.focus_next();
        assert_eq!(state.focus, FocusPane::Title);
        state.focus_previous();
        assert_eq!(state.focus, FocusPane::Notes);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut state = state_with(0);
        type_str(&mut state, "cafe\u{301}");
        assert!(state.pop_input_char());
        assert_eq!(state.board.draft().title, "caf");
        state.board.draft_mut().title.clear();
        assert!(!state.pop_input_char());
    }

    #[test]
    fn typed_draft_submits_as_new_note() {
        let mut state = state_with(0);
        type_str(&mut state, "Groceries");
        state.focus = FocusPane::Body;
        type_str(&mut state, "milk");
        state.submit_form();
        assert_eq!(state.board.len(), 1);
        assert_eq!(state.status_message.as_deref(), Some("Note added"));
        assert_eq!(state.focus, FocusPane::Title);
    }

    #[test]
    fn blank_submit_is_silent() {
        let mut state = state_with(1);
        type_str(&mut state, "only a title");
        state.submit_form();
        assert_eq!(state.board.len(), 1);
        assert!(state.status_message.is_none());
        assert_eq!(state.board.draft().title, "only a title");
    }

    #[test]
    fn search_typing_filters_and_clamps_selection() {
        let mut state = state_with(5);
        state.selected = 4;
        state.focus = FocusPane::Search;
        type_str(&mut state, "note 1");
        assert_eq!(state.board.search_text(), "note 1");
        assert_eq!(state.page_len(), 1);
        assert_eq!(state.selected, 0);
        assert!(state.pop_input_char());
        assert_eq!(state.board.search_text(), "note ");
        assert_eq!(state.page_len(), 5);
    }

    #[test]
    fn edit_then_update_selected_card() {
        let mut state = state_with(9);
        assert!(state.jump_to_page(2));
        state.focus = FocusPane::Notes;
        state.selected = 1;
        state.edit_selected();
        assert_eq!(state.board.mode(), FormMode::Editing { index: 8 });
        assert_eq!(state.focus, FocusPane::Title);
        state.board.draft_mut().title = "Renamed".into();
        state.submit_form();
        assert_eq!(state.board.notes()[8].title, "Renamed");
        assert_eq!(state.status_message.as_deref(), Some("Note updated"));
    }

    #[test]
    fn delete_selected_uses_backing_index() {
        let mut state = state_with(6);
        state.focus = FocusPane::Search;
        type_str(&mut state, "4");
        state.selected = 0;
        state.delete_selected();
        let titles: Vec<_> = state
            .board
            .notes()
            .iter()
            .map(|note| note.title.clone())
            .collect();
        assert!(!titles.contains(&"Note 4".to_string()));
        assert_eq!(state.board.len(), 5);
    }

    #[test]
    fn page_jumps_stay_within_offered_buttons() {
        let mut state = state_with(15);
        assert!(!state.jump_to_page(0));
        assert!(!state.jump_to_page(4));
        assert!(state.jump_to_page(3));
        assert!(!state.move_page(1));
        assert!(state.move_page(-1));
        assert_eq!(state.board.current_page(), 2);
    }

    #[test]
    fn previous_page_recovers_from_page_emptied_by_search() {
        let mut state = state_with(15);
        assert!(state.jump_to_page(3));
        state.focus = FocusPane::Search;
        type_str(&mut state, "note 1");
        assert_eq!(state.board.total_pages(), 1);
        assert_eq!(state.board.current_page(), 3);
        assert_eq!(state.page_len(), 0);

        assert!(state.move_page(-1));
        assert_eq!(state.board.current_page(), 1);
        assert_eq!(state.page_len(), 6);
    }

    #[test]
    fn previous_page_recovers_from_page_emptied_by_delete() {
        let mut state = state_with(8);
        assert!(state.jump_to_page(2));
        state.delete_selected();
        assert_eq!(state.board.current_page(), 2);
        assert_eq!(state.page_len(), 0);
        assert!(!state.move_page(1));

        assert!(state.move_page(-1));
        assert_eq!(state.board.current_page(), 1);
        assert_eq!(state.page_len(), 7);
    }

    #[test]
    fn previous_page_with_no_matches_stays_put() {
        let mut state = state_with(3);
        state.focus = FocusPane::Search;
        type_str(&mut state, "xyz");
        assert!(!state.move_page(-1));
        assert_eq!(state.board.current_page(), 1);
    }

    #[test]
    fn only_input_panes_are_form_fields() {
        assert!(FocusPane::Title.is_form());
        assert!(FocusPane::Body.is_form());
        assert!(!FocusPane::Search.is_form());
        assert!(!FocusPane::Notes.is_form());
    }

    #[test]
    fn selection_is_clamped_to_page() {
        let mut state = state_with(8);
        state.move_selection(20);
        assert_eq!(state.selected, 6);
        state.move_selection(-20);
        assert_eq!(state.selected, 0);
        state.jump_to_page(2);
        state.move_selection(3);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn cancel_edit_reports_only_when_editing() {
        let mut state = state_with(2);
        assert!(!state.cancel_edit());
        state.focus = FocusPane::Notes;
        state.edit_selected();
        assert!(state.cancel_edit());
        assert_eq!(state.status_message.as_deref(), Some("Edit discarded"));
    }
}
