use crate::model::{ColumnLabels, Field, VocabularyEntry};
use crate::storage::{StoreError, VocabularyStore};

pub const SAVED_MESSAGE: &str = "Word saved successfully!";
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields!";
pub const ENTER_SEARCH_TERM: &str = "Please enter a term to search!";

/// Widget that currently receives key input. Order is the Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Source,
    Target,
    Meaning,
    Save,
    Search,
    SearchButton,
    Results,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::Source,
        Focus::Target,
        Focus::Meaning,
        Focus::Save,
        Focus::Search,
        Focus::SearchButton,
        Focus::Results,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }

    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            Focus::Source | Focus::Target | Focus::Meaning | Focus::Search
        )
    }
}

/// Modal message shown over the form until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Success(_) => "Success",
            Notice::Warning(_) => "Warning",
            Notice::Error(_) => "Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

pub struct UiState {
    pub title: String,
    pub labels: ColumnLabels,
    pub focus: Focus,
    pub source: String,
    pub target: String,
    pub meaning: String,
    pub search: String,
    /// Entries currently shown in the results list.
    pub entries: Vec<VocabularyEntry>,
    /// Term behind `entries`; `None` means the full list is shown.
    pub active_search: Option<String>,
    pub selected: usize,
    pub notice: Option<Notice>,
    pub show_help: bool,
    pub info: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            title: "Vocabulary EN-PT".into(),
            labels: ColumnLabels::default(),
            focus: Focus::Source,
            source: String::new(),
            target: String::new(),
            meaning: String::new(),
            search: String::new(),
            entries: Vec::new(),
            active_search: None,
            selected: 0,
            notice: None,
            show_help: false,
            info: String::new(),
        }
    }
}

impl UiState {
    pub fn field_mut(&mut self, focus: Focus) -> Option<&mut String> {
        match focus {
            Focus::Source => Some(&mut self.source),
            Focus::Target => Some(&mut self.target),
            Focus::Meaning => Some(&mut self.meaning),
            Focus::Search => Some(&mut self.search),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            field.pop();
        }
    }

    /// Reload the full list from the file.
    pub fn refresh(&mut self, store: &VocabularyStore) {
        match store.list() {
            Ok(entries) => {
                self.info = format!("{} entries in {}", entries.len(), store.path().display());
                self.set_entries(entries, None);
            }
            Err(e) => {
                tracing::error!("failed to load entries: {e}");
                self.notice = Some(Notice::Error(format!("Load failed: {e}")));
            }
        }
    }

    /// Validate the form, append the entry and reset the fields on success.
    pub fn save(&mut self, store: &VocabularyStore) {
        let entry = match VocabularyEntry::new(&self.source, &self.target, &self.meaning) {
            Ok(entry) => entry,
            Err(e) => {
                if let StoreError::EmptyField(field) = e {
                    self.focus = focus_for(field);
                }
                self.notice = Some(Notice::Warning(FILL_ALL_FIELDS.into()));
                return;
            }
        };

        match store.append(entry) {
            Ok(_) => {
                self.source.clear();
                self.target.clear();
                self.meaning.clear();
                self.focus = Focus::Source;
                self.refresh(store);
                self.notice = Some(Notice::Success(SAVED_MESSAGE.into()));
            }
            Err(e) => {
                tracing::error!("failed to save entry: {e}");
                self.notice = Some(Notice::Error(format!("Save failed: {e}")));
            }
        }
    }

    /// Replace the results list with entries matching the search field.
    pub fn search(&mut self, store: &VocabularyStore) {
        match store.search(&self.search) {
            Ok(found) => {
                let term = self.search.trim().to_string();
                self.info = format!("{} match(es) for '{}'", found.len(), term);
                self.set_entries(found, Some(term));
            }
            Err(e) if e.is_validation() => {
                self.notice = Some(Notice::Warning(ENTER_SEARCH_TERM.into()));
            }
            Err(e) => {
                tracing::error!("search failed: {e}");
                self.notice = Some(Notice::Error(format!("Search failed: {e}")));
            }
        }
    }

    /// Drop the active search and show every entry again.
    pub fn clear_search(&mut self, store: &VocabularyStore) {
        self.search.clear();
        self.refresh(store);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_entry(&self) -> Option<&VocabularyEntry> {
        self.entries.get(self.selected)
    }

    fn set_entries(&mut self, entries: Vec<VocabularyEntry>, search: Option<String>) {
        self.entries = entries;
        self.active_search = search;
        self.selected = 0;
    }
}

fn focus_for(field: Field) -> Focus {
    match field {
        Field::Source => Focus::Source,
        Field::Target => Focus::Target,
        Field::Meaning => Focus::Meaning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn store() -> (TempDir, VocabularyStore) {
        let dir = tempdir().unwrap();
        let store =
            VocabularyStore::open(dir.path().join("dictionary.xlsx"), ColumnLabels::default())
                .unwrap();
        (dir, store)
    }

    fn fill(state: &mut UiState, s: &str, t: &str, m: &str) {
        state.source = s.into();
        state.target = t.into();
        state.meaning = m.into();
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Focus::Source.next(), Focus::Target);
        assert_eq!(Focus::Results.next(), Focus::Source);
        assert_eq!(Focus::Source.prev(), Focus::Results);
        assert!(Focus::Search.is_text_input());
        assert!(!Focus::Save.is_text_input());
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut state = UiState::default();
        state.insert_char('o');
        state.insert_char('i');
        state.focus = Focus::Save;
        state.insert_char('x');
        state.focus = Focus::Source;
        state.backspace();
        assert_eq!(state.source, "o");
    }

    #[test]
    fn save_appends_clears_and_refreshes() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        fill(&mut state, " casa ", "house", "a building");
        state.focus = Focus::Save;

        state.save(&store);

        assert_eq!(state.notice, Some(Notice::Success(SAVED_MESSAGE.into())));
        assert!(state.source.is_empty() && state.target.is_empty() && state.meaning.is_empty());
        assert_eq!(state.focus, Focus::Source);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].source_word, "casa");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn save_with_blank_field_warns_and_keeps_input() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        fill(&mut state, "casa", "house", "   ");

        state.save(&store);

        assert_eq!(state.notice, Some(Notice::Warning(FILL_ALL_FIELDS.into())));
        assert_eq!(state.source, "casa");
        assert_eq!(state.focus, Focus::Meaning);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn search_filters_and_clear_restores() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        fill(&mut state, "gato", "cat", "small feline");
        state.save(&store);
        fill(&mut state, "cão", "dog", "loyal animal");
        state.save(&store);

        state.search = "CAT".into();
        state.search(&store);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.active_search.as_deref(), Some("CAT"));

        state.clear_search(&store);
        assert_eq!(state.entries.len(), 2);
        assert!(state.active_search.is_none());
        assert!(state.search.is_empty());
    }

    #[test]
    fn blank_search_warns() {
        let (_dir, store) = store();
        let mut state = UiState::default();
        state.search = "  ".into();
        state.search(&store);
        assert_eq!(
            state.notice,
            Some(Notice::Warning(ENTER_SEARCH_TERM.into()))
        );
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut state = UiState::default();
        state.select_next();
        assert_eq!(state.selected, 0);

        state.entries = vec![
            VocabularyEntry::new("um", "one", "1").unwrap(),
            VocabularyEntry::new("dois", "two", "2").unwrap(),
        ];
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        state.select_prev();
        state.select_prev();
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_entry().unwrap().source_word, "um");
    }
}
