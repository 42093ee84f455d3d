use parking_lot::RwLock;

/// Selection store shared by the chart and table views.
///
/// One instance per session, handed to every view through the viewer context.
/// Writes are visible to the next read on any thread; readers detect
/// changes through the revision.
pub struct SelectionStore {
    state: RwLock<SelectionState>,
}

/// Snapshot of the selection store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Id of the highlighted record. May dangle after a refetch.
    pub selected_id: Option<String>,

    /// Place filter, empty means no filter
    pub filter_text: String,

    /// Bumped whenever either field actually changes
    pub revision: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SelectionState::default()),
        }
    }

    /// Get the current state
    pub fn snapshot(&self) -> SelectionState {
        self.state.read().clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state.read().selected_id.clone()
    }

    /// Whether `id` is the current selection
    pub fn is_selected(&self, id: &str) -> bool {
        self.state.read().selected_id.as_deref() == Some(id)
    }

    pub fn filter_text(&self) -> String {
        self.state.read().filter_text.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Replace the selection. Setting the current value again is a no-op.
    pub fn set_selected_id(&self, id: Option<String>) {
        let mut state = self.state.write();
        if state.selected_id == id {
            return;
        }
        tracing::debug!("Selection changed to {:?}", id);
        state.selected_id = id;
        state.revision += 1;
    }

    /// Replace the place filter. Setting the current value again is a no-op.
    pub fn set_filter_text(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.state.write();
        if state.filter_text == text {
            return;
        }
        tracing::debug!("Filter changed to '{}'", text);
        state.filter_text = text;
        state.revision += 1;
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_after_write() {
        let store = SelectionStore::new();
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.filter_text(), "");

        store.set_selected_id(Some("us7000abcd".to_string()));
        store.set_filter_text("alaska");

        assert_eq!(store.selected_id().as_deref(), Some("us7000abcd"));
        assert!(store.is_selected("us7000abcd"));
        assert_eq!(store.filter_text(), "alaska");
    }

    #[test]
    fn test_repeated_selection_is_idempotent() {
        let store = SelectionStore::new();
        store.set_selected_id(Some("x".to_string()));
        let revision = store.revision();
        store.set_selected_id(Some("x".to_string()));

        assert_eq!(store.selected_id().as_deref(), Some("x"));
        assert_eq!(revision, 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_selection_is_not_validated() {
        let store = SelectionStore::new();
        store.set_selected_id(Some("does-not-exist".to_string()));
        assert!(store.is_selected("does-not-exist"));

        store.set_selected_id(None);
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_filter_changes_bump_revision_once_each() {
        let store = SelectionStore::new();
        store.set_filter_text("ca");
        store.set_filter_text("ca");
        assert_eq!(store.revision(), 1);

        store.set_filter_text("");
        assert_eq!(store.filter_text(), "");
        assert_eq!(store.revision(), 2);
        assert_eq!(store.snapshot().selected_id, None);
    }
}
