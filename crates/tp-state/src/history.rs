//! Snapshot undo history
//!
//! Linear timeline of whole-document snapshots. Each entry stores the state
//! *after* its action; the current entry is what `rollback` returns to.
//! Pushing while not at the end discards the redo branch.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Default number of entries kept
pub const DEFAULT_MAX_ENTRIES: usize = 100;

// ============ History Entry ============

/// One step of the timeline
#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    /// Shown in the Undo/Redo menu items
    pub description: String,
    /// Groups related actions in the history window
    pub category: String,
    pub state: S,
    pub timestamp: DateTime<Local>,
}

impl<S> HistoryEntry<S> {
    pub fn new(description: impl Into<String>, category: impl Into<String>, state: S) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            state,
            timestamp: Local::now(),
        }
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

// ============ Undo History ============

#[derive(Debug)]
pub struct UndoHistory<S> {
    entries: VecDeque<HistoryEntry<S>>,
    current: usize,
    max_entries: usize,
}

impl<S: Clone> UndoHistory<S> {
    /// Start a history whose first entry is `initial`
    pub fn new(initial: S, description: impl Into<String>) -> Self {
        let mut entries = VecDeque::with_capacity(DEFAULT_MAX_ENTRIES);
        entries.push_back(HistoryEntry::new(description, "", initial));
        Self {
            entries,
            current: 0,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.set_max_entries(max);
        self
    }

    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max.max(1);
        self.trim();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a new state after the current entry
    pub fn push_state(
        &mut self,
        state: S,
        description: impl Into<String>,
        category: impl Into<String>,
    ) {
        self.entries.truncate(self.current + 1);
        let entry = HistoryEntry::new(description, category, state);
        log::debug!(
            "History: push \"{}\" [{}]",
            entry.description,
            entry.category
        );
        self.entries.push_back(entry);
        self.current = self.entries.len() - 1;
        self.trim();
    }

    /// Replace the current entry's state without adding a step
    pub fn modify_state(&mut self, state: S) {
        self.entries[self.current].state = state;
    }

    fn trim(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
            self.current = self.current.saturating_sub(1);
        }
    }

    pub fn current(&self) -> &HistoryEntry<S> {
        &self.entries[self.current]
    }

    pub fn current_state(&self) -> &S {
        &self.current().state
    }

    /// Step back; returns the state to apply
    pub fn undo(&mut self) -> Option<&S> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        Some(self.current_state())
    }

    /// Step forward; returns the state to apply
    pub fn redo(&mut self) -> Option<&S> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        Some(self.current_state())
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// Description of the action `undo` would revert
    pub fn undo_name(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.current].description.as_str())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.entries
            .get(self.current + 1)
            .map(|e| e.description.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<S>> {
        self.entries.iter()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_undo() {
        let mut history = UndoHistory::new(0, "Created");
        history.push_state(1, "One", "Edit");
        history.push_state(2, "Two", "Edit");

        assert_eq!(*history.current_state(), 2);
        assert_eq!(history.undo_name(), Some("Two"));
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo_name(), Some("One"));
        assert_eq!(history.redo(), Some(&1));
    }

    #[test]
    fn test_push_discards_redo() {
        let mut history = UndoHistory::new(0, "Created");
        history.push_state(1, "One", "Edit");
        history.undo();
        history.push_state(5, "Five", "Edit");

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(*history.current_state(), 5);
    }

    #[test]
    fn test_max_entries() {
        let mut history = UndoHistory::new(0, "Created").with_max_entries(3);
        for i in 1..=5 {
            history.push_state(i, format!("Step {}", i), "Edit");
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), 2);
        assert_eq!(*history.current_state(), 5);

        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(*history.current_state(), 3);
    }

    #[test]
    fn test_entry_metadata() {
        let mut history = UndoHistory::new((), "Created");
        history.push_state((), "Adjusted envelope.", "Envelope");
        let entry = history.current();
        assert_eq!(entry.category, "Envelope");
        assert_eq!(entry.formatted_time().len(), 8);
    }
}
