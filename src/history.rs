//! In-memory command history and the ghost-text provider built on it

use std::collections::VecDeque;

use shellkit_core::SuggestionProvider;

/// Bounded list of submitted lines, oldest first.
///
/// Blank lines and immediate repeats of the newest entry are not recorded.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Record a line. Returns whether it was stored.
    pub fn add(&mut self, line: &str) -> bool {
        if self.capacity == 0 || line.trim().is_empty() {
            return false;
        }
        if self.entries.back().map(String::as_str) == Some(line) {
            return false;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry by age, 0 being the oldest
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Position while walking history with Up/Down.
///
/// The line being typed when the walk started is kept as a draft and comes
/// back after stepping past the newest entry.
#[derive(Debug, Default)]
pub struct HistoryCursor {
    position: Option<usize>,
    draft: String,
}

impl HistoryCursor {
    /// Step to the next older entry. `None` when there is nothing older.
    pub fn older<'h>(&mut self, history: &'h History, current: &str) -> Option<&'h str> {
        let position = match self.position {
            None if history.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                history.len() - 1
            }
            Some(0) => return None,
            Some(p) => p - 1,
        };
        self.position = Some(position);
        history.get(position)
    }

    /// Step to the next newer entry, or back to the draft. `None` when not
    /// walking history.
    pub fn newer(&mut self, history: &History) -> Option<String> {
        let position = self.position?;
        if position + 1 < history.len() {
            self.position = Some(position + 1);
            history.get(position + 1).map(str::to_string)
        } else {
            self.position = None;
            Some(std::mem::take(&mut self.draft))
        }
    }

    pub fn is_browsing(&self) -> bool {
        self.position.is_some()
    }

    pub fn reset(&mut self) {
        self.position = None;
        self.draft.clear();
    }
}

/// Suggests the rest of the most recent history entry that extends the input
#[derive(Debug, Clone, Default)]
pub struct HistorySuggester {
    entries: Vec<String>,
}

impl HistorySuggester {
    /// Snapshot of `history` at the time the line starts
    pub fn from_history(history: &History) -> Self {
        Self {
            entries: history.iter().map(str::to_string).collect(),
        }
    }
}

impl SuggestionProvider for HistorySuggester {
    fn suggest(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .filter_map(|entry| entry.strip_prefix(input))
            .find(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}
