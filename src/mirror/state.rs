//! Deduplication state of the polling loop

use std::collections::{HashSet, VecDeque};

/// Titles already processed during this run.
///
/// Unbounded by default: the set only grows until the process exits. With a
/// capacity, the oldest inserted title is forgotten first.
#[derive(Debug, Clone, Default)]
pub struct SeenTitles {
    titles: HashSet<String>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl SeenTitles {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Insert a title; returns false if it was already present
    pub fn insert(&mut self, title: &str) -> bool {
        if self.titles.contains(title) {
            return false;
        }
        if let Some(capacity) = self.capacity {
            while self.order.len() >= capacity {
                if let Some(oldest) = self.order.pop_front() {
                    log::debug!("Forgetting seen title: {}", oldest);
                    self.titles.remove(&oldest);
                }
            }
            self.order.push_back(title.to_string());
        }
        self.titles.insert(title.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// `(last_title, seen_titles)` of the polling loop
#[derive(Debug, Clone, Default)]
pub struct DedupState {
    last_title: Option<String>,
    seen: SeenTitles,
}

impl DedupState {
    pub fn new(seen: SeenTitles) -> Self {
        Self {
            last_title: None,
            seen,
        }
    }

    /// A title is new when it differs from the last one and was never seen
    pub fn is_new(&self, title: &str) -> bool {
        self.last_title.as_deref() != Some(title) && !self.seen.contains(title)
    }

    /// Record a title as processed, whatever the outcome of mirroring it
    pub fn mark_processed(&mut self, title: &str) {
        self.seen.insert(title);
        self.last_title = Some(title.to_string());
    }

    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    pub fn seen(&self) -> &SeenTitles {
        &self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_then_still_playing() {
        let mut state = DedupState::default();
        assert!(state.is_new("Song A"));

        state.mark_processed("Song A");
        assert!(!state.is_new("Song A"));
        assert_eq!(state.last_title(), Some("Song A"));
    }

    #[test]
    fn test_replay_after_other_song_is_not_new() {
        let mut state = DedupState::default();
        state.mark_processed("Song A");
        state.mark_processed("Song B");

        assert!(!state.is_new("Song A"));
        assert_eq!(state.seen().len(), 2);
    }

    #[test]
    fn test_unbounded_never_forgets() {
        let mut seen = SeenTitles::unbounded();
        for i in 0..1000 {
            assert!(seen.insert(&format!("title {}", i)));
        }
        assert_eq!(seen.len(), 1000);
        assert!(seen.contains("title 0"));
        assert!(!seen.insert("title 0"));
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let mut seen = SeenTitles::with_capacity(2);
        seen.insert("a");
        seen.insert("b");
        seen.insert("a");
        seen.insert("c");

        assert!(!seen.contains("a"));
        assert!(seen.contains("b"));
        assert!(seen.contains("c"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_evicted_title_is_new_again_once_last_title_moves_on() {
        let mut state = DedupState::new(SeenTitles::with_capacity(1));
        state.mark_processed("Song A");
        state.mark_processed("Song B");

        assert!(state.is_new("Song A"));
        assert!(!state.is_new("Song B"));
    }
}
