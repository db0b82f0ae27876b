//! Undo history - bounded snapshot stack
//!
//! A snapshot is captured *before* every mutation is applied, so one pop
//! reverts the whole unit of work that followed it (a single field edit or
//! a multi-field planner edit alike). Document, brand, and layout always
//! travel together.

use std::collections::VecDeque;

use site_types::{BrandProfile, Layout, SiteDocument};

/// Maximum retained snapshots; the oldest entry is evicted first.
pub const UNDO_LIMIT: usize = 20;

/// Immutable deep copy of the editable session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub content: SiteDocument,
    pub brand: BrandProfile,
    pub layout: Layout,
}

#[derive(Debug, Default)]
pub struct UndoStack {
    entries: VecDeque<Snapshot>,
}

impl UndoStack {
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == UNDO_LIMIT {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Most recent snapshot; `None` on an empty stack (undo is a no-op).
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_with_headline(headline: &str) -> Snapshot {
        Snapshot {
            content: SiteDocument::new().set_path("hero.headline", json!(headline)),
            brand: BrandProfile::default(),
            layout: Layout::Classic,
        }
    }

    #[test]
    fn pops_in_lifo_order() {
        let mut stack = UndoStack::default();
        stack.push(snapshot_with_headline("first"));
        stack.push(snapshot_with_headline("second"));

        let top = stack.pop().unwrap();
        assert_eq!(top.content.get_path("hero.headline"), Some(&json!("second")));
        let next = stack.pop().unwrap();
        assert_eq!(next.content.get_path("hero.headline"), Some(&json!("first")));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut stack = UndoStack::default();
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn twenty_first_push_evicts_the_oldest() {
        let mut stack = UndoStack::default();
        for i in 0..=UNDO_LIMIT {
            stack.push(snapshot_with_headline(&format!("v{i}")));
        }
        assert_eq!(stack.depth(), UNDO_LIMIT);

        // Drain to the bottom: v0 is gone, v1 is the oldest survivor.
        let mut last = None;
        while let Some(snapshot) = stack.pop() {
            last = Some(snapshot);
        }
        assert_eq!(
            last.unwrap().content.get_path("hero.headline"),
            Some(&json!("v1"))
        );
    }
}
