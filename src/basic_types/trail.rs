use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::smart_table_assert_simple;

/// A chronological log of state changes, segmented into checkpoints. Backtracking to an earlier
/// checkpoint drains the entries recorded after it, in reverse order, so the caller can undo
/// them.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// Index i holds the length of the entry log when checkpoint i + 1 was opened.
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T: Default` is not required.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            delimiters: Vec::default(),
            entries: Vec::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.delimiters.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// Drop back to `new_checkpoint`, handing the abandoned entries to the caller newest-first
    /// so they can be undone in the opposite order to which they were applied.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        smart_table_assert_simple!(new_checkpoint < self.current_checkpoint);

        let kept = self.delimiters[new_checkpoint];
        self.current_checkpoint = new_checkpoint;
        self.delimiters.truncate(new_checkpoint);
        self.entries.drain(kept..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
