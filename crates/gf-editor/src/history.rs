//! Undo/redo as a bounded stack of immutable list snapshots.
//!
//! Elements are plain data and every mutation is copy-on-write, so a
//! snapshot of the element list is a complete, self-contained undo step.
//! Drag gestures use **snapshot batching**: the list is captured at the
//! start of the gesture and compared at the end, so one gesture, span
//! rewrites and splice included, undoes in a single step.

use gf_core::model::Element;

/// Bounded undo/redo stacks with batch grouping for drag gestures.
pub struct History {
    undo_stack: Vec<Vec<Element>>,
    redo_stack: Vec<Vec<Element>>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured at the start of a batch.
    batch_snapshot: Option<Vec<Element>>,
    /// Whether any mutation occurred during the current batch.
    batch_dirty: bool,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group, capturing `current` as the undo snapshot.
    /// Mutations until `end_batch` are applied live but tracked as one
    /// atomic undo step.
    pub fn begin_batch(&mut self, current: &[Element]) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(current.to_vec());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// Close a batch group. When the outermost batch closes and something
    /// actually changed, the opening snapshot becomes one undo step.
    pub fn end_batch(&mut self, current: &[Element]) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            let snapshot = self.batch_snapshot.take();
            if self.batch_dirty
                && let Some(snapshot) = snapshot
                && snapshot.as_slice() != current
            {
                self.push_undo(snapshot);
                self.redo_stack.clear();
            }
            self.batch_dirty = false;
        }
    }

    /// Note a mutation about to happen, with `before` as the pre-mutation
    /// list. Inside a batch this only marks the batch dirty.
    pub fn record(&mut self, before: &[Element]) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.push_undo(before.to_vec());
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Vec<Element>) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last snapshot, exchanging it for `current`.
    pub fn undo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Reapply the last undone snapshot, exchanging it for `current`.
    pub fn redo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
