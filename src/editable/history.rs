//! Undo/redo log with coalescing and grouping.
//!
//! Committed operations live in a vector; `position` splits it into the applied
//! prefix and the redoable suffix. The operation being typed is held in `pending`
//! until something breaks the run (a cursor jump, a different kind of edit, an
//! undo, a group boundary).

use super::cursor::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Insert,
    Remove,
    /// Whole-document removal
    Clear,
}

/// A single undo unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub kind: OpKind,
    pub from_line: usize,
    pub from_col: usize,
    pub to_line: usize,
    pub to_col: usize,
    /// Inserted text for `Insert`, removed text otherwise
    pub text: String,
    pub version: u64,
    pub prev_version: u64,
    /// First operation of a group
    pub chain_forward: bool,
    /// Last operation of a group
    pub chain_backward: bool,
}

impl EditOperation {
    fn new(kind: OpKind, from: Position, to: Position, text: String) -> Self {
        Self {
            kind,
            from_line: from.line,
            from_col: from.column,
            to_line: to.line,
            to_col: to.column,
            text,
            version: 0,
            prev_version: 0,
            chain_forward: false,
            chain_backward: false,
        }
    }

    pub fn from(&self) -> Position {
        Position::new(self.from_line, self.from_col)
    }

    pub fn to(&self) -> Position {
        Position::new(self.to_line, self.to_col)
    }

    /// Where the caret goes after this operation is undone.
    pub fn undo_cursor(&self) -> Position {
        match self.kind {
            OpKind::Insert => self.from(),
            OpKind::Remove | OpKind::Clear => self.to(),
        }
    }

    /// Where the caret goes after this operation is redone.
    pub fn redo_cursor(&self) -> Position {
        match self.kind {
            OpKind::Insert => self.to(),
            OpKind::Remove | OpKind::Clear => self.from(),
        }
    }
}

/// Linear undo history.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    ops: Vec<EditOperation>,
    /// `ops[..position]` are applied, `ops[position..]` can be redone
    position: usize,
    pending: Option<EditOperation>,
    last_version: u64,
    current_version: u64,
    saved_version: u64,
    group_depth: usize,
    group_start: Option<usize>,
    max_ops: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that evicts the oldest groups beyond `max_ops` committed operations.
    pub fn with_max_ops(max_ops: usize) -> Self {
        Self {
            max_ops: Some(max_ops.max(1)),
            ..Self::default()
        }
    }

    pub fn set_max_ops(&mut self, max_ops: Option<usize>) {
        self.max_ops = max_ops.map(|n| n.max(1));
        self.enforce_limit();
    }

    // =========================================================================
    // Recording
    // =========================================================================

    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }

    /// Record an insert of `text` spanning `from..to`. Merges into the pending
    /// insert when it continues exactly where that one ended.
    pub fn record_insert(&mut self, from: Position, to: Position, text: &str) {
        let version = self.next_version();
        match &mut self.pending {
            Some(op) if op.kind == OpKind::Insert && op.to() == from => {
                op.text.push_str(text);
                op.to_line = to.line;
                op.to_col = to.column;
                op.version = version;
            }
            _ => self.start_pending(OpKind::Insert, from, to, text.to_string(), version),
        }
        self.current_version = version;
    }

    /// Record removal of `text` from `from..to`. Merges into the pending remove
    /// when it ends where that one started (backspacing).
    pub fn record_remove(&mut self, from: Position, to: Position, text: &str) {
        let version = self.next_version();
        match &mut self.pending {
            Some(op) if op.kind == OpKind::Remove && op.from() == to => {
                op.text.insert_str(0, text);
                op.from_line = from.line;
                op.from_col = from.column;
                op.version = version;
            }
            _ => self.start_pending(OpKind::Remove, from, to, text.to_string(), version),
        }
        self.current_version = version;
    }

    /// Record a whole-document clear. Never merges.
    pub fn record_clear(&mut self, to: Position, text: &str) {
        let version = self.next_version();
        self.start_pending(OpKind::Clear, Position::zero(), to, text.to_string(), version);
        self.current_version = version;
    }

    fn start_pending(
        &mut self,
        kind: OpKind,
        from: Position,
        to: Position,
        text: String,
        version: u64,
    ) {
        self.flush();
        let mut op = EditOperation::new(kind, from, to, text);
        op.version = version;
        op.prev_version = self.current_version;
        self.pending = Some(op);
    }

    /// Commit the pending operation so the next edit cannot merge into it.
    pub fn flush(&mut self) {
        if let Some(op) = self.pending.take() {
            self.ops.push(op);
            self.position = self.ops.len();
            self.enforce_limit();
        }
    }

    /// Drop everything after the redo pointer. Called before any new edit.
    pub fn clear_redo(&mut self) {
        if self.position < self.ops.len() {
            tracing::trace!(dropped = self.ops.len() - self.position, "discarding redo history");
            self.ops.truncate(self.position);
            if let Some(start) = self.group_start.as_mut() {
                *start = (*start).min(self.position);
            }
        }
    }

    fn enforce_limit(&mut self) {
        let Some(max) = self.max_ops else { return };
        if self.group_depth > 0 {
            return;
        }
        while self.ops.len() > max {
            let n = if self.ops[0].chain_forward {
                self.ops
                    .iter()
                    .position(|op| op.chain_backward)
                    .map_or(self.ops.len(), |i| i + 1)
            } else {
                1
            };
            if n > self.position {
                break;
            }
            self.ops.drain(..n);
            self.position -= n;
        }
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// Start a group. Groups nest; only the outermost pair delimits the undo unit.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.flush();
            self.group_start = Some(self.ops.len());
        }
        self.group_depth += 1;
    }

    /// Close a group, chaining its operations so one undo reverts all of them.
    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            tracing::warn!("end_complex_operation without matching begin");
            return;
        }
        if self.group_depth > 1 {
            self.group_depth -= 1;
            return;
        }

        self.flush();
        self.group_depth = 0;
        if let Some(start) = self.group_start.take() {
            let last = self.ops.len().saturating_sub(1);
            if start < last {
                self.ops[start].chain_forward = true;
                self.ops[last].chain_backward = true;
                tracing::debug!(ops = last - start + 1, "closed edit group");
            }
        }
        self.enforce_limit();
    }

    pub fn in_group(&self) -> bool {
        self.group_depth > 0
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Step back over one operation or one whole group. Returns the operations to
    /// revert, most recent first.
    pub fn undo(&mut self) -> Option<Vec<EditOperation>> {
        self.flush();
        if self.position == 0 {
            return None;
        }

        let end = self.position;
        let mut start = end - 1;
        if self.ops[start].chain_backward {
            while start > 0 && !self.ops[start].chain_forward {
                start -= 1;
            }
        }

        self.position = start;
        self.current_version = self.ops[start].prev_version;
        if let Some(group_start) = self.group_start.as_mut() {
            *group_start = (*group_start).min(start);
        }
        Some(self.ops[start..end].iter().rev().cloned().collect())
    }

    /// Step forward over one operation or one whole group. Returns the operations
    /// to re-apply, oldest first.
    pub fn redo(&mut self) -> Option<Vec<EditOperation>> {
        if self.pending.is_some() || self.position == self.ops.len() {
            return None;
        }

        let start = self.position;
        let mut end = start;
        if self.ops[start].chain_forward {
            while end + 1 < self.ops.len() && !self.ops[end].chain_backward {
                end += 1;
            }
        }

        self.position = end + 1;
        self.current_version = self.ops[end].version;
        Some(self.ops[start..=end].to_vec())
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0 || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && self.position < self.ops.len()
    }

    /// Forget everything. The current document becomes the saved baseline.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.position = 0;
        self.pending = None;
        self.current_version = 0;
        self.saved_version = 0;
        if self.group_depth > 0 {
            self.group_start = Some(0);
        }
    }

    // =========================================================================
    // Versions and inspection
    // =========================================================================

    /// Version of the current document state.
    pub fn version(&self) -> u64 {
        self.current_version
    }

    pub fn saved_version(&self) -> u64 {
        self.saved_version
    }

    pub fn tag_saved_version(&mut self) {
        self.saved_version = self.current_version;
    }

    pub fn is_dirty(&self) -> bool {
        self.current_version != self.saved_version
    }

    pub fn pending(&self) -> Option<&EditOperation> {
        self.pending.as_ref()
    }

    /// Committed operations, applied and redoable.
    pub fn operations(&self) -> &[EditOperation] {
        &self.ops
    }

    /// Undo units available: committed operations before the pointer plus the
    /// pending one.
    pub fn undo_count(&self) -> usize {
        self.position + usize::from(self.pending.is_some())
    }

    pub fn redo_count(&self) -> usize {
        self.ops.len() - self.position
    }
}
