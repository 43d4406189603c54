//! Deferred, coalesced notifications raised to the host.
//!
//! Mutations only mark things dirty. The host drains the queue once per processed
//! event batch and sees at most one of each coalesced event per drain.

use bitflags::bitflags;

/// Something the host should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    TextChanged,
    CursorChanged,
    /// The caret sits after completable text; the host should call `code_complete`.
    RequestCompletion,
    /// A gutter click toggled the breakpoint on this row.
    BreakpointToggled(usize),
    RedrawRequested,
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct Dirty: u8 {
        const TEXT = 1 << 0;
        const CURSOR = 1 << 1;
        const REDRAW = 1 << 2;
    }
}

#[derive(Debug, Default)]
pub struct Notifier {
    queue: Vec<EditorEvent>,
    dirty: Dirty,
}

impl Notifier {
    fn mark(&mut self, flag: Dirty, event: EditorEvent) {
        if !self.dirty.contains(flag) {
            self.dirty.insert(flag);
            self.queue.push(event);
        }
    }

    pub fn text_changed(&mut self) {
        self.mark(Dirty::TEXT, EditorEvent::TextChanged);
        self.redraw();
    }

    pub fn cursor_changed(&mut self) {
        self.mark(Dirty::CURSOR, EditorEvent::CursorChanged);
        self.redraw();
    }

    pub fn redraw(&mut self) {
        self.mark(Dirty::REDRAW, EditorEvent::RedrawRequested);
    }

    /// Not coalesced: every request and toggle is delivered.
    pub fn push(&mut self, event: EditorEvent) {
        self.queue.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.dirty = Dirty::empty();
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesces_until_drained() {
        let mut notifier = Notifier::default();
        notifier.text_changed();
        notifier.text_changed();
        notifier.cursor_changed();
        notifier.text_changed();

        assert_eq!(
            notifier.drain(),
            vec![
                EditorEvent::TextChanged,
                EditorEvent::RedrawRequested,
                EditorEvent::CursorChanged,
            ]
        );
        assert!(notifier.is_empty());

        notifier.text_changed();
        assert_eq!(
            notifier.drain(),
            vec![EditorEvent::TextChanged, EditorEvent::RedrawRequested]
        );
    }

    #[test]
    fn test_pushed_events_are_not_coalesced() {
        let mut notifier = Notifier::default();
        notifier.push(EditorEvent::BreakpointToggled(3));
        notifier.push(EditorEvent::BreakpointToggled(3));
        assert_eq!(notifier.drain().len(), 2);
    }
}
