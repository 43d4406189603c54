//! Pointer input: clicks, multi-clicks, drag selection, gutter and wheel.

use std::time::Instant;

use crate::util::text::{char_type, CharType};

use super::buffer::TextBuffer;
use super::cursor::Position;
use super::notify::EditorEvent;
use super::selection::SelectingMode;
use super::state::TextEdit;

/// Rows scrolled per wheel notch.
pub const WHEEL_ROWS: usize = 3;

/// Which part of the widget was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerArea {
    Text,
    BreakpointGutter,
}

/// A primary-button press. Coordinates are relative to the text area origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub area: PointerArea,
    pub x: usize,
    pub y: usize,
    pub shift: bool,
    /// The platform reported this press as a double-click
    pub double_click: bool,
    pub at: Instant,
}

impl PointerEvent {
    pub fn click(x: usize, y: usize) -> Self {
        Self {
            area: PointerArea::Text,
            x,
            y,
            shift: false,
            double_click: false,
            at: Instant::now(),
        }
    }
}

impl TextEdit {
    /// Primary button pressed.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        let pos = self.position_at_point(event.x, event.y);

        if event.area == PointerArea::BreakpointGutter {
            let toggled = !self.is_line_set_as_breakpoint(pos.line);
            self.set_line_as_breakpoint(pos.line, toggled);
            self.notifier.push(EditorEvent::BreakpointToggled(pos.line));
            return;
        }

        let prev = self.cursor.position();
        self.cursor_set_line(pos.line, false);
        self.cursor_set_column(pos.column, true);
        let cursor = self.cursor.position();

        if event.shift && cursor != prev {
            self.extend_with_shift_click(prev, cursor);
        } else {
            self.selection.active = false;
            self.selection.selecting_mode = SelectingMode::Pointer;
            self.selection.set_anchor(pos);
        }

        let triple = !event.double_click
            && self.last_double_click.is_some_and(|(t, row)| {
                event.at.saturating_duration_since(t) < self.options.triple_click
                    && row == cursor.line
                    && cursor.line == prev.line
            });

        if triple {
            let len = self.text.line_length(cursor.line);
            self.set_selection(Position::new(cursor.line, 0), Position::new(cursor.line, len));
            self.last_double_click = None;
        } else if event.double_click && self.text.line_length(cursor.line) > 0 {
            if let Some((begin, end)) = self.word_bounds_at(cursor) {
                self.set_selection(Position::new(cursor.line, begin), Position::new(cursor.line, end));
            }
            self.last_double_click = Some((event.at, cursor.line));
        }
        self.notifier.redraw();
    }

    fn extend_with_shift_click(&mut self, prev: Position, cursor: Position) {
        let sel = &mut self.selection;
        if !sel.active {
            let swapped = sel.set_range(prev, cursor);
            sel.active = true;
            sel.selecting_mode = SelectingMode::Pointer;
            sel.shiftclick_left = !swapped;
            sel.set_anchor(prev);
        } else {
            let anchor = sel.anchor();
            let swapped = sel.set_range(anchor, cursor);
            sel.shiftclick_left = !swapped;
        }
        self.notifier.redraw();
    }

    /// Run of same-class characters around `pos` for double-click selection.
    /// `None` on whitespace.
    fn word_bounds_at(&self, pos: Position) -> Option<(usize, usize)> {
        let line: Vec<char> = self.text.line(pos.line).chars().collect();
        let col = pos.column.min(line.len());
        let class = match line.get(col) {
            Some(&c) => char_type(c),
            None => CharType::WordChar,
        };
        if class == CharType::Whitespace {
            return None;
        }

        let mut begin = col;
        while begin > 0 && char_type(line[begin - 1]) == class {
            begin -= 1;
        }
        let mut end = col;
        while end < line.len() && char_type(line[end]) == class {
            end += 1;
        }
        Some((begin, end))
    }

    /// Pointer moved with the primary button held.
    pub fn pointer_drag(&mut self, x: usize, y: usize) {
        if self.selection.selecting_mode == SelectingMode::None {
            return;
        }
        let pos = self.position_at_point(x, y);
        let anchor = self.selection.anchor();
        self.set_selection(anchor, pos);
        self.cursor_set_line(pos.line, false);
        self.cursor_set_column(pos.column, true);
    }

    /// Wheel notches: positive scrolls down.
    pub fn pointer_wheel(&mut self, notches: isize) {
        let rows = notches.unsigned_abs().saturating_mul(WHEEL_ROWS);
        let ofs = self.get_v_scroll();
        if notches < 0 {
            self.set_v_scroll(ofs.saturating_sub(rows));
        } else {
            self.set_v_scroll(ofs.saturating_add(rows));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // 10px cells, 24px rows
    fn editor(text: &str) -> TextEdit {
        let mut edit = TextEdit::from_text(text);
        edit.set_viewport_size(400, 240);
        edit
    }

    fn at(x: usize, y: usize, time: Instant) -> PointerEvent {
        PointerEvent {
            at: time,
            ..PointerEvent::click(x, y)
        }
    }

    #[test]
    fn test_click_places_cursor_and_deselects() {
        let mut edit = editor("hello\nworld");
        edit.select_all();
        edit.pointer_down(PointerEvent::click(21, 30));
        assert_eq!(edit.cursor_position(), Position::new(1, 2));
        assert!(!edit.is_selection_active());
        assert_eq!(edit.selection().selecting_mode, SelectingMode::Pointer);
    }

    #[test]
    fn test_drag_selects_from_anchor() {
        let mut edit = editor("hello\nworld");
        edit.pointer_down(PointerEvent::click(21, 30));
        edit.pointer_drag(0, 0);
        assert_eq!(edit.get_selection_text(), "hello\nwo");
        assert_eq!(edit.cursor_position(), Position::new(0, 0));
    }

    #[test]
    fn test_shift_click_extends() {
        let mut edit = editor("abcdefgh");
        edit.pointer_down(PointerEvent::click(20, 0));
        edit.pointer_down(PointerEvent {
            shift: true,
            ..PointerEvent::click(60, 0)
        });
        assert_eq!(edit.get_selection_text(), "cdef");
        assert!(edit.selection().shiftclick_left);

        // second shift-click before the anchor flips the caret end
        edit.pointer_down(PointerEvent {
            shift: true,
            ..PointerEvent::click(0, 0)
        });
        assert_eq!(edit.selection().from(), Position::new(0, 0));
        assert!(!edit.selection().shiftclick_left);
    }

    #[test]
    fn test_double_click_selects_word() {
        let mut edit = editor("let foo_bar = 1;");
        edit.pointer_down(PointerEvent {
            double_click: true,
            ..PointerEvent::click(61, 0)
        });
        assert_eq!(edit.get_selection_text(), "foo_bar");
    }

    #[test]
    fn test_double_click_on_whitespace_selects_nothing() {
        let mut edit = editor("a   b");
        edit.pointer_down(PointerEvent {
            double_click: true,
            ..PointerEvent::click(21, 0)
        });
        assert!(!edit.is_selection_active());
    }

    #[test]
    fn test_shift_click_extends_from_select_anchor() {
        let mut edit = editor("abcdefghij");
        edit.pointer_down(PointerEvent::click(90, 0));
        edit.select(0, 5, 0, 8);
        edit.pointer_down(PointerEvent {
            shift: true,
            ..PointerEvent::click(21, 0)
        });
        let sel = edit.selection();
        assert!(sel.from() <= sel.to());
        assert_eq!(edit.get_selection_text(), "cde");
        assert!(!sel.shiftclick_left);
    }

    #[test]
    fn test_drag_after_double_click_keeps_word_anchor() {
        let mut edit = editor("one two three");
        edit.pointer_down(PointerEvent {
            double_click: true,
            ..PointerEvent::click(51, 0)
        });
        assert_eq!(edit.get_selection_text(), "two");
        edit.pointer_drag(130, 0);
        assert_eq!(edit.get_selection_text(), "two three");
    }

    #[test]
    fn test_triple_click_selects_line() {
        let mut edit = editor("one two\nthree");
        let t0 = Instant::now();
        edit.pointer_down(at(11, 0, t0));
        edit.pointer_down(PointerEvent {
            double_click: true,
            ..at(11, 0, t0 + Duration::from_millis(100))
        });
        edit.pointer_down(at(11, 0, t0 + Duration::from_millis(200)));
        assert_eq!(edit.get_selection_text(), "one two");
    }

    #[test]
    fn test_slow_third_click_is_plain() {
        let mut edit = editor("one two");
        let t0 = Instant::now();
        edit.pointer_down(PointerEvent {
            double_click: true,
            ..at(11, 0, t0)
        });
        edit.pointer_down(at(11, 0, t0 + Duration::from_secs(2)));
        assert!(!edit.is_selection_active());
    }

    #[test]
    fn test_gutter_click_toggles_breakpoint() {
        let mut edit = editor("a\nb\nc");
        edit.drain_events();
        let event = PointerEvent {
            area: PointerArea::BreakpointGutter,
            ..PointerEvent::click(0, 50)
        };
        edit.pointer_down(event);
        assert_eq!(edit.get_breakpoints(), vec![2]);
        assert!(edit
            .drain_events()
            .contains(&EditorEvent::BreakpointToggled(2)));
        edit.pointer_down(event);
        assert!(edit.get_breakpoints().is_empty());
        assert_eq!(edit.cursor_position(), Position::zero());
    }

    #[test]
    fn test_wheel_scrolls_three_rows() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut edit = editor(&text);
        edit.pointer_wheel(2);
        assert_eq!(edit.get_v_scroll(), 6);
        edit.pointer_wheel(-1);
        assert_eq!(edit.get_v_scroll(), 3);
    }
}
