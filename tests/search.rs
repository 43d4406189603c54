//! Search tests - find next, wrap-around, flags, highlight occurrences

mod common;

use common::{cursor, numbered_lines, test_edit, test_edit_with_selection};
use textedit_engine::editable::{line_matches, Position, SearchFlags};

// ========================================================================
// find_next
// ========================================================================

#[test]
fn test_find_next_walks_matches_and_wraps() {
    let mut edit = test_edit("alpha\nbeta alpha\ngamma", 0, 0);

    assert!(edit.find_next("alpha", SearchFlags::empty()));
    assert_eq!(edit.selection().from(), Position::new(0, 0));
    assert_eq!(cursor(&edit), (0, 5));

    assert!(edit.find_next("alpha", SearchFlags::empty()));
    assert_eq!(edit.selection().from(), Position::new(1, 5));
    assert_eq!(cursor(&edit), (1, 10));

    assert!(edit.find_next("alpha", SearchFlags::empty()));
    assert_eq!(edit.selection().from(), Position::new(0, 0));
}

#[test]
fn test_find_next_backwards_from_caret() {
    let mut edit = test_edit("ab ab", 0, 5);
    assert!(edit.find_next("ab", SearchFlags::BACKWARDS));
    assert_eq!(edit.selection().from(), Position::new(0, 3));

    assert!(edit.find_next("ab", SearchFlags::BACKWARDS));
    assert_eq!(edit.selection().from(), Position::new(0, 0));
}

#[test]
fn test_find_backwards_from_selection_at_line_start() {
    let mut edit = test_edit_with_selection("ab\nab", 1, 0, 1, 2);
    assert!(edit.find_next("ab", SearchFlags::BACKWARDS));
    assert_eq!(edit.selection().from(), Position::new(0, 0));
}

#[test]
fn test_find_whole_words_skips_embedded_match() {
    let mut edit = test_edit("cat concat cat", 0, 0);
    assert!(edit.find_next("cat", SearchFlags::WHOLE_WORDS));
    assert_eq!(edit.selection().from(), Position::new(0, 0));

    assert!(edit.find_next("cat", SearchFlags::WHOLE_WORDS));
    assert_eq!(edit.selection().from(), Position::new(0, 11));
}

#[test]
fn test_find_match_case() {
    let mut edit = test_edit("Foo foo FOO", 0, 0);
    assert!(edit.find_next("foo", SearchFlags::MATCH_CASE));
    assert_eq!(edit.selection().from(), Position::new(0, 4));
    assert_eq!(edit.get_selection_text(), "foo");
}

#[test]
fn test_find_scrolls_match_into_view() {
    let mut edit = test_edit(&numbered_lines(50), 0, 0);
    assert!(edit.find_next("line 40", SearchFlags::empty()));
    assert_eq!(cursor(&edit), (40, 7));
    assert_eq!(edit.get_v_scroll(), 31);
}

#[test]
fn test_find_not_found_keeps_selection() {
    let mut edit = test_edit_with_selection("hello", 0, 0, 0, 2);
    assert!(!edit.find_next("zzz", SearchFlags::empty()));
    assert_eq!(edit.get_selection_text(), "he");
}

// ========================================================================
// search
// ========================================================================

#[test]
fn test_search_rescans_start_line_on_wrap() {
    let edit = test_edit("x foo", 0, 0);
    assert_eq!(
        edit.search("foo", SearchFlags::empty(), 0, 3),
        Some(Position::new(0, 2))
    );
}

#[test]
fn test_search_backwards_wraps_to_last_line() {
    let edit = test_edit("one\ntwo\nthree two", 0, 0);
    assert_eq!(
        edit.search("two", SearchFlags::BACKWARDS, 0, 0),
        Some(Position::new(2, 6))
    );
}

#[test]
fn test_search_rejects_bad_input() {
    let edit = test_edit("abc", 0, 0);
    assert_eq!(edit.search("", SearchFlags::empty(), 0, 0), None);
    assert_eq!(edit.search("abc", SearchFlags::empty(), 3, 0), None);
}

#[test]
fn test_search_columns_count_chars() {
    let edit = test_edit("ñandú ñu", 0, 0);
    assert_eq!(
        edit.search("ñu", SearchFlags::empty(), 0, 1),
        Some(Position::new(0, 6))
    );
}

// ========================================================================
// Highlight occurrences
// ========================================================================

#[test]
fn test_line_matches_flags() {
    assert_eq!(
        line_matches("Abc abc ABC", "abc", SearchFlags::empty()),
        vec![0, 4, 8]
    );
    assert_eq!(
        line_matches("Abc abc ABC", "abc", SearchFlags::MATCH_CASE),
        vec![4]
    );
    assert!(line_matches("abc", "", SearchFlags::empty()).is_empty());
}

#[test]
fn test_search_occurrences_per_line() {
    let mut edit = test_edit("let x = x + 1;\nxx", 0, 0);
    edit.set_search_text("x");
    edit.set_search_flags(SearchFlags::WHOLE_WORDS);
    assert_eq!(edit.search_occurrences(0), vec![4, 8]);
    assert!(edit.search_occurrences(1).is_empty());
    assert!(edit.search_occurrences(9).is_empty());
    assert_eq!(edit.search_state().text, "x");
}
