//! Benchmarks for completion ranking
//!
//! Run with: cargo bench --bench completion

use textedit_engine::editable::{is_subsequence_ci, rank_candidates, Position, TextEdit};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Identifier-like candidates: `get_value_0`, `set_count_1`, ...
fn candidates(count: usize) -> Vec<String> {
    const VERBS: [&str; 6] = ["get", "set", "update", "print", "parse", "render"];
    const NOUNS: [&str; 5] = ["value", "count", "node", "position", "buffer"];
    (0..count)
        .map(|i| format!("{}_{}_{}", VERBS[i % VERBS.len()], NOUNS[i % NOUNS.len()], i))
        .collect()
}

// ============================================================================
// Ranking
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn rank_prefix(bencher: divan::Bencher, count: usize) {
    let cands = candidates(count);
    bencher.bench_local(|| divan::black_box(rank_candidates("get", &cands)));
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn rank_fuzzy(bencher: divan::Bencher, count: usize) {
    let cands = candidates(count);
    bencher.bench_local(|| divan::black_box(rank_candidates("pnd", &cands)));
}

#[divan::bench(args = [100, 1_000])]
fn rank_empty_prefix(bencher: divan::Bencher, count: usize) {
    let cands = candidates(count);
    bencher.bench_local(|| divan::black_box(rank_candidates("", &cands)));
}

#[divan::bench]
fn subsequence_miss() {
    let hay = "render_position_buffer_with_a_long_name";
    divan::black_box(is_subsequence_ci("zzz", hay));
}

// ============================================================================
// Session
// ============================================================================

/// Typing while the popup is open re-ranks after every key
#[divan::bench(args = [1_000, 10_000])]
fn type_with_popup_open(bencher: divan::Bencher, count: usize) {
    let cands = candidates(count);
    bencher
        .with_inputs(|| {
            let mut edit = TextEdit::from_text("obj.g");
            edit.set_cursor_position(Position::new(0, 5));
            edit.code_complete(cands.clone());
            edit
        })
        .bench_local_values(|mut edit| {
            for ch in "et_v".chars() {
                edit.type_char(ch);
                edit.update_completion_candidates();
            }
            edit
        });
}
