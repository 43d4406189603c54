use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use textedit_engine::config::EditorConfig;
use textedit_engine::editable::{
    line_matches, rank_candidates, Clipboard, FontMetrics, FontdueMetrics, MemoryClipboard,
    MonospaceMetrics, Position, ScoredOption, SystemClipboard, TextEdit,
};
use textedit_engine::util::read_document;

mod cli;

use cli::{CliArgs, Command, CompleteArgs, CopyArgs, FindArgs};

#[derive(Debug, Serialize)]
struct Match {
    line: usize,
    column: usize,
    text: String,
}

#[derive(Debug, Serialize)]
struct Completion {
    base: String,
    options: Vec<ScoredOption>,
}

fn main() -> Result<()> {
    textedit_engine::tracing::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::load(),
    };
    let metrics = load_metrics(args.font.as_deref(), args.font_size)?;

    match &args.command {
        Command::Find(find) => {
            let edit = open(&find.file, &config, metrics, Box::new(MemoryClipboard::new()))?;
            run_find(&edit, find, args.json)
        }
        Command::Complete(complete) => {
            let mut edit = open(
                &complete.file,
                &config,
                metrics,
                Box::new(MemoryClipboard::new()),
            )?;
            run_complete(&mut edit, complete, args.json)
        }
        Command::Copy(copy) => {
            let mut edit = open(&copy.file, &config, metrics, Box::new(SystemClipboard))?;
            run_copy(&mut edit, copy, args.json)
        }
    }
}

fn load_metrics(font: Option<&Path>, px: f32) -> Result<Arc<dyn FontMetrics>> {
    let Some(path) = font else {
        return Ok(Arc::new(MonospaceMetrics::default()));
    };
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let metrics = FontdueMetrics::from_bytes(&bytes, px)?;
    tracing::debug!(font = %path.display(), px, "font metrics loaded");
    Ok(Arc::new(metrics))
}

fn open(
    path: &Path,
    config: &EditorConfig,
    metrics: Arc<dyn FontMetrics>,
    clipboard: Box<dyn Clipboard>,
) -> Result<TextEdit> {
    let text = read_document(path)?;
    let mut edit = TextEdit::new(config, metrics, clipboard)?;
    edit.set_text(&text);
    Ok(edit)
}

fn run_find(edit: &TextEdit, args: &FindArgs, json: bool) -> Result<()> {
    let flags = args.flags();
    let matches: Vec<Match> = if args.all {
        (0..edit.get_line_count())
            .flat_map(|line| {
                line_matches(edit.get_line(line), &args.pattern, flags)
                    .into_iter()
                    .map(move |column| (line, column))
            })
            .map(|(line, column)| to_match(edit, Position::new(line, column)))
            .collect()
    } else {
        let from = args.from.to_position();
        edit.search(&args.pattern, flags, from.line, from.column)
            .map(|pos| to_match(edit, pos))
            .into_iter()
            .collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("no match for '{}'", args.pattern);
    } else {
        for m in &matches {
            println!("{}:{}: {}", m.line, m.column, m.text);
        }
    }
    Ok(())
}

/// Report positions 1-indexed, like the input.
fn to_match(edit: &TextEdit, pos: Position) -> Match {
    Match {
        line: pos.line + 1,
        column: pos.column + 1,
        text: edit.get_line(pos.line).to_string(),
    }
}

fn run_complete(edit: &mut TextEdit, args: &CompleteArgs, json: bool) -> Result<()> {
    edit.set_cursor_position(args.at.to_position());
    edit.code_complete(args.candidates.clone());

    let completion = edit.is_completion_active().then(|| {
        let base = edit.completion().base.clone();
        let options = rank_candidates(&base, &args.candidates).unwrap_or_default();
        Completion { base, options }
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&completion)?);
    } else if let Some(completion) = completion {
        for option in &completion.options {
            println!("{:.3}\t{}", option.score, option.text);
        }
    } else {
        println!("nothing to complete");
    }
    Ok(())
}

fn run_copy(edit: &mut TextEdit, args: &CopyArgs, json: bool) -> Result<()> {
    let from = args.from.to_position();
    match args.to {
        Some(to) => {
            let to = to.to_position();
            edit.select(from.line, from.column, to.line, to.column);
        }
        None => edit.set_cursor_position(from),
    }
    let copied = if edit.is_selection_active() {
        edit.get_selection_text()
    } else {
        edit.get_line(edit.cursor_get_line()).to_string()
    };
    edit.copy();

    if json {
        println!("{}", serde_json::json!({ "copied": copied }));
    } else {
        println!("copied {} chars", copied.chars().count());
    }
    Ok(())
}
