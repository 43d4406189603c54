//! Command-line argument parsing for the `textedit` tool
//!
//! Supports:
//! - Searching a file with the engine's wrap-around search
//! - Ranking completion candidates at a position
//! - Copying a range (or line) to the system clipboard
//!
//! Positions on the command line are 1-indexed `LINE:COL` pairs and are converted
//! to the engine's 0-indexed [`Position`] here.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use textedit_engine::editable::{Position, SearchFlags};

/// Drive the text editing engine from the command line
#[derive(Parser, Debug)]
#[command(name = "textedit", version, about = "Drive the text editing engine from the command line")]
pub struct CliArgs {
    /// Config file (defaults to ~/.config/textedit/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// TrueType/OpenType font used for pixel metrics
    #[arg(long, global = true, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Font size in pixels (used with --font)
    #[arg(long, global = true, default_value_t = 14.0)]
    pub font_size: f32,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find a pattern, wrapping around the end of the file
    Find(FindArgs),
    /// Rank completion candidates for the word left of a position
    Complete(CompleteArgs),
    /// Copy a range to the system clipboard (the whole line when no --to is given)
    Copy(CopyArgs),
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// File to search
    pub file: PathBuf,
    /// Text to look for
    pub pattern: String,
    /// Start position as LINE:COL
    #[arg(long, default_value = "1:1")]
    pub from: CliPosition,
    #[arg(short = 'c', long)]
    pub match_case: bool,
    #[arg(short = 'w', long)]
    pub whole_words: bool,
    #[arg(short = 'b', long)]
    pub backwards: bool,
    /// List every occurrence instead of the next one
    #[arg(long)]
    pub all: bool,
}

impl FindArgs {
    pub fn flags(&self) -> SearchFlags {
        let mut flags = SearchFlags::empty();
        flags.set(SearchFlags::MATCH_CASE, self.match_case);
        flags.set(SearchFlags::WHOLE_WORDS, self.whole_words);
        flags.set(SearchFlags::BACKWARDS, self.backwards);
        flags
    }
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// File to complete in
    pub file: PathBuf,
    /// Caret position as LINE:COL
    #[arg(long)]
    pub at: CliPosition,
    /// Candidate identifiers
    #[arg(required = true)]
    pub candidates: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    pub file: PathBuf,
    /// Range start (or the line to copy) as LINE:COL
    #[arg(long)]
    pub from: CliPosition,
    /// Range end as LINE:COL
    #[arg(long)]
    pub to: Option<CliPosition>,
}

/// A 1-indexed `LINE:COL` (or bare `LINE`) argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliPosition {
    pub line: usize,
    pub column: usize,
}

impl CliPosition {
    /// Convert from 1-indexed (user input) to 0-indexed (engine)
    pub fn to_position(self) -> Position {
        Position::new(self.line.saturating_sub(1), self.column.saturating_sub(1))
    }
}

impl FromStr for CliPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid position '{}', expected LINE:COL", s))
        };
        let (line, column) = match s.split_once(':') {
            Some((line, col)) => (parse(line)?, parse(col)?),
            None => (parse(s)?, 1),
        };
        if line == 0 || column == 0 {
            return Err(format!("position '{}' is 1-indexed", s));
        }
        Ok(Self { line, column })
    }
}
