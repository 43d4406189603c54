//! Tracing setup and cursor-state diffing
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=cursor=debug` - cursor/selection diffs per message
//! - `RUST_LOG=textedit_engine::editable=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/textedit/logs/textedit.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::TextEdit;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). The file layer, when the
/// log directory can be created, always records at debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "textedit.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of cursor/selection state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub line: usize,
    pub column: usize,
    pub selection: Option<((usize, usize), (usize, usize))>,
    pub line_ofs: usize,
    pub completion_active: bool,
}

impl CursorSnapshot {
    pub fn from_edit(edit: &TextEdit) -> Self {
        let cursor = edit.cursor();
        let sel = edit.selection();
        Self {
            line: cursor.line,
            column: cursor.column,
            selection: sel
                .active
                .then(|| ((sel.from_line, sel.from_col), (sel.to_line, sel.to_col))),
            line_ofs: cursor.line_ofs,
            completion_active: edit.is_completion_active(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CursorSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.line != other.line || self.column != other.column {
            changes.push(format!(
                "cursor ({},{}) → ({},{})",
                self.line, self.column, other.line, other.column
            ));
        }
        if self.selection != other.selection {
            match other.selection {
                Some((from, to)) => changes.push(format!(
                    "selection {}:{}..{}:{}",
                    from.0, from.1, to.0, to.1
                )),
                None => changes.push("selection cleared".to_string()),
            }
        }
        if self.line_ofs != other.line_ofs {
            changes.push(format!("scroll {} → {}", self.line_ofs, other.line_ofs));
        }
        if self.completion_active != other.completion_active {
            let status = if other.completion_active {
                "opened"
            } else {
                "closed"
            };
            changes.push(format!("completion {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
