//! Human-readable diagnostic output with optional ANSI color.
//!
//! With source text attached, labels are rendered as annotated snippets:
//!
//! ```text
//! error [E6011]: can only concatenate str (not "int") to str
//!   --> demo.py:2:7
//!    |
//!  2 | y = "a" + 1
//!    |     ^~~~~~~ cannot add `str` and `int`
//!    |
//!   = help: convert with `str(...)`
//! ```
//!
//! Without it, spans are printed as byte ranges.

use std::io::{self, Write};

use pyx_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label, Severity};

use super::DiagnosticEmitter;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Number of decimal digits in `n`, for gutter width.
pub(crate) fn digit_count(mut n: u32) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl TerminalEmitter<'_, io::Stdout> {
    pub fn stdout(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stdout(), mode, is_tty)
    }
}

impl TerminalEmitter<'_, io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

/// Source text and its line table, attached for snippet rendering.
struct SourceView<'a> {
    text: &'a str,
    lines: LineOffsetTable,
    path: String,
}

pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceView<'src>>,
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
        }
    }

    /// Attach the source the diagnostics' spans point into.
    #[must_use]
    pub fn with_source(mut self, text: &'src str) -> Self {
        let path = self
            .source
            .take()
            .map_or_else(|| "<input>".to_string(), |s| s.path);
        self.source = Some(SourceView {
            text,
            lines: LineOffsetTable::build(text),
            path,
        });
        self
    }

    /// File name shown in `-->` headers. Has no effect without a source.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        if let Some(source) = &mut self.source {
            source.path = path.into();
        }
        self
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.write_colored(&severity.to_string(), color);
    }

    fn label_color(label: &Label) -> &'static str {
        if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        }
    }

    fn emit_fallback_labels(&mut self, labels: &[Label]) {
        for label in labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            self.write_colored(&label.message, Self::label_color(label));
            let _ = writeln!(self.writer);
        }
    }

    fn emit_snippet(&mut self, diagnostic: &Diagnostic) {
        let Some(source) = self.source.as_ref() else {
            return;
        };

        // Resolve every label to (line, column, width) up front so the
        // borrow of `source` ends before writing.
        let mut resolved: Vec<(u32, usize, usize, &Label)> = Vec::new();
        for label in &diagnostic.labels {
            let (line, col) = source.lines.offset_to_line_col(source.text, label.span.start);
            let line_text = source.lines.line_text(source.text, line);
            let width = underline_width(source, label.span, line, line_text);
            resolved.push((line, col as usize, width, label));
        }
        resolved.sort_by_key(|(line, col, _, _)| (*line, *col));

        let header = diagnostic
            .primary_span()
            .map(|span| source.lines.offset_to_line_col(source.text, span.start))
            .or_else(|| resolved.first().map(|(l, c, _, _)| (*l, *c as u32)));
        let path = source.path.clone();
        let text = source.text;
        let table = source.lines.clone();
        let gutter = resolved
            .iter()
            .map(|(line, ..)| digit_count(*line))
            .max()
            .unwrap_or(1);
        let pad = " ".repeat(gutter);

        if let Some((line, col)) = header {
            let _ = writeln!(self.writer, "{pad}--> {path}:{line}:{col}");
        }
        let _ = writeln!(self.writer, "{pad} |");

        let mut last_line = None;
        for (line, col, width, label) in resolved {
            if last_line != Some(line) {
                let line_text = table.line_text(text, line);
                let _ = writeln!(self.writer, "{line:>gutter$} | {line_text}");
                last_line = Some(line);
            }
            let marker = if label.is_primary {
                format!("^{}", "~".repeat(width - 1))
            } else {
                "-".repeat(width)
            };
            let indent = " ".repeat(col - 1);
            let _ = write!(self.writer, "{pad} | {indent}");
            let color = Self::label_color(label);
            self.write_colored(&marker, color);
            if !label.message.is_empty() {
                let _ = write!(self.writer, " ");
                self.write_colored(&label.message, color);
            }
            let _ = writeln!(self.writer);
        }
        let _ = writeln!(self.writer, "{pad} |");
    }

    fn emit_trailer(&mut self, label: &str, color: &str, lines: &[String]) {
        for line in lines {
            let _ = write!(self.writer, "  = ");
            self.write_colored(label, color);
            let _ = writeln!(self.writer, ": {line}");
        }
    }
}

/// Underline width in characters, clamped to the rest of the line and at
/// least one so point spans stay visible.
fn underline_width(source: &SourceView<'_>, span: Span, line: u32, line_text: &str) -> usize {
    let line_start = source.lines.line_start_offset(line).unwrap_or(0);
    let line_end = line_start as usize + line_text.len();
    let start = (span.start as usize).min(line_end);
    let end = (span.end as usize).clamp(start, line_end);
    let chars = source.text.get(start..end).map_or(0, |s| s.chars().count());
    chars.max(1)
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_severity(diagnostic.severity);
        let _ = write!(self.writer, " ");
        let code = format!("[{}]", diagnostic.code.as_str());
        self.write_colored(&code, colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        if self.source.is_some() && !diagnostic.labels.is_empty() {
            self.emit_snippet(diagnostic);
        } else {
            self.emit_fallback_labels(&diagnostic.labels);
        }

        self.emit_trailer("note", colors::BOLD, &diagnostic.notes);
        self.emit_trailer("help", colors::HELP, &diagnostic.suggestions);
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count > 0 {
            self.write_colored("error", colors::ERROR);
            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };
            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {warning_count} warning{} emitted",
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else if warning_count > 0 {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
