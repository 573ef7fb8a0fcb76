//! Diagnostic - rustc-style error messages
//!
//! Generates detailed error messages with:
//! - Error code (EL001, EP002, etc.)
//! - Precise location
//! - Source code snippet
//! - Fix suggestions

use crate::span::{Position, Span};
use std::borrow::Cow;
use std::fmt;

/// Which stage of the front end detected the problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognized byte in the source
    Lex,
    /// Unexpected or missing token at a grammar position
    Parse,
    /// A block ran to end of input without its closing `end`
    UnterminatedBlock,
}

/// A label pointing to a specific region of the code
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// Whether this is the primary or secondary label
    pub primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }
}

/// Structured error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Category (L = Lexer, P = Parser)
    pub category: char,
    pub number: u16,
}

impl ErrorCode {
    pub const fn new(category: char, number: u16) -> Self {
        Self { category, number }
    }

    // Lexer errors
    pub const UNEXPECTED_CHAR: Self = Self::new('L', 1);

    // Parser errors
    pub const UNEXPECTED_TOKEN: Self = Self::new('P', 1);
    pub const EXPECTED_EXPRESSION: Self = Self::new('P', 2);
    pub const EXPECTED_IDENTIFIER: Self = Self::new('P', 3);
    pub const UNTERMINATED_BLOCK: Self = Self::new('P', 4);
    pub const INTEGER_OVERFLOW: Self = Self::new('P', 5);
    pub const NESTING_TOO_DEEP: Self = Self::new('P', 6);

    pub fn kind(&self) -> DiagnosticKind {
        match (self.category, self.number) {
            ('L', _) => DiagnosticKind::Lex,
            ('P', 4) => DiagnosticKind::UnterminatedBlock,
            _ => DiagnosticKind::Parse,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}{:03}", self.category, self.number)
    }
}

/// A complete diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<ErrorCode>,
    /// Main message
    pub message: String,
    /// Labels pointing to the code
    pub labels: Vec<Label>,
    /// Additional notes
    pub notes: Vec<String>,
    /// Fix suggestions
    pub helps: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Adds a primary label
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Adds a secondary label
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a fix suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.code.map_or(DiagnosticKind::Parse, |code| code.kind())
    }

    /// Where the problem was detected: the start of the primary label
    pub fn position(&self) -> Option<Position> {
        self.labels
            .iter()
            .find(|label| label.primary)
            .map(|label| label.span.start)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(pos) => write!(f, "{}:{}: {}", pos.line, pos.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Source buffers known to the renderer, by file ID
#[derive(Debug, Default)]
pub struct SourceCache {
    files: Vec<SourceFile>,
}

#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub source: Vec<u8>,
    /// Offset of each line (for fast lookup)
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (i, &byte) in source.iter().enumerate() {
            let lone_cr = byte == b'\r' && source.get(i + 1) != Some(&b'\n');
            if byte == b'\n' || lone_cr {
                line_starts.push(i + 1);
            }
        }

        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Returns the text of a 1-indexed line without its terminator
    pub fn get_line(&self, line: u32) -> Option<Cow<'_, str>> {
        let line_idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(line_idx)?;
        let mut end = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(self.source.len());

        while end > start && matches!(self.source[end - 1], b'\n' | b'\r') {
            end -= 1;
        }

        Some(String::from_utf8_lossy(&self.source[start..end]))
    }
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns its ID
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<Vec<u8>>) -> u32 {
        let id = self.files.len() as u32;
        self.files.push(SourceFile::new(name, source));
        id
    }

    pub fn get(&self, id: u32) -> Option<&SourceFile> {
        self.files.get(id as usize)
    }
}

/// Renders a diagnostic for display
pub struct DiagnosticRenderer<'a> {
    cache: &'a SourceCache,
    use_colors: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(cache: &'a SourceCache) -> Self {
        Self {
            cache,
            use_colors: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.use_colors {
            code
        } else {
            ""
        }
    }

    /// Renders the diagnostic as a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let reset = self.paint("\x1b[0m");
        let red = self.paint("\x1b[1;31m");
        let blue = self.paint("\x1b[1;34m");
        let green = self.paint("\x1b[1;32m");
        let bold = self.paint("\x1b[1m");

        // error[EP001]: message
        output.push_str(red);
        output.push_str("error");
        if let Some(code) = &diagnostic.code {
            output.push_str(&format!("[{}]", code));
        }
        output.push_str(reset);
        output.push_str(bold);
        output.push_str(": ");
        output.push_str(&diagnostic.message);
        output.push_str(reset);
        output.push('\n');

        for label in &diagnostic.labels {
            let Some(file) = self.cache.get(label.span.file_id) else {
                continue;
            };

            // Columns are displayed 1-based, like every editor does
            output.push_str(&format!(
                " {}-->{} {}:{}:{}\n",
                blue,
                reset,
                file.name,
                label.span.start.line,
                label.span.start.column + 1
            ));

            let Some(line_content) = file.get_line(label.span.start.line) else {
                continue;
            };

            let line_num = label.span.start.line;
            let padding = " ".repeat(line_num.to_string().len());

            output.push_str(&format!(" {} {}|{}\n", padding, blue, reset));
            output.push_str(&format!(
                " {}{}{} |{} {}\n",
                blue, line_num, reset, reset, line_content
            ));

            let col_start = label.span.start.column as usize;
            let underline_len = if label.span.start.line == label.span.end.line {
                (label.span.end.column.saturating_sub(label.span.start.column)).max(1) as usize
            } else {
                line_content.len().saturating_sub(col_start).max(1)
            };

            let spaces = " ".repeat(col_start);
            let underline_char = if label.primary { '^' } else { '-' };
            let underline = underline_char.to_string().repeat(underline_len);
            let label_color = if label.primary { red } else { blue };

            output.push_str(&format!(
                " {} {}|{} {}{}{} {}{}\n",
                padding, blue, reset, spaces, label_color, underline, label.message, reset
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = {}note{}: {}\n", bold, reset, note));
        }

        for help in &diagnostic.helps {
            output.push_str(&format!("   = {}help{}: {}\n", green, reset, help));
        }

        output
    }
}
