//! serrate-error - Diagnostics system for the Serrate language
//!
//! This crate provides structures for reporting lex and parse errors
//! in a clear and detailed way, similar to the Rust compiler style.
//!
//! # Example
//!
//! ```rust
//! use serrate_error::{Diagnostic, ErrorCode, SourceCache, DiagnosticRenderer};
//! use serrate_error::span::{Span, Position};
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add("example.sr", "let = 10");
//!
//! let span = Span::new(
//!     Position::new(1, 4, 4),
//!     Position::new(1, 5, 5),
//!     file_id,
//! );
//!
//! let diagnostic = Diagnostic::error("expected identifier after `let`")
//!     .with_code(ErrorCode::EXPECTED_IDENTIFIER)
//!     .with_label(span, "found `=`");
//!
//! let renderer = DiagnosticRenderer::new(&cache);
//! println!("{}", renderer.render(&diagnostic));
//! ```

use std::path::PathBuf;

pub mod diagnostic;
pub mod span;

pub use diagnostic::{
    Diagnostic, DiagnosticKind, DiagnosticRenderer, ErrorCode, Label, SourceCache, SourceFile,
};
pub use span::{Position, Span};

/// Failures of the compiler driver around the front end
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read `{}`: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write `{}`: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("aborting due to {0} previous error(s)")]
    Aborted(usize),
}

/// Result type of driver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Collection of diagnostics accumulated while lexing and parsing
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind() == kind).count()
    }

    /// Renders all diagnostics
    pub fn render(&self, renderer: &DiagnosticRenderer<'_>) -> String {
        self.items
            .iter()
            .map(|d| renderer.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
