//! Integration tests for the Serrate front end
//!
//! This crate drives the whole pipeline end to end:
//! Source → Lexer → Parser → Codegen

use serrate_codegen::{CBackend, CodeGen};
use serrate_error::{DiagnosticRenderer, Diagnostics, SourceCache};
use serrate_parser::{parse, Node};

/// Result of compiling a Serrate source buffer
#[derive(Debug)]
pub struct CompileResult {
    /// Whether the source parsed without diagnostics
    pub success: bool,
    /// Diagnostics produced by the front end
    pub diagnostics: Diagnostics,
    /// Root of the tree, kept even when there were errors
    pub program: Node,
    /// Generated C code (if successful)
    pub output: Option<String>,
}

impl CompileResult {
    /// Top-level statements of the program
    pub fn statements(&self) -> &[Node] {
        self.program.body().unwrap_or_default()
    }

    /// Renders the diagnostics against `source` without colors
    pub fn render(&self, name: &str, source: &str) -> String {
        let mut cache = SourceCache::new();
        cache.add(name, source);
        self.diagnostics
            .render(&DiagnosticRenderer::new(&cache).without_colors())
    }
}

/// Compiles Serrate source through the full pipeline
pub fn compile(source: &str) -> CompileResult {
    let (program, diagnostics) = parse(source.as_bytes(), 0);

    if diagnostics.has_errors() {
        return CompileResult {
            success: false,
            diagnostics,
            program,
            output: None,
        };
    }

    let output = CBackend::new().generate(&program);

    CompileResult {
        success: true,
        diagnostics,
        program,
        output: Some(output),
    }
}

/// Asserts that source code parses without diagnostics and returns the tree
pub fn assert_parses(source: &str) -> Node {
    let result = compile(source);
    if !result.success {
        panic!(
            "Expected source to parse, but got errors:\n{}",
            result.render("test.sr", source)
        );
    }
    result.program
}

/// Asserts that source code produces diagnostics and returns them
pub fn assert_parse_fails(source: &str) -> Diagnostics {
    let result = compile(source);
    if result.success {
        panic!(
            "Expected source to fail parsing, but it succeeded:\n{}",
            result.program
        );
    }
    result.diagnostics
}
