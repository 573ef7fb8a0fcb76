//! serrate-codegen - Code generation for the Serrate language
//!
//! Only a placeholder C backend exists: it writes a program that exits
//! with status 0, independent of the parsed tree.
//!
//! # Example
//!
//! ```rust
//! use serrate_codegen::{CBackend, CodeGen};
//! use serrate_parser::parse;
//!
//! let (program, _) = parse(b"let x = 1", 0);
//! let c_code = CBackend::new().generate(&program);
//! assert!(c_code.contains("int main"));
//! ```

use serrate_error::Error;
use serrate_parser::Node;
use std::fs;
use std::path::{Path, PathBuf};

pub mod c_backend;

pub use c_backend::CBackend;

/// Trait for code generation backends
pub trait CodeGen {
    /// Backend output type
    type Output;

    /// Generates code from a `Program` node
    fn generate(&self, program: &Node) -> Self::Output;
}

/// Compilation options
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Output file
    pub output: PathBuf,
    /// Colored diagnostics
    pub color: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.c"),
            color: true,
        }
    }
}

/// Writes generated code to `path`, replacing any existing file
pub fn write_output(path: &Path, code: &str) -> serrate_error::Result<()> {
    fs::write(path, code).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = code.len(), "wrote output");
    Ok(())
}
