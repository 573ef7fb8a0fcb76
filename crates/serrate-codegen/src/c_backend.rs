//! C backend
//!
//! The backend does not translate the program yet: whatever the tree holds,
//! it emits a C translation unit whose `main` returns 0.

use crate::CodeGen;
use serrate_parser::Node;

const PLACEHOLDER_PROGRAM: &str = "int main() { return 0; }\n";

/// Placeholder C code generator
#[derive(Debug, Default, Clone, Copy)]
pub struct CBackend;

impl CBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGen for CBackend {
    type Output = String;

    fn generate(&self, program: &Node) -> String {
        tracing::debug!(
            statements = program.body().map_or(0, <[Node]>::len),
            "generating placeholder C"
        );
        PLACEHOLDER_PROGRAM.to_string()
    }
}
