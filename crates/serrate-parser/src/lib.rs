//! serrate-parser - Parser for the Serrate language
//!
//! Pulls tokens from a [`serrate_lexer::Lexer`] and builds the AST.
//!
//! # Example
//!
//! ```rust
//! use serrate_parser::{parse, Node};
//!
//! let source = b"let x = 1 + 2 * 3\n";
//!
//! let (program, diagnostics) = parse(source, 0);
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.body().map(|b| b.len()), Some(1));
//! println!("{}", program);
//! ```

pub mod ast;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use parser::{parse, Parser, MAX_DEPTH};
pub use printer::dump;
