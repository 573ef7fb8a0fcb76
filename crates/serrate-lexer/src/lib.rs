//! serrate-lexer - Lexer for the Serrate language
//!
//! This crate turns a Serrate source buffer into tokens, one at a time.
//!
//! # Features
//!
//! - ASCII identifiers and the keywords `func if while return end let`
//! - Unsigned integer literals
//! - `#` line comments, `\n`, `\r` and `\r\n` line terminators
//! - Unrecognized bytes become `Unknown` tokens instead of errors
//!
//! # Example
//!
//! ```rust
//! use serrate_lexer::{Lexer, TokenKind};
//!
//! let source = b"let x = 10\n";
//!
//! let mut lexer = Lexer::new(source, 0);
//! let tokens = lexer.tokenize();
//!
//! assert_eq!(tokens[0].kind, TokenKind::Let);
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
