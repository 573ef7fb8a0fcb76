//! Tokens for the Serrate language
//!
//! Defines all token types that the lexer can produce.

use serrate_error::span::Span;
use std::borrow::Cow;
use std::fmt;

/// All token types for the Serrate language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Names and literals
    // =========================================
    /// Identifier: `foo`, `_tmp`, `x1`
    Identifier,
    /// Integer literal: `42`
    Integer,

    // =========================================
    // Keywords
    // =========================================
    /// `func` - function declaration
    Func,
    /// `if` - conditional block
    If,
    /// `while` - loop block
    While,
    /// `return` - function return
    Return,
    /// `end` - closes the innermost open block
    End,
    /// `let` - variable binding
    Let,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `:`
    Colon,

    // =========================================
    // Operators
    // =========================================
    /// `=`
    Assign,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Division,

    // =========================================
    // Special
    // =========================================
    /// Line break. Newlines are skipped as whitespace, so the lexer never
    /// produces this kind.
    Newline,
    /// A byte the language does not recognize
    Unknown,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Looks up a keyword by its exact lexeme
    pub fn keyword_from_bytes(lexeme: &[u8]) -> Option<TokenKind> {
        match lexeme {
            b"func" => Some(TokenKind::Func),
            b"if" => Some(TokenKind::If),
            b"while" => Some(TokenKind::While),
            b"return" => Some(TokenKind::Return),
            b"end" => Some(TokenKind::End),
            b"let" => Some(TokenKind::Let),
            _ => None,
        }
    }

    /// Maps a single punctuation byte to its token kind
    pub fn from_punct(byte: u8) -> Option<TokenKind> {
        match byte {
            b'(' => Some(TokenKind::LeftParen),
            b')' => Some(TokenKind::RightParen),
            b':' => Some(TokenKind::Colon),
            b'=' => Some(TokenKind::Assign),
            b'>' => Some(TokenKind::GreaterThan),
            b'<' => Some(TokenKind::LessThan),
            b'+' => Some(TokenKind::Plus),
            b'-' => Some(TokenKind::Minus),
            b'*' => Some(TokenKind::Asterisk),
            b'/' => Some(TokenKind::Division),
            _ => None,
        }
    }

    /// Checks if it's a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Func
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::End
                | TokenKind::Let
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Func => "func",
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::End => "end",
            TokenKind::Let => "let",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Colon => ":",
            TokenKind::Assign => "=",
            TokenKind::GreaterThan => ">",
            TokenKind::LessThan => "<",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Division => "/",
            TokenKind::Newline => "newline",
            TokenKind::Unknown => "unknown",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{}", s)
    }
}

/// A token with its lexeme and location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The bytes of the source this token was read from
    pub lexeme: &'src [u8],
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src [u8], span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Line of the first byte (1-indexed)
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    /// Column of the first byte (0-indexed)
    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    /// Lexeme as text. Only `Unknown` tokens can hold non-ASCII bytes.
    pub fn text(&self) -> Cow<'src, str> {
        String::from_utf8_lossy(self.lexeme)
    }

    /// How diagnostics name this token: `` `let` ``, `byte 0xc3` or
    /// `end of file`
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => self.kind.to_string(),
            TokenKind::Unknown if !self.lexeme.is_ascii() => {
                format!("byte 0x{:02x}", self.lexeme.first().copied().unwrap_or_default())
            }
            _ => format!("`{}`", self.text()),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::Integer | TokenKind::Unknown => {
                write!(f, "{}({})", self.kind, self.text())
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
