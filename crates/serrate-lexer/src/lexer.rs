//! Lexer for the Serrate language
//!
//! Scans an immutable byte buffer one token at a time. The lexer owns
//! nothing but its cursor; every token borrows its lexeme from the buffer.

use crate::token::{Token, TokenKind};
use serrate_error::span::{Position, Span};

/// The Serrate language Lexer
pub struct Lexer<'src> {
    /// Source bytes being scanned
    source: &'src [u8],
    /// Byte offset of the next unread byte
    pos: usize,
    /// Current line (1-indexed)
    line: u32,
    /// Current column (0-indexed)
    column: u32,
    /// Source file ID
    file_id: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source buffer
    pub fn new(source: &'src [u8], file_id: u32) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            file_id,
        }
    }

    /// Returns the current byte without advancing
    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    /// Consumes one byte, keeping line and column in sync.
    ///
    /// `\n` and a lone `\r` end a line. The `\r` of a `\r\n` pair leaves the
    /// line alone so the pair counts once.
    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;

        match byte {
            b'\n' => self.new_line(),
            b'\r' if self.peek() != Some(b'\n') => self.new_line(),
            b'\r' => {}
            _ => self.column += 1,
        }

        Some(byte)
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    /// Builds a token spanning from `start` to the cursor
    fn make_token(&self, kind: TokenKind, start: Position) -> Token<'src> {
        let span = Span::new(start, self.current_position(), self.file_id);
        Token::new(kind, &self.source[span.range()], span)
    }

    /// Skips whitespace and `#` comments
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\x0B' | b'\x0C' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'#') => {
                    while let Some(byte) = self.peek() {
                        if byte == b'\n' || byte == b'\r' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Reads a run of ASCII digits. Range checking is left to the parser.
    fn read_integer(&mut self, start: Position) -> Token<'src> {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenKind::Integer, start)
    }

    /// Reads an identifier or keyword
    fn read_identifier(&mut self, start: Position) -> Token<'src> {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let lexeme = &self.source[start.offset..self.pos];
        let kind = TokenKind::keyword_from_bytes(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    /// Reads the next token.
    ///
    /// Once the input is exhausted every call returns an `Eof` token with an
    /// empty lexeme at the end of the buffer.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();

        let start = self.current_position();

        let token = match self.peek() {
            None => self.make_token(TokenKind::Eof, start),
            Some(byte) if byte.is_ascii_digit() => self.read_integer(start),
            Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' => {
                self.read_identifier(start)
            }
            Some(byte) => {
                self.advance();
                let kind = TokenKind::from_punct(byte).unwrap_or(TokenKind::Unknown);
                self.make_token(kind, start)
            }
        };

        tracing::trace!(
            kind = ?token.kind,
            line = token.line(),
            column = token.column(),
            "token"
        );

        token
    }

    /// Tokenizes the rest of the input, up to and including `Eof`
    pub fn tokenize(&mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        tokens
    }
}

/// Tokenizes a whole source buffer
pub fn tokenize(source: &[u8], file_id: u32) -> Vec<Token<'_>> {
    Lexer::new(source, file_id).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<TokenKind> {
        tokenize(source.as_bytes(), 0)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_let_statement() {
        assert_eq!(
            lex("let x = 10"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            lex("func if while return end let"),
            vec![
                TokenKind::Func,
                TokenKind::If,
                TokenKind::While,
                TokenKind::Return,
                TokenKind::End,
                TokenKind::Let,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_lookalikes_are_identifiers() {
        assert_eq!(
            lex("letter _if end_ While func2 iff"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex("( ) : = > < + - * /"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Colon,
                TokenKind::Assign,
                TokenKind::GreaterThan,
                TokenKind::LessThan,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Asterisk,
                TokenKind::Division,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexemes_borrow_source() {
        let source = b"let count = 1234 + x_1";
        let texts: Vec<_> = tokenize(source, 0)
            .iter()
            .map(|t| t.text().into_owned())
            .collect();
        assert_eq!(texts, vec!["let", "count", "=", "1234", "+", "x_1", ""]);
    }

    #[test]
    fn test_integer_is_maximal_digit_run() {
        let tokens = tokenize(b"123abc 99999999999999999999", 0);
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].lexeme, b"123");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, b"abc");
        assert_eq!(tokens[2].kind, TokenKind::Integer);
        assert_eq!(tokens[2].lexeme, b"99999999999999999999");
    }

    #[test]
    fn test_eof_is_idempotent() {
        let source = b"x";
        let mut lexer = Lexer::new(source, 0);
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);

        for _ in 0..5 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.lexeme, b"");
            assert_eq!(token.span.start.offset, source.len());
        }
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
        assert_eq!(lex(" \t\r\n\x0B\x0C  # only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_newlines_are_whitespace() {
        assert!(!lex("let x = 1\nlet y = 2\r\n").contains(&TokenKind::Newline));
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = tokenize(b"let x\n  y = 2", 0);
        let positions: Vec<_> = tokens.iter().map(|t| (t.line(), t.column())).collect();
        assert_eq!(positions, vec![(1, 0), (1, 4), (2, 2), (2, 4), (2, 6), (2, 7)]);
    }

    #[test]
    fn test_crlf_counts_as_one_line() {
        let tokens = tokenize(b"a\r\nb\r\n\r\nc", 0);
        let lines: Vec<_> = tokens.iter().map(|t| t.line()).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
        assert_eq!(tokens[1].column(), 0);
    }

    #[test]
    fn test_lone_carriage_return_ends_line() {
        let tokens = tokenize(b"a\rb\n\rc", 0);
        let lines: Vec<_> = tokens.iter().map(|t| t.line()).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize(b"let x = 1 # trailing ( junk\n# full line\nx", 0);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[4].line(), 3);
    }

    #[test]
    fn test_comment_ends_at_carriage_return() {
        let tokens = tokenize(b"# note\rx", 0);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].line(), 2);
    }

    #[test]
    fn test_unknown_bytes() {
        let tokens = tokenize("x $ é".as_bytes(), 0);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, b"$");
        // `é` is two bytes in UTF-8, each surfaces on its own
        assert_eq!(tokens[2].lexeme, &[0xc3]);
        assert_eq!(tokens[3].lexeme, &[0xa9]);
        assert_eq!(tokens[3].column(), 5);
    }

    #[test]
    fn test_unicode_letters_are_not_identifiers() {
        let kinds = lex("ñ");
        assert_eq!(kinds, vec![TokenKind::Unknown, TokenKind::Unknown, TokenKind::Eof]);
    }
}
