//! Parser for the Serrate language
//!
//! Recursive descent over a lazily pulled token stream, with one token of
//! lookahead (`current`) and the last consumed token (`previous`).
//!
//! Errors never abort the parse. A production that fails reports a
//! diagnostic and returns `Err(())`; the statement loop that called it
//! resynchronizes and carries on with the next statement.
//!
//! Blocks, parentheses, unary minus and operator chains are all limited to
//! `MAX_DEPTH` levels, which bounds both the parser's recursion and the
//! height of the trees it builds.

use crate::ast::{BinOp, Node, UnaryOp};
use serrate_error::{Diagnostic, Diagnostics, ErrorCode};
use serrate_lexer::{Lexer, Token, TokenKind};

/// Deepest nesting of blocks and expressions the parser accepts
pub const MAX_DEPTH: usize = 256;

/// Parser for the Serrate language
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    /// Lookahead token
    current: Token<'src>,
    /// Most recently consumed token
    previous: Token<'src>,
    /// Line of the token at which the last error was detected, 0 once there
    /// is nothing left to skip
    error_line: u32,
    /// Blocks and sub-expressions currently open
    depth: usize,
    /// Height of the expression tree returned last
    height: usize,
    /// Accumulated diagnostics
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Creates a new parser and primes the lookahead
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: current,
            error_line: 0,
            depth: 0,
            height: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes and returns the diagnostics
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    // =========================================
    // Helpers
    // =========================================

    /// Checks if the current token is of the specified kind
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Shifts `current` into `previous` and pulls the next token
    fn advance(&mut self) -> Token<'src> {
        self.previous = self.current;
        self.current = self.lexer.next_token();
        self.previous
    }

    /// Consumes the current token if it matches the expected kind
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Requires a specific token or reports an error
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token<'src>, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
            Err(())
        }
    }

    /// Reports an error at the current token
    fn error_at_current(&mut self, code: ErrorCode, message: &str) {
        let token = self.current;
        self.error_at(token, code, message, format!("found {}", token.describe()));
    }

    fn error_at(
        &mut self,
        token: Token<'src>,
        code: ErrorCode,
        message: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.error_line = token.line();
        tracing::debug!(
            %code,
            line = token.line(),
            column = token.column(),
            "syntax error"
        );
        self.diagnostics.push(
            Diagnostic::error(message)
                .with_code(code)
                .with_label(token.span, label),
        );
    }

    /// Skips the rest of a failed statement.
    ///
    /// Newlines never reach the parser, so the line of the failing token
    /// stands in for the statement boundary: skip until a later line, a
    /// keyword (which may open the next statement or close a block) or EOF.
    fn synchronize(&mut self) {
        let mut skipped = 0usize;

        while !self.is_at_end()
            && self.current.line() <= self.error_line
            && !self.current.kind.is_keyword()
        {
            self.advance();
            skipped += 1;
        }

        tracing::debug!(
            skipped,
            resume_line = self.current.line(),
            "recovered after syntax error"
        );
    }

    /// Runs `parse` one nesting level deeper, or reports `opener` once
    /// `MAX_DEPTH` levels are open
    fn nested<T>(
        &mut self,
        opener: Token<'src>,
        parse: impl FnOnce(&mut Self) -> Result<T, ()>,
    ) -> Result<T, ()> {
        if self.depth >= MAX_DEPTH {
            self.too_deep(opener);
            return Err(());
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn too_deep(&mut self, token: Token<'src>) {
        self.error_at(
            token,
            ErrorCode::NESTING_TOO_DEEP,
            "program nested too deeply",
            format!("more than {} levels deep", MAX_DEPTH),
        );
    }

    // =========================================
    // Main parsing
    // =========================================

    /// Parses the complete program
    pub fn parse_program(&mut self) -> Node {
        tracing::debug!("parsing program");

        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => self.synchronize(),
            }
        }

        tracing::debug!(
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parsed program"
        );

        Node::program(statements)
    }

    /// Parses a statement
    fn parse_statement(&mut self) -> Result<Node, ()> {
        match self.current.kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Func => self.parse_func(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression(),
        }
    }

    // =========================================
    // Statements
    // =========================================

    /// Parse: `let name = expr`
    fn parse_let(&mut self) -> Result<Node, ()> {
        self.advance(); // consume 'let'

        let name = self.parse_identifier("expected identifier after `let`")?;
        self.expect(TokenKind::Assign, "expected `=` after variable name")?;
        let value = self.parse_expression()?;

        Ok(Node::let_binding(name, value))
    }

    /// Parse: `func name ... end`
    fn parse_func(&mut self) -> Result<Node, ()> {
        let opener = self.advance(); // consume 'func'

        let name = match self.parse_identifier("expected function name after `func`") {
            Ok(name) => name,
            Err(()) => return self.abandon_block(opener),
        };
        let body = self.parse_block(opener)?;

        Ok(Node::function(name, body))
    }

    /// Parse: `if expr ... end`
    fn parse_if(&mut self) -> Result<Node, ()> {
        let opener = self.advance(); // consume 'if'

        let condition = match self.parse_expression() {
            Ok(condition) => condition,
            Err(()) => return self.abandon_block(opener),
        };
        let body = self.parse_block(opener)?;

        Ok(Node::if_block(condition, body))
    }

    /// Parse: `while expr ... end`
    fn parse_while(&mut self) -> Result<Node, ()> {
        let opener = self.advance(); // consume 'while'

        let condition = match self.parse_expression() {
            Ok(condition) => condition,
            Err(()) => return self.abandon_block(opener),
        };
        let body = self.parse_block(opener)?;

        Ok(Node::while_loop(condition, body))
    }

    /// Parse: `return expr`
    fn parse_return(&mut self) -> Result<Node, ()> {
        self.advance(); // consume 'return'

        let value = self.parse_expression()?;

        Ok(Node::return_value(value))
    }

    // =========================================
    // Blocks
    // =========================================

    /// Parses a block body one level deeper than its opener.
    ///
    /// Past `MAX_DEPTH` the whole block is skipped up to its matching `end`
    /// and no node is produced.
    fn parse_block(&mut self, opener: Token<'src>) -> Result<Vec<Node>, ()> {
        let body = self.nested(opener, |parser| Ok(parser.parse_block_body(opener)));

        if body.is_err() {
            self.skip_block();
        }

        body
    }

    /// Parses statements up to the matching `end`.
    ///
    /// A block that runs into EOF is closed there and reported, and its
    /// statements are kept.
    fn parse_block_body(&mut self, opener: Token<'src>) -> Vec<Node> {
        let mut body = Vec::new();

        while !self.check(TokenKind::End) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(()) => self.synchronize(),
            }
        }

        if !self.match_token(TokenKind::End) {
            let eof = self.current;
            tracing::debug!(opened_at = opener.line(), "unterminated block");
            self.diagnostics.push(
                Diagnostic::error(format!("unterminated `{}` block", opener.text()))
                    .with_code(ErrorCode::UNTERMINATED_BLOCK)
                    .with_label(eof.span, "expected `end` before end of file")
                    .with_secondary_label(opener.span, "block opened here")
                    .with_help("add `end` to close the block"),
            );
        }

        body
    }

    /// Discards a block whose header failed to parse. Its body and `end`
    /// are still consumed so that the `end` cannot close an outer block.
    fn abandon_block(&mut self, opener: Token<'src>) -> Result<Node, ()> {
        tracing::debug!(line = opener.line(), "discarding block with a bad header");

        // `if end`: the failed condition already consumed the block's `end`
        if self.previous.kind != TokenKind::End {
            self.synchronize();
            let _ = self.parse_block(opener);
        }
        self.error_line = 0;

        Err(())
    }

    /// Consumes tokens up to and including the `end` that closes the block
    /// just opened, without recursing into nested blocks
    fn skip_block(&mut self) {
        let mut open = 1usize;

        while !self.is_at_end() {
            match self.advance().kind {
                TokenKind::Func | TokenKind::If | TokenKind::While => open += 1,
                TokenKind::End => {
                    open -= 1;
                    if open == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }

        self.error_line = 0;
    }

    // =========================================
    // Expressions
    // =========================================

    /// Parse: `term (('+' | '-') term)*`
    fn parse_expression(&mut self) -> Result<Node, ()> {
        let mut left = self.parse_term()?;
        let mut height = self.height;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let operator = self.advance();

            let right = self.parse_term()?;
            height = self.fold_height(operator, height)?;
            left = Node::binary(op, left, right);
        }

        self.height = height;
        Ok(left)
    }

    /// Parse: `factor (('*' | '/') factor)*`
    fn parse_term(&mut self) -> Result<Node, ()> {
        let mut left = self.parse_factor()?;
        let mut height = self.height;

        loop {
            let op = match self.current.kind {
                TokenKind::Asterisk => BinOp::Mul,
                TokenKind::Division => BinOp::Div,
                _ => break,
            };
            let operator = self.advance();

            let right = self.parse_factor()?;
            height = self.fold_height(operator, height)?;
            left = Node::binary(op, left, right);
        }

        self.height = height;
        Ok(left)
    }

    /// Height of a binary node whose left operand is `left` high and whose
    /// right operand was just parsed
    fn fold_height(&mut self, operator: Token<'src>, left: usize) -> Result<usize, ()> {
        let height = left.max(self.height) + 1;
        if height > MAX_DEPTH {
            self.too_deep(operator);
            return Err(());
        }
        Ok(height)
    }

    /// Parse: `INTEGER | IDENT | '(' expr ')' | '-' factor`
    ///
    /// Anything else is reported and consumed, so a bad token can never
    /// stall the statement loops.
    fn parse_factor(&mut self) -> Result<Node, ()> {
        match self.current.kind {
            TokenKind::Integer => {
                let token = self.advance();
                self.height = 1;
                self.parse_integer(token).map(Node::integer)
            }
            TokenKind::Identifier => {
                let token = self.advance();
                self.height = 1;
                Ok(Node::identifier(&token.text()))
            }
            TokenKind::LeftParen => {
                let open = self.advance();
                let expr = self.nested(open, Self::parse_expression)?;
                self.expect(TokenKind::RightParen, "expected `)` after expression")?;
                Ok(expr)
            }
            TokenKind::Minus => {
                let minus = self.advance();
                let operand = self.nested(minus, Self::parse_factor)?;
                self.height += 1;
                Ok(Node::unary(UnaryOp::Neg, operand))
            }
            TokenKind::Unknown => {
                let token = self.advance();
                self.error_at(
                    token,
                    ErrorCode::UNEXPECTED_CHAR,
                    format!("unexpected character {}", token.describe()),
                    "unrecognized character",
                );
                Err(())
            }
            _ => {
                let token = self.advance();
                self.error_at(
                    token,
                    ErrorCode::EXPECTED_EXPRESSION,
                    format!("expected expression, found {}", token.describe()),
                    "expected expression",
                );
                Err(())
            }
        }
    }

    // =========================================
    // Parsing helpers
    // =========================================

    fn parse_identifier(&mut self, message: &str) -> Result<String, ()> {
        if self.check(TokenKind::Identifier) {
            let token = self.advance();
            Ok(token.text().into_owned())
        } else {
            self.error_at_current(ErrorCode::EXPECTED_IDENTIFIER, message);
            Err(())
        }
    }

    /// Converts an integer lexeme; the lexer leaves range checks to us
    fn parse_integer(&mut self, token: Token<'src>) -> Result<i64, ()> {
        match token.text().parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::error("integer literal out of range")
                        .with_code(ErrorCode::INTEGER_OVERFLOW)
                        .with_label(token.span, "does not fit in a 64-bit signed integer")
                        .with_note(format!("the largest integer literal is {}", i64::MAX)),
                );
                self.error_line = token.line();
                Err(())
            }
        }
    }
}

/// Parses a whole source buffer into a `Program` node
pub fn parse(source: &[u8], file_id: u32) -> (Node, Diagnostics) {
    let mut parser = Parser::new(Lexer::new(source, file_id));
    let program = parser.parse_program();
    (program, parser.take_diagnostics())
}
