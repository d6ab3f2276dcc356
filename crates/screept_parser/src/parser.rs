use screept_ast::diagnostic::Diagnostic;
use screept_ast::Span;
use screept_lexer::{Lexer, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    // ── Token helpers ────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|t| t.span).unwrap_or_else(|| {
            self.tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end))
                .unwrap_or_else(Span::dummy)
        })
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::dummy()));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, ()> {
        if self.at(expected) {
            Ok(self.advance())
        } else {
            self.error_at_current(format!(
                "expected {}, found {}",
                describe(expected),
                describe(self.peek())
            ));
            Err(())
        }
    }

    pub(crate) fn expect_identifier_name(&mut self) -> Result<String, ()> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => {
                self.error_at_current(format!(
                    "expected identifier, found {}",
                    describe(self.peek())
                ));
                Err(())
            }
        }
    }

    /// Report a lexer error token at the current position, if any.
    /// Returns true when one was consumed.
    pub(crate) fn report_error_token(&mut self) -> bool {
        if let TokenKind::Error(msg) = self.peek().clone() {
            self.error_at_current(msg);
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn error_at_current(&mut self, message: impl Into<String>) {
        let span = self.peek_span();
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    // ── Entry-point plumbing ─────────────────────────────────────

    /// Require EOF, then convert the internal result into the public
    /// all-or-nothing contract.
    pub(crate) fn finish<T>(mut self, result: Result<T, ()>) -> Result<T, Vec<Diagnostic>> {
        if result.is_ok() && !self.at(&TokenKind::Eof) {
            self.error_at_current(format!(
                "expected end of input, found {}",
                describe(self.peek())
            ));
        }
        match result {
            Ok(ast) if self.diagnostics.is_empty() => Ok(ast),
            _ => Err(self.diagnostics),
        }
    }
}

/// Human-readable token name for diagnostics.
pub(crate) fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {}", n),
        TokenKind::String(_) => "string literal".into(),
        TokenKind::Ident(name) => format!("identifier '{}'", name),
        TokenKind::Func => "'FUNC'".into(),
        TokenKind::Print => "'PRINT'".into(),
        TokenKind::Proc => "'PROC'".into(),
        TokenKind::Run => "'RUN'".into(),
        TokenKind::Rnd => "'RND'".into(),
        TokenKind::If => "'IF'".into(),
        TokenKind::Then => "'THEN'".into(),
        TokenKind::Else => "'ELSE'".into(),
        TokenKind::Emit => "'EMIT'".into(),
        TokenKind::LParen => "'('".into(),
        TokenKind::RParen => "')'".into(),
        TokenKind::LBrace => "'{'".into(),
        TokenKind::RBrace => "'}'".into(),
        TokenKind::RBracket => "']'".into(),
        TokenKind::DollarBracket => "'$['".into(),
        TokenKind::Semicolon => "';'".into(),
        TokenKind::Comma => "','".into(),
        TokenKind::Question => "'?'".into(),
        TokenKind::Colon => "':'".into(),
        TokenKind::Plus => "'+'".into(),
        TokenKind::Minus => "'-'".into(),
        TokenKind::Star => "'*'".into(),
        TokenKind::Slash => "'/'".into(),
        TokenKind::SlashSlash => "'//'".into(),
        TokenKind::Bang => "'!'".into(),
        TokenKind::Eq => "'='".into(),
        TokenKind::EqEq => "'=='".into(),
        TokenKind::Lt => "'<'".into(),
        TokenKind::Gt => "'>'".into(),
        TokenKind::Eof => "end of input".into(),
        TokenKind::Error(msg) => msg.clone(),
    }
}
