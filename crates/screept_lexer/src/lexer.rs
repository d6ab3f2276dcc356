use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use screept_ast::Span;

/// Tokenizes Screept source. Whitespace (including newlines) only
/// separates tokens; there is no comment syntax, so `//` is always the
/// floor-division operator.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            done: false,
        }
    }

    fn lex_string(&mut self) -> TokenKind {
        // Opening quote already consumed
        let mut value = String::new();
        loop {
            match self.cursor.advance() {
                None => return TokenKind::Error("unterminated string".into()),
                Some('"') => return TokenKind::String(value),
                Some('\\') => match self.cursor.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(ch) => {
                        value.push('\\');
                        value.push(ch);
                    }
                    None => return TokenKind::Error("unterminated string escape".into()),
                },
                Some(ch) => value.push(ch),
            }
        }
    }

    fn lex_number(&mut self, start: usize) -> TokenKind {
        // First digit already consumed
        self.cursor.eat_while(|ch| ch.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|ch| ch.is_ascii_digit())
        {
            self.cursor.advance(); // .
            self.cursor.eat_while(|ch| ch.is_ascii_digit());
        }
        let text = self.cursor.slice(start, self.cursor.pos());
        match text.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Error(format!("malformed number '{}'", text)),
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> TokenKind {
        self.cursor
            .eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let text = self.cursor.slice(start, self.cursor.pos());

        match text {
            "FUNC" => TokenKind::Func,
            "PRINT" => TokenKind::Print,
            "PROC" => TokenKind::Proc,
            "RUN" => TokenKind::Run,
            "RND" => TokenKind::Rnd,
            "IF" => TokenKind::If,
            "THEN" => TokenKind::Then,
            "ELSE" => TokenKind::Else,
            "EMIT" => TokenKind::Emit,
            _ => TokenKind::Ident(text.to_string()),
        }
    }

    fn next_token(&mut self) -> Token {
        self.cursor.eat_while(|ch| ch.is_whitespace());

        let start = self.cursor.pos();
        let Some(ch) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,

            '/' => {
                if self.cursor.peek() == Some('/') {
                    self.cursor.advance();
                    TokenKind::SlashSlash
                } else {
                    TokenKind::Slash
                }
            }

            '=' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }

            '$' => {
                if self.cursor.peek() == Some('[') {
                    self.cursor.advance();
                    TokenKind::DollarBracket
                } else {
                    TokenKind::Error("expected '[' after '$'".into())
                }
            }

            '"' => self.lex_string(),

            ch if ch.is_ascii_digit() => self.lex_number(start),

            ch if ch.is_ascii_alphabetic() || ch == '_' => self.lex_ident_or_keyword(start),

            _ => TokenKind::Error(format!("unexpected character '{}'", ch)),
        };

        Token::new(kind, Span::new(start, self.cursor.pos()))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}
