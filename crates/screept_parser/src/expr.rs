use crate::parser::{describe, Parser};
use screept_ast::ast::{BinOp, CmpOp, Expr, Identifier, UnaryOp, Value};
use screept_lexer::TokenKind;

impl Parser {
    // ── Precedence levels, lowest to highest binding ─────────────

    /// `cond ? t : f`, right-associative on the false branch.
    pub(crate) fn parse_conditional(&mut self) -> Result<Expr, ()> {
        let cond = self.parse_comparison()?;
        if !self.at(&TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        let if_true = self.parse_conditional()?;
        self.expect(&TokenKind::Colon)?;
        let if_false = self.parse_conditional()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    /// `==`, `<`, `>`: non-associative, at most one per level.
    fn parse_comparison(&mut self) -> Result<Expr, ()> {
        let lhs = self.parse_additive()?;
        let op = match self.peek() {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Gt => CmpOp::Gt,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(Expr::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ()> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ()> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::SlashSlash => BinOp::FloorDiv,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ()> {
        let op = match self.peek() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_atom(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    // ── Atoms ────────────────────────────────────────────────────

    fn parse_atom(&mut self) -> Result<Expr, ()> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Literal(Value::Number(n)))
            }

            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Value::Text(s)))
            }

            TokenKind::Func => {
                self.advance();
                let body = self.parse_conditional()?;
                Ok(Expr::Literal(Value::Function(Box::new(body))))
            }

            // Bare identifier: variable reference, or a call when
            // immediately followed by an argument list.
            TokenKind::Ident(name) => {
                self.advance();
                let id = Identifier::Literal(name);
                self.finish_var_or_call(id)
            }

            // `$[e]`: computed identifier, same variable/call split.
            TokenKind::DollarBracket => {
                let id = self.parse_computed_identifier()?;
                self.finish_var_or_call(id)
            }

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_conditional()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }

            TokenKind::Error(_) => {
                self.report_error_token();
                Err(())
            }

            other => {
                self.error_at_current(format!("expected expression, found {}", describe(&other)));
                Err(())
            }
        }
    }

    fn finish_var_or_call(&mut self, id: Identifier) -> Result<Expr, ()> {
        if self.at(&TokenKind::LParen) {
            let args = self.parse_args()?;
            Ok(Expr::FuncCall { id, args })
        } else {
            Ok(Expr::Var(id))
        }
    }

    /// `$[` already at the current position.
    pub(crate) fn parse_computed_identifier(&mut self) -> Result<Identifier, ()> {
        self.expect(&TokenKind::DollarBracket)?;
        let expr = self.parse_conditional()?;
        self.expect(&TokenKind::RBracket)?;
        Ok(Identifier::Computed(Box::new(expr)))
    }

    /// An identifier in head position: bare name or `$[e]`.
    pub(crate) fn parse_identifier(&mut self) -> Result<Identifier, ()> {
        if self.at(&TokenKind::DollarBracket) {
            self.parse_computed_identifier()
        } else {
            Ok(Identifier::Literal(self.expect_identifier_name()?))
        }
    }

    /// `( e, e, ... )`, comma-separated, possibly empty.
    pub(crate) fn parse_args(&mut self) -> Result<Vec<Expr>, ()> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                args.push(self.parse_conditional()?);
                if self.at(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }
}
