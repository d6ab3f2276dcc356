use crate::parser::{describe, Parser};
use screept_ast::ast::Stmt;
use screept_lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ()> {
        match self.peek().clone() {
            TokenKind::Print => {
                self.advance();
                Ok(Stmt::Print(self.parse_conditional()?))
            }

            TokenKind::Emit => {
                self.advance();
                Ok(Stmt::Emit(self.parse_conditional()?))
            }

            TokenKind::LBrace => self.parse_block(),

            TokenKind::Proc => {
                self.advance();
                let id = self.parse_identifier()?;
                let body = self.parse_stmt()?;
                Ok(Stmt::ProcDef {
                    id,
                    body: Box::new(body),
                })
            }

            TokenKind::Run => {
                self.advance();
                let id = self.parse_identifier()?;
                let args = self.parse_args()?;
                Ok(Stmt::ProcRun { id, args })
            }

            TokenKind::Rnd => {
                self.advance();
                let id = self.parse_identifier()?;
                let min = self.parse_conditional()?;
                let max = self.parse_conditional()?;
                Ok(Stmt::Rnd { id, min, max })
            }

            TokenKind::If => {
                self.advance();
                let cond = self.parse_conditional()?;
                self.expect(&TokenKind::Then)?;
                let then = self.parse_stmt()?;
                // ELSE is mandatory in the grammar; a one-armed IF is
                // written with an empty else block.
                self.expect(&TokenKind::Else)?;
                let els = self.parse_stmt()?;
                Ok(Stmt::If {
                    cond,
                    then: Box::new(then),
                    els: Some(Box::new(els)),
                })
            }

            // Bind: `name = e` or `$[e] = e`
            TokenKind::Ident(_) | TokenKind::DollarBracket => {
                let id = self.parse_identifier()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_conditional()?;
                Ok(Stmt::Bind { id, value })
            }

            TokenKind::Error(_) => {
                self.report_error_token();
                Err(())
            }

            other => {
                self.error_at_current(format!("expected statement, found {}", describe(&other)));
                Err(())
            }
        }
    }

    /// `{ s1 ; s2 ; ... }`: semicolon-separated, trailing semicolon
    /// optional, empty block legal.
    fn parse_block(&mut self) -> Result<Stmt, ()> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at(&TokenKind::Eof) {
                self.error_at_current("unclosed block, expected '}'");
                return Err(());
            }
            body.push(self.parse_stmt()?);
            if self.at(&TokenKind::Semicolon) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Stmt::Block(body))
    }
}
