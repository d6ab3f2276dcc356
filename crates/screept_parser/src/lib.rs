mod expr;
mod parser;
mod stmt;

use parser::Parser;
use screept_ast::ast::{Expr, Stmt};
use screept_ast::diagnostic::Diagnostic;

/// Parse a complete expression. Trailing tokens are a syntax error;
/// on failure no partial AST is returned.
pub fn parse_expression(source: &str) -> Result<Expr, Vec<Diagnostic>> {
    let mut parser = Parser::new(source);
    let result = parser.parse_conditional();
    parser.finish(result)
}

/// Parse a complete statement. Trailing tokens are a syntax error;
/// on failure no partial AST is returned.
pub fn parse_statement(source: &str) -> Result<Stmt, Vec<Diagnostic>> {
    let mut parser = Parser::new(source);
    let result = parser.parse_stmt();
    parser.finish(result)
}
