use std::fmt;

// ── Runtime values ──────────────────────────────────────────────

/// A runtime value. Also an expression atom, so literals self-evaluate.
///
/// The derived `PartialEq` is structural (function bodies compare by AST);
/// the interpreter's `==` operator uses its own `value_eq` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// A first-class function literal wrapping its body expression.
    /// Application semantics live in the interpreter.
    Function(Box<Expr>),
}

// ── Identifiers ─────────────────────────────────────────────────

/// A variable/procedure name, fixed at parse time or computed at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Literal(String),
    /// `$[e]`: the expression's text form becomes the name.
    Computed(Box<Expr>),
}

// ── Expressions ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(Identifier),
    BinaryOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Comparison {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
    FuncCall {
        id: Identifier,
        args: Vec<Expr>,
    },
}

// ── Statements ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Print(Expr),
    Block(Vec<Stmt>),
    Bind {
        id: Identifier,
        value: Expr,
    },
    ProcDef {
        id: Identifier,
        body: Box<Stmt>,
    },
    ProcRun {
        id: Identifier,
        args: Vec<Expr>,
    },
    Rnd {
        id: Identifier,
        min: Expr,
        max: Expr,
    },
    /// `els` is optional at the AST level; the grammar always supplies one.
    If {
        cond: Expr,
        then: Box<Stmt>,
        els: Option<Box<Stmt>>,
    },
    Emit(Expr),
}

// ── Source form ─────────────────────────────────────────────────
//
// Display renders parseable source text. Compound sub-expressions are
// always parenthesized so the printed form reparses to an equivalent AST.

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for ch in text.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            _ => write!(f, "{}", ch)?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write_quoted(f, s),
            Value::Function(body) => write!(f, "FUNC {}", body),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Literal(name) => write!(f, "{}", name),
            Identifier::Computed(expr) => write!(f, "$[{}]", expr),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
        };
        write!(f, "{}", op)
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            CmpOp::Eq => "==",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
        };
        write!(f, "{}", op)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Var(id) => write!(f, "{}", id),
            Expr::BinaryOp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::UnaryOp { op, operand } => match op {
                UnaryOp::Neg => write!(f, "(-{})", operand),
                UnaryOp::Not => write!(f, "(!{})", operand),
            },
            Expr::Comparison { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Conditional {
                cond,
                if_true,
                if_false,
            } => write!(f, "({} ? {} : {})", cond, if_true, if_false),
            Expr::FuncCall { id, args } => {
                write!(f, "{}(", id)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Print(e) => write!(f, "PRINT {}", e),
            Stmt::Block(body) => {
                if body.is_empty() {
                    return write!(f, "{{ }}");
                }
                write!(f, "{{ ")?;
                for (i, stmt) in body.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", stmt)?;
                }
                write!(f, " }}")
            }
            Stmt::Bind { id, value } => write!(f, "{} = {}", id, value),
            Stmt::ProcDef { id, body } => write!(f, "PROC {} {}", id, body),
            Stmt::ProcRun { id, args } => {
                write!(f, "RUN {}(", id)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Stmt::Rnd { id, min, max } => write!(f, "RND {} {} {}", id, min, max),
            Stmt::If { cond, then, els } => {
                write!(f, "IF {} THEN {} ELSE ", cond, then)?;
                match els {
                    Some(e) => write!(f, "{}", e),
                    None => write!(f, "{{ }}"),
                }
            }
            Stmt::Emit(e) => write!(f, "EMIT {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn text_display_escapes() {
        assert_eq!(
            Value::Text("a\"b\\c\nd".into()).to_string(),
            r#""a\"b\\c\nd""#
        );
    }

    #[test]
    fn expr_display_parenthesizes() {
        let e = Expr::BinaryOp {
            op: BinOp::Add,
            lhs: Box::new(Expr::Literal(Value::Number(1.0))),
            rhs: Box::new(Expr::BinaryOp {
                op: BinOp::Mul,
                lhs: Box::new(Expr::Var(Identifier::Literal("x".into()))),
                rhs: Box::new(Expr::Literal(Value::Number(2.0))),
            }),
        };
        assert_eq!(e.to_string(), "(1 + (x * 2))");
    }

    #[test]
    fn computed_identifier_display() {
        let id = Identifier::Computed(Box::new(Expr::Literal(Value::Text("hp".into()))));
        assert_eq!(id.to_string(), "$[\"hp\"]");
    }

    #[test]
    fn stmt_display_round_shapes() {
        let s = Stmt::Block(vec![
            Stmt::Bind {
                id: Identifier::Literal("x".into()),
                value: Expr::Literal(Value::Number(5.0)),
            },
            Stmt::Print(Expr::Var(Identifier::Literal("x".into()))),
        ]);
        assert_eq!(s.to_string(), "{ x = 5; PRINT x }");
    }

    #[test]
    fn if_without_else_prints_empty_block() {
        let s = Stmt::If {
            cond: Expr::Literal(Value::Number(1.0)),
            then: Box::new(Stmt::Block(vec![])),
            els: None,
        };
        assert_eq!(s.to_string(), "IF 1 THEN { } ELSE { }");
    }
}
