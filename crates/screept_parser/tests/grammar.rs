//! Grammar conformance tests: precedence, associativity, and the
//! statement productions.

use screept_ast::ast::{BinOp, CmpOp, Expr, Identifier, Stmt, UnaryOp, Value};
use screept_parser::{parse_expression, parse_statement};

// ── Helpers ────────────────────────────────────────────────────

fn expr(source: &str) -> Expr {
    match parse_expression(source) {
        Ok(e) => e,
        Err(diags) => panic!(
            "parse failed for {:?}: {:?}",
            source,
            diags.iter().map(|d| &d.message).collect::<Vec<_>>()
        ),
    }
}

fn stmt(source: &str) -> Stmt {
    match parse_statement(source) {
        Ok(s) => s,
        Err(diags) => panic!(
            "parse failed for {:?}: {:?}",
            source,
            diags.iter().map(|d| &d.message).collect::<Vec<_>>()
        ),
    }
}

fn num(n: f64) -> Expr {
    Expr::Literal(Value::Number(n))
}

fn var(name: &str) -> Expr {
    Expr::Var(Identifier::Literal(name.into()))
}

// ── Expression precedence ──────────────────────────────────────

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        expr("1 + 2 * 3"),
        Expr::BinaryOp {
            op: BinOp::Add,
            lhs: Box::new(num(1.0)),
            rhs: Box::new(Expr::BinaryOp {
                op: BinOp::Mul,
                lhs: Box::new(num(2.0)),
                rhs: Box::new(num(3.0)),
            }),
        }
    );
}

#[test]
fn additive_is_left_associative() {
    // 10 - 2 - 3 parses as (10 - 2) - 3
    assert_eq!(
        expr("10 - 2 - 3"),
        Expr::BinaryOp {
            op: BinOp::Sub,
            lhs: Box::new(Expr::BinaryOp {
                op: BinOp::Sub,
                lhs: Box::new(num(10.0)),
                rhs: Box::new(num(2.0)),
            }),
            rhs: Box::new(num(3.0)),
        }
    );
}

#[test]
fn multiplicative_is_left_associative() {
    assert_eq!(
        expr("8 / 4 / 2"),
        Expr::BinaryOp {
            op: BinOp::Div,
            lhs: Box::new(Expr::BinaryOp {
                op: BinOp::Div,
                lhs: Box::new(num(8.0)),
                rhs: Box::new(num(4.0)),
            }),
            rhs: Box::new(num(2.0)),
        }
    );
}

#[test]
fn floor_division_parses() {
    assert_eq!(
        expr("7 // 2"),
        Expr::BinaryOp {
            op: BinOp::FloorDiv,
            lhs: Box::new(num(7.0)),
            rhs: Box::new(num(2.0)),
        }
    );
}

#[test]
fn comparison_is_lower_than_additive() {
    assert_eq!(
        expr("1 + 2 == 3"),
        Expr::Comparison {
            op: CmpOp::Eq,
            lhs: Box::new(Expr::BinaryOp {
                op: BinOp::Add,
                lhs: Box::new(num(1.0)),
                rhs: Box::new(num(2.0)),
            }),
            rhs: Box::new(num(3.0)),
        }
    );
}

#[test]
fn comparison_is_non_associative() {
    assert!(parse_expression("1 < 2 < 3").is_err());
    assert!(parse_expression("1 == 2 == 3").is_err());
}

#[test]
fn conditional_false_branch_is_right_associative() {
    // a ? b : c ? d : e  parses as  a ? b : (c ? d : e)
    assert_eq!(
        expr("a ? b : c ? d : e"),
        Expr::Conditional {
            cond: Box::new(var("a")),
            if_true: Box::new(var("b")),
            if_false: Box::new(Expr::Conditional {
                cond: Box::new(var("c")),
                if_true: Box::new(var("d")),
                if_false: Box::new(var("e")),
            }),
        }
    );
}

#[test]
fn conditional_true_branch_may_nest() {
    assert_eq!(
        expr("a ? b ? c : d : e"),
        Expr::Conditional {
            cond: Box::new(var("a")),
            if_true: Box::new(Expr::Conditional {
                cond: Box::new(var("b")),
                if_true: Box::new(var("c")),
                if_false: Box::new(var("d")),
            }),
            if_false: Box::new(var("e")),
        }
    );
}

#[test]
fn unary_binds_tighter_than_multiplication() {
    assert_eq!(
        expr("-2 * 3"),
        Expr::BinaryOp {
            op: BinOp::Mul,
            lhs: Box::new(Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand: Box::new(num(2.0)),
            }),
            rhs: Box::new(num(3.0)),
        }
    );
}

#[test]
fn unary_operators_stack() {
    assert_eq!(
        expr("!!x"),
        Expr::UnaryOp {
            op: UnaryOp::Not,
            operand: Box::new(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(var("x")),
            }),
        }
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(
        expr("(1 + 2) * 3"),
        Expr::BinaryOp {
            op: BinOp::Mul,
            lhs: Box::new(Expr::BinaryOp {
                op: BinOp::Add,
                lhs: Box::new(num(1.0)),
                rhs: Box::new(num(2.0)),
            }),
            rhs: Box::new(num(3.0)),
        }
    );
}

// ── Atoms ──────────────────────────────────────────────────────

#[test]
fn string_literal_atom() {
    assert_eq!(expr("\"hi\""), Expr::Literal(Value::Text("hi".into())));
}

#[test]
fn func_literal_wraps_a_conditional() {
    assert_eq!(
        expr("FUNC _0 + _1"),
        Expr::Literal(Value::Function(Box::new(Expr::BinaryOp {
            op: BinOp::Add,
            lhs: Box::new(var("_0")),
            rhs: Box::new(var("_1")),
        })))
    );
}

#[test]
fn call_with_arguments() {
    assert_eq!(
        expr("f(1, x)"),
        Expr::FuncCall {
            id: Identifier::Literal("f".into()),
            args: vec![num(1.0), var("x")],
        }
    );
}

#[test]
fn call_with_no_arguments() {
    assert_eq!(
        expr("f()"),
        Expr::FuncCall {
            id: Identifier::Literal("f".into()),
            args: vec![],
        }
    );
}

#[test]
fn computed_identifier_atom() {
    assert_eq!(
        expr("$[\"a\" + x]"),
        Expr::Var(Identifier::Computed(Box::new(Expr::BinaryOp {
            op: BinOp::Add,
            lhs: Box::new(Expr::Literal(Value::Text("a".into()))),
            rhs: Box::new(var("x")),
        })))
    );
}

#[test]
fn computed_identifier_call() {
    assert_eq!(
        expr("$[x](1)"),
        Expr::FuncCall {
            id: Identifier::Computed(Box::new(var("x"))),
            args: vec![num(1.0)],
        }
    );
}

// ── Statements ─────────────────────────────────────────────────

#[test]
fn print_statement() {
    assert_eq!(stmt("PRINT 1"), Stmt::Print(num(1.0)));
}

#[test]
fn emit_statement() {
    assert_eq!(
        stmt("EMIT \"ping\""),
        Stmt::Emit(Expr::Literal(Value::Text("ping".into())))
    );
}

#[test]
fn bind_statement() {
    assert_eq!(
        stmt("x = 5"),
        Stmt::Bind {
            id: Identifier::Literal("x".into()),
            value: num(5.0),
        }
    );
}

#[test]
fn bind_to_computed_identifier() {
    assert_eq!(
        stmt("$[\"x\"] = 5"),
        Stmt::Bind {
            id: Identifier::Computed(Box::new(Expr::Literal(Value::Text("x".into())))),
            value: num(5.0),
        }
    );
}

#[test]
fn block_semicolon_separated() {
    assert_eq!(
        stmt("{ x = 1; PRINT x }"),
        Stmt::Block(vec![
            Stmt::Bind {
                id: Identifier::Literal("x".into()),
                value: num(1.0),
            },
            Stmt::Print(var("x")),
        ])
    );
}

#[test]
fn block_trailing_semicolon_is_optional() {
    assert_eq!(stmt("{ PRINT 1; }"), stmt("{ PRINT 1 }"));
}

#[test]
fn empty_block_is_legal() {
    assert_eq!(stmt("{ }"), Stmt::Block(vec![]));
    assert_eq!(stmt("{}"), Stmt::Block(vec![]));
}

#[test]
fn proc_def_and_run() {
    assert_eq!(
        stmt("PROC p { PRINT 1 }"),
        Stmt::ProcDef {
            id: Identifier::Literal("p".into()),
            body: Box::new(Stmt::Block(vec![Stmt::Print(num(1.0))])),
        }
    );
    assert_eq!(
        stmt("RUN p(1, 2)"),
        Stmt::ProcRun {
            id: Identifier::Literal("p".into()),
            args: vec![num(1.0), num(2.0)],
        }
    );
}

#[test]
fn rnd_statement() {
    assert_eq!(
        stmt("RND roll 1 6"),
        Stmt::Rnd {
            id: Identifier::Literal("roll".into()),
            min: num(1.0),
            max: num(6.0),
        }
    );
}

#[test]
fn if_requires_else() {
    assert_eq!(
        stmt("IF x THEN PRINT 1 ELSE { }"),
        Stmt::If {
            cond: var("x"),
            then: Box::new(Stmt::Print(num(1.0))),
            els: Some(Box::new(Stmt::Block(vec![]))),
        }
    );
    assert!(parse_statement("IF x THEN PRINT 1").is_err());
}

// ── Errors ─────────────────────────────────────────────────────

#[test]
fn trailing_tokens_are_rejected() {
    assert!(parse_expression("1 + 2 3").is_err());
    assert!(parse_statement("PRINT 1 PRINT 2").is_err());
}

#[test]
fn unterminated_string_is_a_syntax_error() {
    let diags = parse_expression("\"oops").unwrap_err();
    assert!(diags.iter().any(|d| d.message.contains("unterminated")));
}

#[test]
fn missing_close_paren() {
    assert!(parse_expression("(1 + 2").is_err());
}

#[test]
fn unclosed_block() {
    let diags = parse_statement("{ PRINT 1; ").unwrap_err();
    assert!(!diags.is_empty());
}

#[test]
fn bind_requires_equals() {
    assert!(parse_statement("x 5").is_err());
}

#[test]
fn diagnostics_carry_spans() {
    let diags = parse_expression("1 + ").unwrap_err();
    assert!(!diags.is_empty());
    assert!(!diags[0].span.is_dummy());
}
