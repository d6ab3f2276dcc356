use screept_ast::ast::Value;

// ── Coercions ──────────────────────────────────────────────────
//
// Two numeric conversions exist and are deliberately not unified:
// arithmetic treats every non-number as 0, while statement-level
// truthiness treats text (and functions) as 1. The conditional
// *expression* uses neither; it compares values against Number(0)
// with `value_eq`.

/// Arithmetic-domain conversion: used by `- * / //`, unary `-`, and
/// the `<`/`>` comparisons.
pub fn as_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        _ => 0.0,
    }
}

/// Truthiness conversion: used by the IF statement, unary `!`, and
/// dialog conditions. Only a number can be zero.
pub fn truth_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Text(_) | Value::Function(_) => 1.0,
    }
}

/// Text form: numbers in decimal, text verbatim, functions as the
/// opaque `<FUNC>` marker.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        Value::Function(_) => "<FUNC>".to_string(),
    }
}

/// Runtime `==`: numbers by numeric value, text by exact contents,
/// everything else (functions included) unequal. Distinct from the
/// structural `PartialEq` derive on `Value`.
pub fn value_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => false,
    }
}
