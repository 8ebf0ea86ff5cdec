use crate::core::ast::Expr;
use crate::core::value::Value;

/// renders an expression tree as a fully-parenthesized prefix string, e.g.
/// `(* (- 123) (group 45.67))`; diagnostics only, the evaluator never
/// consults it
pub fn print_expr(expr: &Expr<'_>) -> String {
    match expr {
        Expr::Assign { name, value, .. } => format!("(= {} {})", name.lexeme, print_expr(value)),
        Expr::Binary { op, lhs, rhs, .. } => {
            format!("({} {} {})", op.lexeme, print_expr(lhs), print_expr(rhs))
        }
        Expr::Call { callee, args, .. } => {
            let mut text = format!("(call {}", print_expr(callee));
            for arg in args {
                text.push(' ');
                text.push_str(&print_expr(arg));
            }
            text.push(')');
            text
        }
        Expr::Grouping { expr, .. } => format!("(group {})", print_expr(expr)),
        Expr::Literal { value, .. } => match value {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        },
        Expr::Logical { op, lhs, rhs, .. } => {
            format!("({} {} {})", op.lexeme, print_expr(lhs), print_expr(rhs))
        }
        Expr::Unary { op, rhs, .. } => format!("({} {})", op.lexeme, print_expr(rhs)),
        Expr::Variable { name, .. } => name.lexeme.to_string(),
    }
}
