//! Formatting of expressions with minimal parenthesization.

use crate::expr::{BinOp, Expr, OperatorKind};
use std::fmt;

/// The binding strength of a node when printed. Anything atomic binds tightest; negative
/// constants print with a leading minus and bind like a sum.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary(BinOp::Sum | BinOp::Difference, ..) => 1,
        Expr::Binary(BinOp::Product | BinOp::Quotient, ..) => 2,
        Expr::Binary(BinOp::Power, ..) => 3,
        Expr::Integer(n) if *n < 0 => 1,
        Expr::Float(f) if f.is_sign_negative() => 1,
        _ => 4,
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expr,
    parenthesize: bool,
) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(value) => write!(f, "{}", value.to_f64()),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Binary(op, lhs, rhs) => {
                let prec = precedence(self);
                let (symbol, rhs_breaks_ties) = match op {
                    BinOp::Sum => (" + ", false),
                    BinOp::Difference => (" - ", true),
                    BinOp::Product => (" * ", false),
                    BinOp::Quotient => (" / ", true),
                    BinOp::Power => ("^", false),
                };

                // powers nest to the right, so a left power operand always needs parentheses
                let lhs_parens = if *op == BinOp::Power {
                    precedence(lhs) <= prec
                } else {
                    precedence(lhs) < prec
                };
                let rhs_parens = precedence(rhs) < prec
                    || (rhs_breaks_ties && precedence(rhs) == prec);

                write_operand(f, lhs, lhs_parens)?;
                write!(f, "{}", symbol)?;
                write_operand(f, rhs, rhs_parens)
            },
            Self::Call(func, arg) => write!(f, "{}({})", func.as_str(), arg),
            Self::Operator(OperatorKind::Root, params) => {
                if params.len() == 2 && params[0].as_integer().map_or(false, |n| *n == 2) {
                    return write!(f, "sqrt({})", params[1]);
                }
                write!(f, "root(")?;
                let mut iter = params.iter();
                if let Some(param) = iter.next() {
                    write!(f, "{}", param)?;
                    for param in iter {
                        write!(f, ", {}", param)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::Func;
    use super::*;

    #[test]
    fn flat_sums_and_products() {
        let expr = Expr::symbol("x") + Expr::symbol("y") * Expr::int(2);
        assert_eq!(expr.to_string(), "x + y * 2");
    }

    #[test]
    fn difference_groups_its_right_side() {
        let expr = Expr::symbol("a") - (Expr::symbol("b") + Expr::symbol("c"));
        assert_eq!(expr.to_string(), "a - (b + c)");
    }

    #[test]
    fn quotients_and_powers() {
        let expr = Expr::quotient(
            Expr::symbol("x") + Expr::int(1),
            Expr::power(Expr::symbol("x"), Expr::int(2)),
        );
        assert_eq!(expr.to_string(), "(x + 1) / x^2");

        let expr = Expr::power(Expr::int(2), Expr::int(-2));
        assert_eq!(expr.to_string(), "2^(-2)");

        let expr = Expr::power(
            Expr::power(Expr::symbol("x"), Expr::int(2)),
            Expr::symbol("y"),
        );
        assert_eq!(expr.to_string(), "(x^2)^y");
    }

    #[test]
    fn calls_and_roots() {
        let expr = Expr::call(Func::Sin, Expr::pi());
        assert_eq!(expr.to_string(), "sin(pi)");

        assert_eq!(Expr::symbol("x").sqrt().to_string(), "sqrt(x)");
        assert_eq!(
            Expr::root(Expr::int(3), Expr::symbol("x")).to_string(),
            "root(3, x)",
        );
    }

    #[test]
    fn rational_constants() {
        assert_eq!(Expr::ratio(-1, 2).to_string(), "(-1) / 2");
        assert_eq!(
            (Expr::symbol("x") * Expr::ratio(1, 2)).to_string(),
            "x * 1 / 2",
        );
    }
}
