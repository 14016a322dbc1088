//! A tree representation of mathematical expressions, built for algebraic manipulation.
//!
//! An expression is a tree of [`Expr`] nodes: exact and approximate constants, symbols, binary
//! operations, unary function applications, and operator applications such as roots. The tree is
//! what the simplification engine rewrites; every submodule that deals with symbolic manipulation
//! works in terms of this type.
//!
//! Exact non-integer rationals are represented structurally, as a [`BinOp::Quotient`] of two
//! [`Expr::Integer`]s. Rules that produce rational constants are required to keep them in lowest
//! terms with a positive denominator; [`Expr::rational`] restores that form.
//!
//! # Strict equality
//!
//! A common problem in symbolic computation is determining whether two expressions are
//! semantically equal, for example to decide if two terms are similar enough to be combined.
//! This is extremely difficult in general: there are infinitely many ways to write the same
//! expression, and deciding equality of `x^2 + 2x + 1` and `(x + 1)^2` already requires the very
//! simplification machinery that wanted to ask the question. A chicken-and-egg problem.
//!
//! To get out of it, this module implements a cheap subset of semantic equality called **strict
//! equality**. Two expressions are strictly equal if:
//!
//! - They are the same kind of node, with strictly equal children, where
//! - sums and differences compare as one class: both sides are flattened into their signed terms,
//!   which must match as multisets, in any order;
//! - products compare by their flattened factors, also as multisets;
//! - exact constants compare by numeric value (so `Quotient(1, 2)` equals `Quotient(1, 2)` but
//!   not the float `0.5`).
//!
//! Strict equality never reports false positives: strictly equal expressions are always
//! semantically equal. It is intentionally simple and fast, and it depends on no simplification,
//! so the simplifier can use it freely while rewriting. The [`PartialEq`] implementation for
//! [`Expr`] is strict equality; the [`equivalent`](crate::equiv::equivalent) predicate extends it
//! with sign and coefficient normalization.

use crate::primitive::{float, int, rat, PRECISION};
use crate::terms::TermCollection;
use rug::{Float, Integer, Rational};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The binary operations an expression node can apply to its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `a + b`
    Sum,

    /// `a - b`
    Difference,

    /// `a * b`
    Product,

    /// `a / b`
    Quotient,

    /// `a ^ b`
    Power,
}

/// The unary functions understood by the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
    Arcsec,
    Arccsc,

    /// The base-10 logarithm.
    Lg,

    /// The absolute value.
    Abs,
}

impl Func {
    /// The conventional name of the function, as used when formatting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cot => "cot",
            Self::Sec => "sec",
            Self::Csc => "cosec",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Arccot => "arccot",
            Self::Arcsec => "arcsec",
            Self::Arccsc => "arccosec",
            Self::Lg => "lg",
            Self::Abs => "abs",
        }
    }

    /// Returns true for the six direct trigonometric functions.
    pub fn is_trig(self) -> bool {
        matches!(
            self,
            Self::Sin | Self::Cos | Self::Tan | Self::Cot | Self::Sec | Self::Csc
        )
    }

    /// Returns true for the six inverse trigonometric functions.
    pub fn is_inverse_trig(self) -> bool {
        matches!(
            self,
            Self::Arcsin | Self::Arccos | Self::Arctan | Self::Arccot | Self::Arcsec | Self::Arccsc
        )
    }
}

/// Operators that take a parameter list rather than a fixed pair of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// `Root` has two parameters: the degree of the root, then the radicand.
    /// `Operator(Root, [3, x])` is the cube root of `x`.
    Root,
}

/// A node in an expression tree.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
pub enum Expr {
    /// An exact integer constant, such as `2` or `144`.
    Integer(Integer),

    /// An approximate floating-point constant, such as `3.14`.
    Float(Float),

    /// A variable, such as `x` or `y`. The name `pi` is reserved for the circle constant.
    Symbol(String),

    /// A binary operation applied to two child expressions.
    Binary(BinOp, Box<Expr>, Box<Expr>),

    /// A unary function application, such as `sin(x)`.
    Call(Func, Box<Expr>),

    /// An operator application with a parameter list, such as `root(3, x)`.
    Operator(OperatorKind, Vec<Expr>),
}

impl Expr {
    /// Creates an exact integer constant.
    pub fn int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Integer(int(n))
    }

    /// Creates an approximate constant with the crate precision.
    pub fn float<T>(n: T) -> Self
    where
        Float: rug::Assign<T>,
    {
        Self::Float(float(n))
    }

    /// Creates a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// The circle constant, represented as the reserved symbol `pi`.
    pub fn pi() -> Self {
        Self::Symbol(String::from("pi"))
    }

    /// Creates the canonical expression for an exact rational constant: an [`Expr::Integer`] if
    /// the value is integral, otherwise a [`BinOp::Quotient`] of two integers in lowest terms
    /// with a positive denominator.
    pub fn rational(r: Rational) -> Self {
        if *r.denom() == 1 {
            Self::Integer(r.into_numer_denom().0)
        } else {
            let (numer, denom) = r.into_numer_denom();
            Self::quotient(Self::Integer(numer), Self::Integer(denom))
        }
    }

    /// Creates the canonical expression for the exact ratio `n / d`.
    ///
    /// `d` must be nonzero.
    pub fn ratio<N, D>(n: N, d: D) -> Self
    where
        Integer: From<N> + From<D>,
    {
        Self::rational(rat((int(n), int(d))))
    }

    /// Creates a binary node.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Creates a sum node. No simplification is done.
    pub fn sum(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Sum, lhs, rhs)
    }

    /// Creates a difference node. No simplification is done.
    pub fn difference(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Difference, lhs, rhs)
    }

    /// Creates a product node. No simplification is done.
    pub fn product(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Product, lhs, rhs)
    }

    /// Creates a quotient node. No simplification is done.
    pub fn quotient(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Quotient, lhs, rhs)
    }

    /// Creates a power node. No simplification is done.
    pub fn power(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinOp::Power, lhs, rhs)
    }

    /// Creates a function application node.
    pub fn call(func: Func, arg: Expr) -> Self {
        Self::Call(func, Box::new(arg))
    }

    /// Creates a root operator node with the given degree and radicand.
    pub fn root(degree: Expr, radicand: Expr) -> Self {
        Self::Operator(OperatorKind::Root, vec![degree, radicand])
    }

    /// Returns the square root of this expression. No simplification is done.
    pub fn sqrt(self) -> Self {
        Self::root(Self::int(2), self)
    }

    /// Returns true if the expression is the exact integer zero or an approximate zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_zero(),
            Self::Float(f) => f.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the expression is the exact integer one or an approximate one.
    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 1,
            Self::Float(f) => *f == 1,
            _ => false,
        }
    }

    /// Returns true if the expression is an [`Expr::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Returns true if the expression is an [`Expr::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// If the expression is an [`Expr::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// If the expression is an [`Expr::Symbol`], returns the contained name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if the expression is the reserved symbol `pi`.
    pub fn is_pi(&self) -> bool {
        self.as_symbol() == Some("pi")
    }

    /// If the expression is an exact rational constant, returns its value.
    ///
    /// This reads [`Expr::Integer`], integer [`BinOp::Quotient`]s (reduced or not, as long as the
    /// denominator is nonzero), and a leading `-1 *` factor around either. Approximate constants
    /// are never rational.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Integer(n) => Some(rat(n)),
            Self::Binary(BinOp::Quotient, lhs, rhs) => {
                let numer = lhs.as_integer()?;
                let denom = rhs.as_integer()?;
                if denom.is_zero() {
                    None
                } else {
                    Some(rat((numer.clone(), denom.clone())))
                }
            },
            Self::Binary(BinOp::Product, lhs, rhs) => {
                if lhs.as_integer().map_or(false, |n| *n == -1) {
                    rhs.as_rational().map(|r| -r)
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    /// Returns true if the expression is an exact rational constant.
    pub fn is_rational_const(&self) -> bool {
        self.as_rational().is_some()
    }

    /// If the expression is any numeric constant, returns its value as a [`Float`] with the
    /// crate precision.
    pub fn to_float(&self) -> Option<Float> {
        match self {
            Self::Float(f) => Some(f.clone()),
            _ => self.as_rational().map(float),
        }
    }

    /// Returns true if the symbol with the given name occurs anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Self::Integer(_) | Self::Float(_) => false,
            Self::Symbol(sym) => sym == name,
            Self::Binary(_, lhs, rhs) => lhs.contains_symbol(name) || rhs.contains_symbol(name),
            Self::Call(_, arg) => arg.contains_symbol(name),
            Self::Operator(_, params) => params.iter().any(|p| p.contains_symbol(name)),
        }
    }

    /// Returns true if a sub-expression strictly equal to `sub` occurs anywhere in the
    /// expression, including the expression itself.
    pub fn contains(&self, sub: &Expr) -> bool {
        if self == sub {
            return true;
        }
        match self {
            Self::Integer(_) | Self::Float(_) | Self::Symbol(_) => false,
            Self::Binary(_, lhs, rhs) => lhs.contains(sub) || rhs.contains(sub),
            Self::Call(_, arg) => arg.contains(sub),
            Self::Operator(_, params) => params.iter().any(|p| p.contains(sub)),
        }
    }

    /// Returns the names of all symbols occurring in the expression, in first-occurrence order
    /// and without duplicates.
    pub fn symbols(&self) -> Vec<String> {
        fn collect(expr: &Expr, out: &mut Vec<String>) {
            match expr {
                Expr::Integer(_) | Expr::Float(_) => {},
                Expr::Symbol(name) => {
                    if !out.iter().any(|seen| seen == name) {
                        out.push(name.clone());
                    }
                },
                Expr::Binary(_, lhs, rhs) => {
                    collect(lhs, out);
                    collect(rhs, out);
                },
                Expr::Call(_, arg) => collect(arg, out),
                Expr::Operator(_, params) => {
                    for param in params {
                        collect(param, out);
                    }
                },
            }
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Replaces every sub-expression strictly equal to `target` with a copy of `replacement`.
    pub fn substitute(&self, target: &Expr, replacement: &Expr) -> Expr {
        if self == target {
            return replacement.clone();
        }

        match self {
            Self::Integer(_) | Self::Float(_) | Self::Symbol(_) => self.clone(),
            Self::Binary(op, lhs, rhs) => Self::binary(
                *op,
                lhs.substitute(target, replacement),
                rhs.substitute(target, replacement),
            ),
            Self::Call(func, arg) => Self::call(*func, arg.substitute(target, replacement)),
            Self::Operator(kind, params) => Self::Operator(
                *kind,
                params
                    .iter()
                    .map(|p| p.substitute(target, replacement))
                    .collect(),
            ),
        }
    }

    /// If the expression is the negation of something simpler, returns that something: a
    /// negative numeric constant, a quotient with a negative numerator, or a negative leading
    /// coefficient in a product.
    pub fn as_negated(&self) -> Option<Expr> {
        match self {
            Self::Integer(n) if *n < 0 => Some(Self::Integer(int(-n.clone()))),
            Self::Float(f) if f.is_sign_negative() && !f.is_zero() => {
                Some(Self::Float(-f.clone()))
            },
            Self::Binary(BinOp::Quotient, lhs, rhs) => {
                let numer = lhs.as_integer()?;
                if *numer < 0 {
                    Some(Self::quotient(
                        Self::Integer(int(-numer.clone())),
                        (**rhs).clone(),
                    ))
                } else {
                    None
                }
            },
            Self::Binary(BinOp::Product, lhs, rhs) => {
                let coefficient = lhs.as_rational()?;
                if coefficient == -1 {
                    Some((**rhs).clone())
                } else if coefficient < 0 {
                    Some(Self::product(Self::rational(-coefficient), (**rhs).clone()))
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    /// Flattens nested sums and differences into the signed terms that make up this expression.
    ///
    /// Each term carries its own sign: `a - b + c` flattens to `[a, -b, c]`. Expressions that are
    /// not sums or differences flatten to a single term.
    pub fn summands(&self) -> TermCollection<Expr> {
        fn collect(expr: &Expr, negate: bool, out: &mut TermCollection<Expr>) {
            match expr {
                Expr::Binary(BinOp::Sum, lhs, rhs) => {
                    collect(lhs, negate, out);
                    collect(rhs, negate, out);
                },
                Expr::Binary(BinOp::Difference, lhs, rhs) => {
                    collect(lhs, negate, out);
                    collect(rhs, !negate, out);
                },
                _ => {
                    let term = expr.clone();
                    out.add(if negate { -term } else { term });
                },
            }
        }

        let mut out = TermCollection::new();
        collect(self, false, &mut out);
        out
    }

    /// Flattens nested products into the factors that make up this expression.
    ///
    /// Quotients are left intact; only [`BinOp::Product`] chains are flattened. Expressions that
    /// are not products flatten to a single factor.
    pub fn factors(&self) -> TermCollection<Expr> {
        fn collect(expr: &Expr, out: &mut TermCollection<Expr>) {
            if let Expr::Binary(BinOp::Product, lhs, rhs) = expr {
                collect(lhs, out);
                collect(rhs, out);
            } else {
                out.add(expr.clone());
            }
        }

        let mut out = TermCollection::new();
        collect(self, &mut out);
        out
    }

    /// Rebuilds an expression from a collection of signed terms.
    ///
    /// An empty collection becomes the integer `0`, and a single term becomes the term itself.
    /// Negated terms are rebuilt as differences, so `[a, -b]` becomes `a - b` rather than
    /// `a + -1 * b`.
    pub fn sum_of(terms: TermCollection<Expr>) -> Expr {
        let mut iter = terms.into_values();
        let first = match iter.next() {
            Some(term) => term,
            None => return Expr::int(0),
        };

        iter.fold(first, |acc, term| match term.as_negated() {
            Some(positive) => Expr::difference(acc, positive),
            None => Expr::sum(acc, term),
        })
    }

    /// Rebuilds an expression from a collection of factors.
    ///
    /// An empty collection becomes the integer `1`, and a single factor becomes the factor
    /// itself.
    pub fn product_of(factors: TermCollection<Expr>) -> Expr {
        let mut iter = factors.into_values();
        let first = match iter.next() {
            Some(factor) => factor,
            None => return Expr::int(1),
        };

        iter.fold(first, Expr::product)
    }

    /// The precision used for approximate constants produced by this expression tree.
    pub const PRECISION: u32 = PRECISION;
}

/// Checks if two expressions are **strictly** equal.
///
/// Sums and differences compare as one class through their flattened signed terms, products
/// through their flattened factors, both as multisets. All other nodes compare structurally,
/// with exact constants compared by value.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Call(f, a), Self::Call(g, b)) => f == g && a == b,
            (Self::Operator(j, p), Self::Operator(k, q)) => j == k && p == q,
            (Self::Binary(op_a, lhs_a, rhs_a), Self::Binary(op_b, lhs_b, rhs_b)) => {
                let sum_class =
                    |op: &BinOp| matches!(op, BinOp::Sum | BinOp::Difference);
                if sum_class(op_a) && sum_class(op_b) {
                    self.summands()
                        .equivalent_in_terms(&other.summands(), |a, b| a == b)
                } else if *op_a == BinOp::Product && *op_b == BinOp::Product {
                    self.factors()
                        .equivalent_in_terms(&other.factors(), |a, b| a == b)
                } else {
                    op_a == op_b && lhs_a == lhs_b && rhs_a == rhs_b
                }
            },
            _ => false,
        }
    }
}

/// [`Eq`] is implemented manually to allow comparing [`Expr::Float`]s. This module **must
/// never** produce non-normal [`Float`]s (such as `NaN`)! Report any bugs that cause this to
/// happen.
impl Eq for Expr {}

/// Adds two [`Expr`]s together as a [`BinOp::Sum`] node. No simplification is done.
impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Self::sum(self, rhs)
    }
}

/// Subtracts two [`Expr`]s as a [`BinOp::Difference`] node. No simplification is done.
impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::difference(self, rhs)
    }
}

/// Multiplies two [`Expr`]s as a [`BinOp::Product`] node. No simplification is done.
impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::product(self, rhs)
    }
}

/// Divides two [`Expr`]s as a [`BinOp::Quotient`] node. No simplification is done.
impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Self::Output {
        Self::quotient(self, rhs)
    }
}

/// Multiplies this expression by -1. Numeric constants and quotients of integers are negated
/// directly, a leading `-1 *` factor is removed, and anything else is wrapped in one.
impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        match self {
            Self::Integer(n) => Self::Integer(-n),
            Self::Float(f) => Self::Float(-f),
            Self::Binary(BinOp::Quotient, lhs, rhs) if lhs.is_integer() => {
                Self::Binary(BinOp::Quotient, Box::new(-*lhs), rhs)
            },
            Self::Binary(BinOp::Product, lhs, rhs) if lhs.is_rational_const() => {
                match *lhs {
                    Expr::Integer(n) if n == -1 => *rhs,
                    lhs => Self::Binary(BinOp::Product, Box::new(-lhs), rhs),
                }
            },
            expr => Self::int(-1) * expr,
        }
    }
}
