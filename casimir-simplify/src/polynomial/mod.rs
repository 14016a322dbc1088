//! Single-variable polynomial algebra over symbolic coefficients.
//!
//! A [`Polynomial`] stores its coefficients in a [`TermCollection`] with the slot index as
//! the power: holes are zero coefficients, and the trailing-hole invariant of the container
//! makes the highest occupied slot the degree. Coefficients are arbitrary variable-free
//! [`Expr`]s, normalized through the simplifier, so `gcd((x^2 - 1), (x - 1))` and a division
//! with coefficients like `sqrt(2)` both work the same way.
//!
//! Everything here is exact. Operations that could run away are bounded by
//! [`Bounds`](crate::Bounds): extraction refuses degrees above `max_polynomial_degree` with
//! a [`DegreeTooHigh`](ErrorKind::DegreeTooHigh) error, and the long-running loops poll the
//! interruption flag.

mod factoring;
pub mod multivariate;

pub use multivariate::{extract_multi, MultiPolynomial};

use crate::ctxt::Ctxt;
use casimir_expr::{BinOp, Error, ErrorKind, Expr, TermCollection};
use rug::Rational;

/// A polynomial in one named variable. See the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    variable: String,
    coefficients: TermCollection<Expr>,
}

/// The structural degree bound of an expression in the given variable, without expanding.
///
/// Sums take the larger bound of their operands, products add theirs, and integer powers
/// multiply. `None` means the expression is not a polynomial shape in the variable at all.
pub fn degree(expr: &Expr, variable: &str) -> Option<usize> {
    degree_with(expr, variable, &|a, b| a.max(b))
}

/// The structural lower degree bound, the order: the sum counterpart takes the smaller
/// operand bound.
pub fn order(expr: &Expr, variable: &str) -> Option<usize> {
    degree_with(expr, variable, &|a, b| a.min(b))
}

/// Returns true if the expression is structurally a polynomial in the variable.
pub fn is_polynomial(expr: &Expr, variable: &str) -> bool {
    degree(expr, variable).is_some()
}

fn degree_with(expr: &Expr, variable: &str, pick: &dyn Fn(usize, usize) -> usize) -> Option<usize> {
    if !expr.contains_symbol(variable) {
        return Some(0);
    }
    match expr {
        Expr::Symbol(_) => Some(1),
        Expr::Binary(BinOp::Sum | BinOp::Difference, lhs, rhs) => Some(pick(
            degree_with(lhs, variable, pick)?,
            degree_with(rhs, variable, pick)?,
        )),
        Expr::Binary(BinOp::Product, lhs, rhs) => {
            Some(degree_with(lhs, variable, pick)? + degree_with(rhs, variable, pick)?)
        },
        Expr::Binary(BinOp::Quotient, num, den) => {
            if den.contains_symbol(variable) {
                None
            } else {
                degree_with(num, variable, pick)
            }
        },
        Expr::Binary(BinOp::Power, base, exp) => {
            let n = exp.as_integer()?.to_usize()?;
            Some(degree_with(base, variable, pick)? * n)
        },
        _ => None,
    }
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            coefficients: TermCollection::new(),
        }
    }

    /// A constant polynomial. A zero constant produces the zero polynomial.
    pub fn constant(variable: impl Into<String>, value: Expr) -> Self {
        let mut coefficients = TermCollection::new();
        if !value.is_zero() {
            coefficients.put(0, value);
        }
        Self {
            variable: variable.into(),
            coefficients,
        }
    }

    /// The polynomial `x` itself.
    fn identity(variable: impl Into<String>) -> Self {
        let mut coefficients = TermCollection::new();
        coefficients.put(1, Expr::int(1));
        Self {
            variable: variable.into(),
            coefficients,
        }
    }

    /// Builds a polynomial from raw coefficients, simplifying each and dropping zeros.
    fn from_raw(
        variable: String,
        raw: TermCollection<Expr>,
        ctxt: Ctxt,
    ) -> Result<Self, Error> {
        let mut coefficients = TermCollection::new();
        for (power, coeff) in raw.iter() {
            let simplified = crate::simplify_with(coeff, ctxt)?;
            if !simplified.is_zero() {
                coefficients.put(power, simplified);
            }
        }
        Ok(Self { variable, coefficients })
    }

    /// The name of the polynomial's variable.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns true for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.bound().checked_sub(1)
    }

    /// The degree and leading coefficient, or `None` for the zero polynomial.
    fn leading(&self) -> Option<(usize, &Expr)> {
        let degree = self.degree()?;
        self.coefficients.get(degree).map(|coeff| (degree, coeff))
    }

    /// The coefficient at the given power, with holes read as zero.
    pub fn coefficient(&self, power: usize) -> Expr {
        self.coefficients
            .get(power)
            .cloned()
            .unwrap_or_else(|| Expr::int(0))
    }

    /// The coefficients as rationals, or `None` if any coefficient is symbolic.
    pub(crate) fn rational_coefficients(&self) -> Option<Vec<(usize, Rational)>> {
        self.coefficients
            .iter()
            .map(|(power, coeff)| coeff.as_rational().map(|r| (power, r)))
            .collect()
    }

    pub(crate) fn coefficients(&self) -> &TermCollection<Expr> {
        &self.coefficients
    }

    /// Reads the expression as a polynomial in the variable.
    ///
    /// Sums, differences, products, powers with non-negative integer exponents, and
    /// quotients by variable-free divisors are followed; every other shape containing the
    /// variable declines with `Ok(None)`. A degree above
    /// [`max_polynomial_degree`](crate::Bounds::max_polynomial_degree) is reported as
    /// [`ErrorKind::DegreeTooHigh`], so callers can tell "not a polynomial" from "too big to
    /// expand".
    pub fn extract(expr: &Expr, variable: &str, ctxt: Ctxt) -> Result<Option<Self>, Error> {
        if !expr.contains_symbol(variable) {
            let coeff = crate::simplify_with(expr, ctxt)?;
            return Ok(Some(Self::constant(variable, coeff)));
        }

        match expr {
            Expr::Symbol(_) => Ok(Some(Self::identity(variable))),
            Expr::Binary(BinOp::Sum | BinOp::Difference, _, _) => {
                let mut total = Self::zero(variable);
                for term in expr.summands().into_values() {
                    let Some(part) = Self::extract(&term, variable, ctxt)? else {
                        return Ok(None);
                    };
                    total = total.add(&part, ctxt)?;
                }
                Ok(Some(total))
            },
            Expr::Binary(BinOp::Product, _, _) => {
                let mut total = Self::constant(variable, Expr::int(1));
                for factor in expr.factors().into_values() {
                    let Some(part) = Self::extract(&factor, variable, ctxt)? else {
                        return Ok(None);
                    };
                    total = total.mul(&part, ctxt)?;
                }
                Ok(Some(total))
            },
            Expr::Binary(BinOp::Quotient, num, den) => {
                if den.contains_symbol(variable) {
                    return Ok(None);
                }
                let Some(part) = Self::extract(num, variable, ctxt)? else {
                    return Ok(None);
                };
                let raw = part.coefficients.scalar_quotient(den);
                Ok(Some(Self::from_raw(variable.to_owned(), raw, ctxt)?))
            },
            Expr::Binary(BinOp::Power, base, exp) => {
                let Some(n) = exp.as_integer() else {
                    return Ok(None);
                };
                if *n < 0 {
                    return Ok(None);
                }
                let n = n.to_usize().unwrap_or(usize::MAX);

                let Some(part) = Self::extract(base, variable, ctxt)? else {
                    return Ok(None);
                };
                let limit = ctxt.bounds.max_polynomial_degree;
                if let Some(base_degree) = part.degree() {
                    let predicted = base_degree.saturating_mul(n);
                    if predicted > limit {
                        return Err(Error::new(
                            expr.clone(),
                            ErrorKind::DegreeTooHigh { degree: predicted, limit },
                        ));
                    }
                }

                let mut total = Self::constant(variable, Expr::int(1));
                for _ in 0..n {
                    total = total.mul(&part, ctxt)?;
                }
                Ok(Some(total))
            },
            _ => Ok(None),
        }
    }

    /// Rebuilds the expression `sum(c_i * x^i)`, highest power first.
    pub fn synthesize(&self) -> Expr {
        let mut terms = TermCollection::new();
        let occupied = self.coefficients.iter().collect::<Vec<_>>();
        for (power, coeff) in occupied.into_iter().rev() {
            let core = match power {
                0 => None,
                1 => Some(Expr::symbol(self.variable.clone())),
                _ => Some(Expr::power(
                    Expr::symbol(self.variable.clone()),
                    Expr::int(power as i64),
                )),
            };
            terms.add(match core {
                None => coeff.clone(),
                Some(core) if coeff.is_one() => core,
                Some(core) => Expr::product(coeff.clone(), core),
            });
        }
        Expr::sum_of(terms)
    }

    pub(crate) fn add(&self, other: &Self, ctxt: Ctxt) -> Result<Self, Error> {
        let bound = self.coefficients.bound().max(other.coefficients.bound());
        let mut raw = TermCollection::new();
        for power in 0..bound {
            match (self.coefficients.get(power), other.coefficients.get(power)) {
                (Some(a), Some(b)) => raw.put(power, Expr::sum(a.clone(), b.clone())),
                (Some(a), None) => raw.put(power, a.clone()),
                (None, Some(b)) => raw.put(power, b.clone()),
                (None, None) => continue,
            };
        }
        Self::from_raw(self.variable.clone(), raw, ctxt)
    }

    pub(crate) fn sub(&self, other: &Self, ctxt: Ctxt) -> Result<Self, Error> {
        let bound = self.coefficients.bound().max(other.coefficients.bound());
        let mut raw = TermCollection::new();
        for power in 0..bound {
            match (self.coefficients.get(power), other.coefficients.get(power)) {
                (Some(a), Some(b)) => raw.put(power, Expr::difference(a.clone(), b.clone())),
                (Some(a), None) => raw.put(power, a.clone()),
                (None, Some(b)) => raw.put(power, -b.clone()),
                (None, None) => continue,
            };
        }
        Self::from_raw(self.variable.clone(), raw, ctxt)
    }

    pub(crate) fn mul(&self, other: &Self, ctxt: Ctxt) -> Result<Self, Error> {
        let (Some(a), Some(b)) = (self.degree(), other.degree()) else {
            return Ok(Self::zero(self.variable.clone()));
        };
        let limit = ctxt.bounds.max_polynomial_degree;
        if a + b > limit {
            return Err(Error::new(
                self.synthesize(),
                ErrorKind::DegreeTooHigh { degree: a + b, limit },
            ));
        }

        let mut buckets: Vec<TermCollection<Expr>> = Vec::new();
        buckets.resize_with(a + b + 1, TermCollection::new);
        for (i, x) in self.coefficients.iter() {
            for (j, y) in other.coefficients.iter() {
                buckets[i + j].add(Expr::product(x.clone(), y.clone()));
            }
        }

        let mut raw = TermCollection::new();
        for (power, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                raw.put(power, Expr::sum_of(bucket));
            }
        }
        Self::from_raw(self.variable.clone(), raw, ctxt)
    }

    /// Multiplies every coefficient by a variable-free expression.
    pub(crate) fn scale(&self, scalar: &Expr, ctxt: Ctxt) -> Result<Self, Error> {
        let raw = self.coefficients.scalar_product(scalar);
        Self::from_raw(self.variable.clone(), raw, ctxt)
    }

    /// Multiplies by `x^shift`.
    pub(crate) fn shift_up(&self, shift: usize) -> Self {
        let mut coefficients = TermCollection::new();
        for (power, coeff) in self.coefficients.iter() {
            coefficients.put(power + shift, coeff.clone());
        }
        Self {
            variable: self.variable.clone(),
            coefficients,
        }
    }

    /// Long division: returns `(quotient, remainder)` with `self = divisor * quotient +
    /// remainder` and `deg remainder < deg divisor`.
    ///
    /// Dividing by the zero polynomial is a [`ErrorKind::DivisionByZero`] error.
    pub fn divide(&self, divisor: &Self, ctxt: Ctxt) -> Result<(Self, Self), Error> {
        let Some((divisor_degree, lead)) = divisor.leading() else {
            return Err(Error::new(self.synthesize(), ErrorKind::DivisionByZero));
        };
        let lead = lead.clone();
        let at = self.synthesize();

        let mut remainder = self.clone();
        let mut quotient_raw = TermCollection::new();
        while let Some((r_degree, r_lead)) = remainder.leading() {
            if r_degree < divisor_degree {
                break;
            }
            ctxt.check_interrupted(&at)?;

            let shift = r_degree - divisor_degree;
            let coeff =
                crate::simplify_with(&Expr::quotient(r_lead.clone(), lead.clone()), ctxt)?;
            quotient_raw.put(shift, coeff.clone());

            let subtrahend = divisor.shift_up(shift).scale(&coeff, ctxt)?;
            remainder = remainder.sub(&subtrahend, ctxt)?;
            // the leading terms cancel exactly; drop the slot even when a symbolic
            // coefficient does not simplify to a visible zero
            if remainder.coefficients.bound() > r_degree {
                remainder.coefficients.remove(r_degree);
            }
        }

        let quotient = Self::from_raw(self.variable.clone(), quotient_raw, ctxt)?;
        Ok((quotient, remainder))
    }

    /// Divides every coefficient by the leading one, making the polynomial monic.
    pub(crate) fn monic(&self, ctxt: Ctxt) -> Result<Self, Error> {
        match self.leading() {
            None => Ok(self.clone()),
            Some((_, lead)) if lead.is_one() => Ok(self.clone()),
            Some((_, lead)) => {
                let lead = lead.clone();
                let raw = self.coefficients.scalar_quotient(&lead);
                Self::from_raw(self.variable.clone(), raw, ctxt)
            },
        }
    }

    /// The greatest common divisor by the Euclidean remainder chain, normalized monic.
    pub fn gcd(&self, other: &Self, ctxt: Ctxt) -> Result<Self, Error> {
        let at = self.synthesize();
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            ctxt.check_interrupted(&at)?;
            let (_, r) = a.divide(&b, ctxt)?;
            a = b;
            b = r;
        }
        a.monic(ctxt)
    }

    /// Extended Euclid: returns `(g, u, v)` with `u * self + v * other = g` and `g` the
    /// monic GCD.
    pub fn bezout(&self, other: &Self, ctxt: Ctxt) -> Result<(Self, Self, Self), Error> {
        let at = self.synthesize();
        let variable = self.variable.clone();
        let (mut r0, mut r1) = (self.clone(), other.clone());
        let (mut s0, mut s1) = (
            Self::constant(variable.clone(), Expr::int(1)),
            Self::zero(variable.clone()),
        );
        let (mut t0, mut t1) = (
            Self::zero(variable.clone()),
            Self::constant(variable, Expr::int(1)),
        );

        while !r1.is_zero() {
            ctxt.check_interrupted(&at)?;
            let (q, r) = r0.divide(&r1, ctxt)?;
            let s = s0.sub(&q.mul(&s1, ctxt)?, ctxt)?;
            let t = t0.sub(&q.mul(&t1, ctxt)?, ctxt)?;
            (r0, r1) = (r1, r);
            (s0, s1) = (s1, s);
            (t0, t1) = (t1, t);
        }

        match r0.leading() {
            Some((_, lead)) if !lead.is_one() => {
                let lead = lead.clone();
                let inverse = crate::simplify_with(
                    &Expr::quotient(Expr::int(1), lead),
                    ctxt,
                )?;
                Ok((
                    r0.scale(&inverse, ctxt)?,
                    s0.scale(&inverse, ctxt)?,
                    t0.scale(&inverse, ctxt)?,
                ))
            },
            _ => Ok((r0, s0, t0)),
        }
    }

    /// [`bezout`](Self::bezout) with the degree-minimal pair: `u` is reduced modulo
    /// `other/g`, and `v` adjusted to keep the identity.
    pub fn bezout_reduced(&self, other: &Self, ctxt: Ctxt) -> Result<(Self, Self, Self), Error> {
        let (g, u, v) = self.bezout(other, ctxt)?;
        let (other_over_g, _) = other.divide(&g, ctxt)?;
        if other_over_g.degree().map_or(true, |d| d == 0) {
            return Ok((g, u, v));
        }

        let (q, u_reduced) = u.divide(&other_over_g, ctxt)?;
        let (self_over_g, _) = self.divide(&g, ctxt)?;
        let v_reduced = v.add(&q.mul(&self_over_g, ctxt)?, ctxt)?;
        Ok((g, u_reduced, v_reduced))
    }

    /// The formal derivative, taken on the coefficients.
    pub fn derivative(&self) -> Self {
        let mut coefficients = TermCollection::new();
        for (power, coeff) in self.coefficients.iter() {
            if power == 0 {
                continue;
            }
            let scaled = match coeff.as_rational() {
                Some(r) => Expr::rational(r * Rational::from(power as u64)),
                None => Expr::product(Expr::int(power as i64), coeff.clone()),
            };
            coefficients.put(power - 1, scaled);
        }
        Self {
            variable: self.variable.clone(),
            coefficients,
        }
    }

    /// The resultant of the two polynomials, as the determinant of their Sylvester matrix.
    ///
    /// Purely rational coefficients are eliminated exactly; symbolic matrices up to 6x6 go
    /// through cofactor expansion; larger symbolic systems decline with `Ok(None)`.
    pub fn resultant(&self, other: &Self, ctxt: Ctxt) -> Result<Option<Expr>, Error> {
        let (Some(m), Some(n)) = (self.degree(), other.degree()) else {
            return Ok(Some(Expr::int(0)));
        };
        if m == 0 {
            return Ok(Some(power_expr(self.coefficient(0), n, ctxt)?));
        }
        if n == 0 {
            return Ok(Some(power_expr(other.coefficient(0), m, ctxt)?));
        }

        let size = m + n;
        if let (Some(a), Some(b)) = (self.rational_coefficients(), other.rational_coefficients()) {
            let det = rational_sylvester_det(&a, m, &b, n, ctxt, &self.synthesize())?;
            return Ok(Some(Expr::rational(det)));
        }
        if size > 6 {
            return Ok(None);
        }

        let mut matrix = vec![vec![Expr::int(0); size]; size];
        for row in 0..n {
            for (power, coeff) in self.coefficients.iter() {
                matrix[row][row + m - power] = coeff.clone();
            }
        }
        for row in 0..m {
            for (power, coeff) in other.coefficients.iter() {
                matrix[n + row][row + n - power] = coeff.clone();
            }
        }
        let det = cofactor_det(&matrix);
        Ok(Some(crate::simplify_with(&det, ctxt)?))
    }
}

/// Raises a variable-free expression to a small power, folding through the simplifier.
fn power_expr(base: Expr, exp: usize, ctxt: Ctxt) -> Result<Expr, Error> {
    if exp == 1 {
        return Ok(base);
    }
    crate::simplify_with(&Expr::power(base, Expr::int(exp as i64)), ctxt)
}

/// Exact determinant of the Sylvester matrix of two rational-coefficient polynomials, by
/// Gaussian elimination over the rationals.
fn rational_sylvester_det(
    a: &[(usize, Rational)],
    m: usize,
    b: &[(usize, Rational)],
    n: usize,
    ctxt: Ctxt,
    at: &Expr,
) -> Result<Rational, Error> {
    let size = m + n;
    let mut matrix = vec![vec![Rational::new(); size]; size];
    for row in 0..n {
        for (power, coeff) in a {
            matrix[row][row + m - power] = coeff.clone();
        }
    }
    for row in 0..m {
        for (power, coeff) in b {
            matrix[n + row][row + n - power] = coeff.clone();
        }
    }

    let mut det = Rational::from(1);
    for pivot in 0..size {
        ctxt.check_interrupted(at)?;
        let Some(found) = (pivot..size).find(|&row| matrix[row][pivot] != 0) else {
            return Ok(Rational::new());
        };
        if found != pivot {
            matrix.swap(found, pivot);
            det = -det;
        }

        let lead = matrix[pivot][pivot].clone();
        det *= &lead;
        for row in (pivot + 1)..size {
            let factor = Rational::from(&matrix[row][pivot] / &lead);
            if factor == 0 {
                continue;
            }
            for col in pivot..size {
                let scaled = Rational::from(&matrix[pivot][col] * &factor);
                matrix[row][col] -= scaled;
            }
        }
    }
    Ok(det)
}

/// Determinant by cofactor expansion along the first row. Only used for small matrices.
fn cofactor_det(matrix: &[Vec<Expr>]) -> Expr {
    let size = matrix.len();
    if size == 1 {
        return matrix[0][0].clone();
    }

    let mut terms = TermCollection::new();
    for col in 0..size {
        let entry = &matrix[0][col];
        if entry.is_zero() {
            continue;
        }
        let minor = matrix[1..]
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(c, _)| *c != col)
                    .map(|(_, value)| value.clone())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let product = Expr::product(entry.clone(), cofactor_det(&minor));
        terms.add(if col % 2 == 0 { product } else { -product });
    }
    Expr::sum_of(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, Interrupt};
    use casimir_expr::ErrorKind;
    use pretty_assertions::assert_eq;

    fn with_ctxt<T>(f: impl FnOnce(Ctxt) -> T) -> T {
        let bounds = Bounds::default();
        let interrupt = Interrupt::new();
        f(Ctxt::new(&bounds, &interrupt))
    }

    /// `x^2 - 1` and friends, written out as expressions.
    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn poly(expr: &Expr, ctxt: Ctxt) -> Polynomial {
        Polynomial::extract(expr, "x", ctxt)
            .unwrap()
            .expect("expression is a polynomial")
    }

    #[test]
    fn structural_bounds_follow_the_shape() {
        // (x^2 + 1) * (x + 2): degree 3, order 0
        let expr = Expr::product(
            Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)),
            Expr::sum(x(), Expr::int(2)),
        );
        assert_eq!(degree(&expr, "x"), Some(3));
        assert_eq!(order(&expr, "x"), Some(0));
        assert!(is_polynomial(&expr, "x"));

        let expr = Expr::quotient(Expr::int(1), x());
        assert_eq!(degree(&expr, "x"), None);
        assert!(!is_polynomial(&expr, "x"));
    }

    #[test]
    fn extraction_expands_and_buckets() {
        with_ctxt(|ctxt| {
            // (x + 1)^2 = x^2 + 2x + 1
            let expr = Expr::power(Expr::sum(x(), Expr::int(1)), Expr::int(2));
            let poly = poly(&expr, ctxt);
            assert_eq!(poly.degree(), Some(2));
            assert_eq!(poly.coefficient(0), Expr::int(1));
            assert_eq!(poly.coefficient(1), Expr::int(2));
            assert_eq!(poly.coefficient(2), Expr::int(1));
        });
    }

    #[test]
    fn extraction_declines_non_polynomials() {
        with_ctxt(|ctxt| {
            let expr = Expr::call(casimir_expr::Func::Sin, x());
            assert_eq!(Polynomial::extract(&expr, "x", ctxt).unwrap(), None);

            let expr = Expr::quotient(Expr::int(1), x());
            assert_eq!(Polynomial::extract(&expr, "x", ctxt).unwrap(), None);
        });
    }

    #[test]
    fn extraction_reports_excessive_degrees() {
        with_ctxt(|ctxt| {
            let expr = Expr::power(x(), Expr::int(100));
            let err = Polynomial::extract(&expr, "x", ctxt).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DegreeTooHigh { degree: 100, limit: 64 });
        });
    }

    #[test]
    fn synthesis_is_descending_and_round_trips() {
        with_ctxt(|ctxt| {
            let expr = Expr::sum(
                Expr::product(Expr::int(3), Expr::power(x(), Expr::int(2))),
                Expr::difference(x(), Expr::int(4)),
            );
            let poly = poly(&expr, ctxt);
            assert_eq!(
                poly.synthesize(),
                Expr::difference(
                    Expr::sum(
                        Expr::product(Expr::int(3), Expr::power(x(), Expr::int(2))),
                        x(),
                    ),
                    Expr::int(4),
                ),
            );
        });
    }

    #[test]
    fn division_satisfies_the_euclidean_invariant() {
        with_ctxt(|ctxt| {
            // (x^3 + 2x - 5) / (x^2 + 1)
            let a = poly(
                &Expr::difference(
                    Expr::sum(
                        Expr::power(x(), Expr::int(3)),
                        Expr::product(Expr::int(2), x()),
                    ),
                    Expr::int(5),
                ),
                ctxt,
            );
            let b = poly(&Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)), ctxt);

            let (q, r) = a.divide(&b, ctxt).unwrap();
            assert!(r.degree() < b.degree());
            let rebuilt = b.mul(&q, ctxt).unwrap().add(&r, ctxt).unwrap();
            assert_eq!(rebuilt, a);
        });
    }

    #[test]
    fn division_by_zero_polynomial_is_reported() {
        with_ctxt(|ctxt| {
            let a = poly(&x(), ctxt);
            let err = a.divide(&Polynomial::zero("x"), ctxt).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DivisionByZero);
        });
    }

    #[test]
    fn gcd_is_monic() {
        with_ctxt(|ctxt| {
            // gcd(2x^2 - 2, 4x - 4) = x - 1
            let a = poly(
                &Expr::difference(
                    Expr::product(Expr::int(2), Expr::power(x(), Expr::int(2))),
                    Expr::int(2),
                ),
                ctxt,
            );
            let b = poly(
                &Expr::difference(Expr::product(Expr::int(4), x()), Expr::int(4)),
                ctxt,
            );
            let g = a.gcd(&b, ctxt).unwrap();
            assert_eq!(g.synthesize(), Expr::difference(x(), Expr::int(1)));
        });
    }

    #[test]
    fn bezout_identity_holds() {
        with_ctxt(|ctxt| {
            // x + 1 and x - 1 are coprime
            let a = poly(&Expr::sum(x(), Expr::int(1)), ctxt);
            let b = poly(&Expr::difference(x(), Expr::int(1)), ctxt);
            let (g, u, v) = a.bezout(&b, ctxt).unwrap();

            assert_eq!(g.synthesize(), Expr::int(1));
            let combined = u
                .mul(&a, ctxt)
                .unwrap()
                .add(&v.mul(&b, ctxt).unwrap(), ctxt)
                .unwrap();
            assert_eq!(combined, g);
        });
    }

    #[test]
    fn reduced_bezout_respects_the_degree_bound() {
        with_ctxt(|ctxt| {
            // A = (x - 1)(x - 2), B = (x - 1)(x - 3); g = x - 1, B/g = x - 3
            let a = poly(
                &Expr::product(
                    Expr::difference(x(), Expr::int(1)),
                    Expr::difference(x(), Expr::int(2)),
                ),
                ctxt,
            );
            let b = poly(
                &Expr::product(
                    Expr::difference(x(), Expr::int(1)),
                    Expr::difference(x(), Expr::int(3)),
                ),
                ctxt,
            );

            let (g, u, v) = a.bezout_reduced(&b, ctxt).unwrap();
            assert_eq!(g.synthesize(), Expr::difference(x(), Expr::int(1)));

            let (b_over_g, _) = b.divide(&g, ctxt).unwrap();
            assert!(u.degree() < b_over_g.degree());

            let combined = u
                .mul(&a, ctxt)
                .unwrap()
                .add(&v.mul(&b, ctxt).unwrap(), ctxt)
                .unwrap();
            assert_eq!(combined, g);
        });
    }

    #[test]
    fn derivative_is_coefficientwise() {
        with_ctxt(|ctxt| {
            // (3x^2 + 2x + 7)' = 6x + 2
            let p = poly(
                &Expr::sum(
                    Expr::product(Expr::int(3), Expr::power(x(), Expr::int(2))),
                    Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(7)),
                ),
                ctxt,
            );
            let d = p.derivative();
            assert_eq!(d.coefficient(0), Expr::int(2));
            assert_eq!(d.coefficient(1), Expr::int(6));
            assert_eq!(d.degree(), Some(1));
        });
    }

    #[test]
    fn rational_resultants_are_exact() {
        with_ctxt(|ctxt| {
            // res(x - 1, x - 2) = -1
            let a = poly(&Expr::difference(x(), Expr::int(1)), ctxt);
            let b = poly(&Expr::difference(x(), Expr::int(2)), ctxt);
            assert_eq!(a.resultant(&b, ctxt).unwrap(), Some(Expr::int(-1)));

            // res(x^2 + 1, x^2 - 1) = 4
            let a = poly(&Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)), ctxt);
            let b = poly(
                &Expr::difference(Expr::power(x(), Expr::int(2)), Expr::int(1)),
                ctxt,
            );
            assert_eq!(a.resultant(&b, ctxt).unwrap(), Some(Expr::int(4)));

            // shared root: res((x - 1)(x - 2), x - 1) = 0
            let a = poly(
                &Expr::product(
                    Expr::difference(x(), Expr::int(1)),
                    Expr::difference(x(), Expr::int(2)),
                ),
                ctxt,
            );
            let b = poly(&Expr::difference(x(), Expr::int(1)), ctxt);
            assert_eq!(a.resultant(&b, ctxt).unwrap(), Some(Expr::int(0)));
        });
    }

    #[test]
    fn symbolic_resultants_use_cofactor_expansion() {
        with_ctxt(|ctxt| {
            // a shared symbolic root makes the resultant vanish
            let a = poly(&Expr::difference(x(), Expr::symbol("a")), ctxt);
            let res = a.resultant(&a.clone(), ctxt).unwrap().unwrap();
            assert_eq!(res, Expr::int(0));

            // and coprime symbolic linears keep a nonzero difference of the roots
            let b = poly(&Expr::sum(x(), Expr::symbol("a")), ctxt);
            let res = a.resultant(&b, ctxt).unwrap().unwrap();
            assert!(!res.is_zero());
            assert!(res.contains_symbol("a"));
        });
    }
}
