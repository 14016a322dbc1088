//! Irreducible factorization, as a chain of declining strategies.
//!
//! [`Polynomial::factor`] tries each strategy in order and recursively refines whatever the
//! first accepting strategy produced. A strategy never errors on a shape it does not handle;
//! it declines with `None` so the next one can look. The chain covers structured coefficient
//! patterns (periodic, antiperiodic, two-term cyclic polynomials), the bounded rational-root
//! search with squarefree reduction and quartic coefficient matching, exponent-gcd
//! compression, and the closed quadratic/cubic formulas with exact radical roots.
//!
//! Cyclotomic-style splits emit cosine nodes at rational multiples of pi; the trigonometric
//! reducer folds those to radicals where exact forms exist, and the coefficient
//! normalization in [`Polynomial::from_raw`] triggers that fold immediately.

use super::Polynomial;
use crate::ctxt::Ctxt;
use crate::fraction::with_coefficient;
use casimir_expr::{Error, Expr, Func, TermCollection};
use rug::ops::Pow;
use rug::{Integer, Rational};
use tracing::debug;

type Strategy = fn(&Polynomial, Ctxt) -> Result<Option<Vec<Polynomial>>, Error>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("monomial content", monomial_content),
    ("periodic coefficients", periodic),
    ("antiperiodic coefficients", antiperiodic),
    ("cyclic", cyclic),
    ("rational roots", rational_roots),
    ("squarefree reduction", squarefree),
    ("quartic pair matching", quartic_pairs),
    ("exponent gcd", exponent_gcd),
    ("quadratic formula", quadratic_formula),
    ("cubic formula", cubic_cardano),
];

impl Polynomial {
    /// Splits the polynomial into a product of lower-degree factors, or declines.
    ///
    /// `Ok(None)` means no strategy found a split: the polynomial is irreducible as far as
    /// this chain can tell, or its degree exceeds
    /// [`max_factor_degree`](crate::Bounds::max_factor_degree). The returned factors
    /// multiply back to the input, with rational content carried by degree-zero parts.
    pub fn factor(&self, ctxt: Ctxt) -> Result<Option<Vec<Self>>, Error> {
        let Some(degree) = self.degree() else {
            return Ok(None);
        };
        if degree <= 1 {
            return Ok(None);
        }
        let limit = ctxt.bounds.max_factor_degree;
        if degree > limit {
            debug!(degree, limit, "factorization declined above the degree ceiling");
            return Ok(None);
        }

        let Some(split) = split_once(self, ctxt)? else {
            return Ok(None);
        };

        let mut parts = Vec::new();
        for part in split {
            if part == *self || part.degree().map_or(true, |d| d <= 1) {
                parts.push(part);
                continue;
            }
            match part.factor(ctxt)? {
                Some(refined) => parts.extend(refined),
                None => parts.push(part),
            }
        }
        if parts.len() == 1 && parts[0] == *self {
            return Ok(None);
        }
        Ok(Some(parts))
    }
}

fn split_once(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    for (name, strategy) in STRATEGIES {
        if let Some(parts) = strategy(p, ctxt)? {
            debug!(strategy = name, "factorization strategy accepted");
            return Ok(Some(parts));
        }
    }
    Ok(None)
}

/// Pulls `x^k` out when the constant term is missing.
fn monomial_content(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    let Some((low, _)) = p.coefficients.iter().next() else {
        return Ok(None);
    };
    if low == 0 {
        return Ok(None);
    }

    let mut shifted = TermCollection::new();
    for (power, coeff) in p.coefficients.iter() {
        shifted.put(power - low, coeff.clone());
    }

    let mut parts = Vec::new();
    for _ in 0..low {
        parts.push(Polynomial::identity(p.variable.clone()));
    }
    parts.push(Polynomial::from_raw(p.variable.clone(), shifted, ctxt)?);
    Ok(Some(parts))
}

fn periodic(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    periodic_search(p, ctxt, false)
}

fn antiperiodic(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    periodic_search(p, ctxt, true)
}

/// Finds the smallest (anti-)period of the coefficient sequence and splits along it.
fn periodic_search(
    p: &Polynomial,
    ctxt: Ctxt,
    alternating: bool,
) -> Result<Option<Vec<Polynomial>>, Error> {
    let n = p.coefficients.bound();
    for period in 1..n {
        if n % period != 0 || !blocks_match(p, period, alternating) {
            continue;
        }
        let parts = if period == 1 {
            if alternating {
                alternating_ones_split(p, ctxt)?
            } else {
                all_ones_split(p, ctxt)?
            }
        } else {
            block_split(p, period, alternating, ctxt)?
        };
        return Ok(Some(parts));
    }
    Ok(None)
}

fn blocks_match(p: &Polynomial, period: usize, alternating: bool) -> bool {
    let repeats = p.coefficients.bound() / period;
    for i in 0..period {
        let base = p.coefficient(i);
        for j in 1..repeats {
            let negated = alternating && j % 2 == 1;
            if !coeffs_agree(&base, &p.coefficient(i + j * period), negated) {
                return false;
            }
        }
    }
    true
}

fn coeffs_agree(a: &Expr, b: &Expr, negated: bool) -> bool {
    if a.is_zero() && b.is_zero() {
        return true;
    }
    if !negated {
        return a == b;
    }
    match (a.as_rational(), b.as_rational()) {
        (Some(x), Some(y)) => x == -y,
        _ => {
            a.as_negated().is_some_and(|inner| inner == *b)
                || b.as_negated().is_some_and(|inner| inner == *a)
        },
    }
}

/// `(c_0 + ... + c_{p-1} x^{p-1}) * (1 ± x^p ± x^{2p} ...)` for a block of period `p`.
fn block_split(
    p: &Polynomial,
    period: usize,
    alternating: bool,
    ctxt: Ctxt,
) -> Result<Vec<Polynomial>, Error> {
    let repeats = p.coefficients.bound() / period;
    let mut head = TermCollection::new();
    for i in 0..period {
        if let Some(coeff) = p.coefficients.get(i) {
            head.put(i, coeff.clone());
        }
    }
    let mut spaced = TermCollection::new();
    for j in 0..repeats {
        let one = if alternating && j % 2 == 1 {
            Expr::int(-1)
        } else {
            Expr::int(1)
        };
        spaced.put(j * period, one);
    }
    Ok(vec![
        Polynomial::from_raw(p.variable.clone(), head, ctxt)?,
        Polynomial::from_raw(p.variable.clone(), spaced, ctxt)?,
    ])
}

/// `c * (1 + x + ... + x^{n-1})`: the roots are the nth roots of unity except 1, so the
/// real factorization is `x + 1` for even `n` plus one quadratic per conjugate pair.
fn all_ones_split(p: &Polynomial, ctxt: Ctxt) -> Result<Vec<Polynomial>, Error> {
    let n = p.coefficients.bound();
    let content = p.coefficient(0);

    let mut parts = Vec::new();
    if !content.is_one() {
        parts.push(Polynomial::constant(p.variable.clone(), content));
    }
    if n % 2 == 0 {
        parts.push(linear_with_root(p.variable.clone(), Expr::int(1), true, ctxt)?);
    }
    for k in 1..=((n - 1) / 2) {
        parts.push(conjugate_quadratic(
            p.variable.clone(),
            &Expr::int(1),
            Rational::from((2 * k as u64, n as u64)),
            ctxt,
        )?);
    }
    Ok(parts)
}

/// The alternating analogue `c * (1 - x + x^2 - ...)`: roots are the negated roots of
/// unity, so `x - 1` appears for even `n` and the conjugate angles reflect through pi.
fn alternating_ones_split(p: &Polynomial, ctxt: Ctxt) -> Result<Vec<Polynomial>, Error> {
    let n = p.coefficients.bound();
    let content = if n % 2 == 0 {
        -p.coefficient(0)
    } else {
        p.coefficient(0)
    };

    let mut parts = Vec::new();
    if !content.is_one() {
        parts.push(Polynomial::constant(p.variable.clone(), content));
    }
    if n % 2 == 0 {
        parts.push(linear_with_root(p.variable.clone(), Expr::int(1), false, ctxt)?);
    }
    for k in 1..=((n - 1) / 2) {
        parts.push(conjugate_quadratic(
            p.variable.clone(),
            &Expr::int(1),
            Rational::from(((n - 2 * k) as u64, n as u64)),
            ctxt,
        )?);
    }
    Ok(parts)
}

/// Two-term `c_n x^n + c_0` with rational coefficients: the roots-of-unity factorization of
/// `x^n = b` with `b = -c_0 / c_n`.
fn cyclic(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    let occupied = p.coefficients.iter().collect::<Vec<_>>();
    if occupied.len() != 2 || occupied[0].0 != 0 {
        return Ok(None);
    }
    let n = occupied[1].0;
    let (Some(constant), Some(lead)) =
        (occupied[0].1.as_rational(), occupied[1].1.as_rational())
    else {
        return Ok(None);
    };

    let b = -Rational::from(&constant / &lead);
    let magnitude_value = b.clone().abs();
    let magnitude = if magnitude_value == 1 {
        Expr::int(1)
    } else {
        Expr::root(Expr::int(n as i64), Expr::rational(magnitude_value))
    };

    let mut parts = Vec::new();
    if lead != 1 {
        parts.push(Polynomial::constant(p.variable.clone(), Expr::rational(lead)));
    }

    // roots have angle (2j + offset) * pi / n; the upper half-plane angles pair with their
    // conjugates into quadratics, 0 and pi are the real roots
    let offset = if b < 0 { 1 } else { 0 };
    for j in 0..n {
        let num = 2 * j + offset;
        if num == 0 {
            parts.push(linear_with_root(p.variable.clone(), magnitude.clone(), false, ctxt)?);
        } else if num == n {
            parts.push(linear_with_root(p.variable.clone(), magnitude.clone(), true, ctxt)?);
        } else if num < n {
            parts.push(conjugate_quadratic(
                p.variable.clone(),
                &magnitude,
                Rational::from((num as u64, n as u64)),
                ctxt,
            )?);
        }
    }
    Ok(Some(parts))
}

/// `x - root` or `x + root`.
fn linear_with_root(
    variable: String,
    root: Expr,
    plus: bool,
    ctxt: Ctxt,
) -> Result<Polynomial, Error> {
    let mut raw = TermCollection::new();
    raw.put(0, if plus { root } else { -root });
    raw.put(1, Expr::int(1));
    Polynomial::from_raw(variable, raw, ctxt)
}

/// `x^2 - 2 r cos(angle * pi) x + r^2` for a conjugate root pair `r e^(±i angle pi)`.
fn conjugate_quadratic(
    variable: String,
    magnitude: &Expr,
    angle: Rational,
    ctxt: Ctxt,
) -> Result<Polynomial, Error> {
    let cosine = Expr::call(Func::Cos, with_coefficient(angle, Expr::pi()));
    let middle = Expr::product(
        Expr::int(-2),
        if magnitude.is_one() {
            cosine
        } else {
            Expr::product(magnitude.clone(), cosine)
        },
    );
    let constant = if magnitude.is_one() {
        Expr::int(1)
    } else {
        Expr::power(magnitude.clone(), Expr::int(2))
    };

    let mut raw = TermCollection::new();
    raw.put(0, constant);
    raw.put(1, middle);
    raw.put(2, Expr::int(1));
    Polynomial::from_raw(variable, raw, ctxt)
}

/// Bounded rational-root search over the divisors of the trailing and leading integer
/// coefficients, with multiplicities taken by repeated division.
fn rational_roots(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    let Some(rats) = p.rational_coefficients() else {
        return Ok(None);
    };
    if rats.first().map_or(true, |(power, _)| *power != 0) {
        return Ok(None);
    }

    // clear denominators so candidates come from integer divisors
    let mut scale = Integer::from(1);
    for (_, r) in &rats {
        scale = scale.lcm(r.denom());
    }
    let as_integer = |r: &Rational| Integer::from(r.numer() * &scale) / r.denom();
    let trailing = as_integer(&rats[0].1);
    let leading = as_integer(&rats[rats.len() - 1].1);

    let cap = ctxt.bounds.max_rational_root_candidates;
    let (Some(p_divs), Some(q_divs)) = (divisors(&trailing, cap), divisors(&leading, cap))
    else {
        return Ok(None);
    };

    let mut candidates: Vec<Rational> = Vec::new();
    'outer: for num in &p_divs {
        for den in &q_divs {
            let candidate = Rational::from((num.clone(), den.clone()));
            if !candidates.contains(&candidate) {
                candidates.push(candidate.clone());
            }
            let negated = -candidate;
            if !candidates.contains(&negated) {
                candidates.push(negated);
            }
            if candidates.len() >= cap {
                debug!(cap, "rational root search truncated at the candidate ceiling");
                break 'outer;
            }
        }
    }

    let at = p.synthesize();
    let mut remaining = p.clone();
    let mut linears = Vec::new();
    for candidate in &candidates {
        ctxt.check_interrupted(&at)?;
        loop {
            if remaining.degree().map_or(true, |d| d == 0) {
                break;
            }
            let Some(current) = remaining.rational_coefficients() else {
                break;
            };
            if eval_rational(&current, candidate) != 0 {
                break;
            }

            let linear =
                linear_with_root(p.variable.clone(), Expr::rational(candidate.clone()), false, ctxt)?;
            let (quotient, _) = remaining.divide(&linear, ctxt)?;
            remaining = quotient;
            linears.push(linear);
        }
    }
    if linears.is_empty() {
        return Ok(None);
    }

    let mut parts = linears;
    match remaining.degree() {
        Some(0) if remaining.coefficient(0).is_one() => {},
        _ => parts.push(remaining),
    }
    Ok(Some(parts))
}

fn eval_rational(coeffs: &[(usize, Rational)], at: &Rational) -> Rational {
    let mut value = Rational::new();
    for (power, coeff) in coeffs {
        value += coeff * Rational::from(at.pow(*power as u32));
    }
    value
}

/// The divisors of `|n|`, bounded by the candidate cap and a trial-division ceiling.
fn divisors(n: &Integer, cap: usize) -> Option<Vec<Integer>> {
    let magnitude = Integer::from(n.abs_ref());
    let small = magnitude.to_u64()?;
    if small == 0 {
        return None;
    }

    let mut out = Vec::new();
    let mut d = 1u64;
    while (d as u128) * (d as u128) <= small as u128 && d <= 1 << 16 {
        if small % d == 0 {
            out.push(Integer::from(d));
            let paired = small / d;
            if paired != d {
                out.push(Integer::from(paired));
            }
        }
        if out.len() >= cap {
            break;
        }
        d += 1;
    }
    Some(out)
}

/// Splits off the repeated part as `gcd(f, f')`.
fn squarefree(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    let g = p.gcd(&p.derivative(), ctxt)?;
    match g.degree() {
        Some(d) if d >= 1 => {
            let (rest, _) = p.divide(&g, ctxt)?;
            Ok(Some(vec![g, rest]))
        },
        _ => Ok(None),
    }
}

/// Matches a monic integer quartic against `(x^2 + ax + b)(x^2 + cx + d)` by enumerating
/// divisor pairs of the constant term.
fn quartic_pairs(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    if p.degree() != Some(4) {
        return Ok(None);
    }
    let Some(rats) = p.rational_coefficients() else {
        return Ok(None);
    };
    let mut dense = vec![Rational::new(); 5];
    for (power, value) in rats {
        dense[power] = value;
    }
    let lead = dense[4].clone();

    let mut ints = Vec::with_capacity(4);
    for value in &dense[..4] {
        let monic = Rational::from(value / &lead);
        if !monic.is_integer() {
            return Ok(None);
        }
        ints.push(monic.into_numer_denom().0);
    }
    let (c0, c1, c2, c3) = (ints[0].clone(), ints[1].clone(), ints[2].clone(), ints[3].clone());
    if c0 == 0 {
        return Ok(None);
    }

    let Some(divs) = divisors(&c0, ctxt.bounds.max_rational_root_candidates) else {
        return Ok(None);
    };
    let at = p.synthesize();
    for e in &divs {
        ctxt.check_interrupted(&at)?;
        for sign in [1i32, -1] {
            let b = Integer::from(e * sign);
            let d = Integer::from(&c0 / &b);
            // a + c = c3, ac = c2 - b - d: solve the pair as a quadratic in a
            let s = Integer::from(&c2 - &b) - &d;
            let disc = Integer::from(&c3 * &c3) - Integer::from(&s * 4);
            if disc < 0 || !disc.is_perfect_square() {
                continue;
            }
            let t = disc.sqrt();
            let two_a = Integer::from(&c3 + &t);
            if two_a.is_odd() {
                continue;
            }
            let a = two_a / 2;
            let c = Integer::from(&c3 - &a);
            if Integer::from(&a * &d) + Integer::from(&b * &c) != c1 {
                continue;
            }

            let mut parts = Vec::new();
            if lead != 1 {
                parts.push(Polynomial::constant(p.variable.clone(), Expr::rational(lead)));
            }
            for (half_lin, half_const) in [(a, b), (c, d)] {
                let mut raw = TermCollection::new();
                raw.put(0, Expr::Integer(half_const));
                raw.put(1, Expr::Integer(half_lin));
                raw.put(2, Expr::int(1));
                parts.push(Polynomial::from_raw(p.variable.clone(), raw, ctxt)?);
            }
            return Ok(Some(parts));
        }
    }
    Ok(None)
}

/// When every exponent shares a factor `g > 1`, factors the compressed polynomial in
/// `y = x^g` and maps the factors back.
fn exponent_gcd(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    let mut g = 0usize;
    for (power, _) in p.coefficients.iter() {
        g = gcd_usize(g, power);
    }
    if g <= 1 {
        return Ok(None);
    }

    let mut compressed = TermCollection::new();
    for (power, coeff) in p.coefficients.iter() {
        compressed.put(power / g, coeff.clone());
    }
    let inner = Polynomial::from_raw(p.variable.clone(), compressed, ctxt)?;
    let Some(inner_parts) = inner.factor(ctxt)? else {
        return Ok(None);
    };

    let mut parts = Vec::new();
    for part in inner_parts {
        let mut expanded = TermCollection::new();
        for (power, coeff) in part.coefficients.iter() {
            expanded.put(power * g, coeff.clone());
        }
        parts.push(Polynomial::from_raw(p.variable.clone(), expanded, ctxt)?);
    }
    Ok(Some(parts))
}

fn gcd_usize(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd_usize(b, a % b)
    }
}

/// The quadratic formula with exact roots, rational or radical. Negative discriminants are
/// irreducible over the reals and decline.
fn quadratic_formula(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    if p.degree() != Some(2) {
        return Ok(None);
    }
    let Some(rats) = p.rational_coefficients() else {
        return Ok(None);
    };
    let mut dense = vec![Rational::new(); 3];
    for (power, value) in rats {
        dense[power] = value;
    }
    let (c, b, a) = (dense[0].clone(), dense[1].clone(), dense[2].clone());
    let disc = Rational::from(&b * &b) - Rational::from(4) * Rational::from(&a * &c);
    if disc < 0 {
        return Ok(None);
    }

    let two_a = Rational::from(&a * 2);
    let mut parts = Vec::new();
    if a != 1 {
        parts.push(Polynomial::constant(p.variable.clone(), Expr::rational(a)));
    }

    if disc == 0 {
        let constant = Rational::from(&b / &two_a);
        for _ in 0..2 {
            let mut raw = TermCollection::new();
            raw.put(0, Expr::rational(constant.clone()));
            raw.put(1, Expr::int(1));
            parts.push(Polynomial::from_raw(p.variable.clone(), raw, ctxt)?);
        }
        return Ok(Some(parts));
    }

    // monic factors (x + (b ∓ sqrt(disc)) / 2a)
    let sqrt_disc = sqrt_rational_expr(&disc);
    let low = Expr::quotient(
        Expr::difference(Expr::rational(b.clone()), sqrt_disc.clone()),
        Expr::rational(two_a.clone()),
    );
    let high = Expr::quotient(
        Expr::sum(Expr::rational(b), sqrt_disc),
        Expr::rational(two_a),
    );
    for constant in [low, high] {
        let mut raw = TermCollection::new();
        raw.put(0, constant);
        raw.put(1, Expr::int(1));
        parts.push(Polynomial::from_raw(p.variable.clone(), raw, ctxt)?);
    }
    Ok(Some(parts))
}

/// Cardano's formula for a cubic with exactly one real root, which then has a real radical
/// form. Three distinct real roots need trigonometric expressions and decline.
fn cubic_cardano(p: &Polynomial, ctxt: Ctxt) -> Result<Option<Vec<Polynomial>>, Error> {
    if p.degree() != Some(3) {
        return Ok(None);
    }
    let Some(rats) = p.rational_coefficients() else {
        return Ok(None);
    };
    let mut dense = vec![Rational::new(); 4];
    for (power, value) in rats {
        dense[power] = value;
    }
    let lead = dense[3].clone();
    let bb = Rational::from(&dense[2] / &lead);
    let cc = Rational::from(&dense[1] / &lead);
    let dd = Rational::from(&dense[0] / &lead);

    // depress with x = t - B/3: t^3 + pt + q
    let b_sq = Rational::from(&bb * &bb);
    let p_ = cc.clone() - Rational::from(&b_sq / 3);
    let q_ = Rational::from(&b_sq * &bb) * Rational::from((2u64, 27u64))
        - Rational::from(&bb * &cc) / 3
        + dd;

    // one real root exactly when q^2/4 + p^3/27 > 0
    let radicand = Rational::from(&q_ * &q_) / 4
        + Rational::from(&p_ * &p_) * Rational::from(&p_ / 27);
    if radicand <= 0 {
        return Ok(None);
    }

    let half_q = Rational::from(&q_ / 2);
    let sqrt_part = sqrt_rational_expr(&radicand);
    let u = Expr::root(
        Expr::int(3),
        Expr::sum(Expr::rational(-half_q.clone()), sqrt_part.clone()),
    );
    let v = Expr::root(
        Expr::int(3),
        Expr::difference(Expr::rational(-half_q), sqrt_part),
    );
    let shift = Rational::from(&bb / 3);
    let root = Expr::difference(Expr::sum(u, v), Expr::rational(shift));

    // synthetic division of the monic cubic by (x - root)
    let lin_coeff = Expr::sum(Expr::rational(bb), root.clone());
    let const_coeff = Expr::sum(
        Expr::rational(cc),
        Expr::product(lin_coeff.clone(), root.clone()),
    );

    let mut parts = Vec::new();
    if lead != 1 {
        parts.push(Polynomial::constant(p.variable.clone(), Expr::rational(lead)));
    }
    parts.push(linear_with_root(p.variable.clone(), root, false, ctxt)?);
    let mut raw = TermCollection::new();
    raw.put(0, const_coeff);
    raw.put(1, lin_coeff);
    raw.put(2, Expr::int(1));
    parts.push(Polynomial::from_raw(p.variable.clone(), raw, ctxt)?);
    Ok(Some(parts))
}

/// The exact square root of a positive rational: rational when both sides are perfect
/// squares, a root node otherwise.
fn sqrt_rational_expr(value: &Rational) -> Expr {
    if value.numer().is_perfect_square() && value.denom().is_perfect_square() {
        let numer = value.numer().clone().sqrt();
        let denom = value.denom().clone().sqrt();
        Expr::rational(Rational::from((numer, denom)))
    } else {
        Expr::rational(value.clone()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, Interrupt};
    use pretty_assertions::assert_eq;

    fn with_ctxt<T>(f: impl FnOnce(Ctxt) -> T) -> T {
        let bounds = Bounds::default();
        let interrupt = Interrupt::new();
        f(Ctxt::new(&bounds, &interrupt))
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn poly(expr: &Expr, ctxt: Ctxt) -> Polynomial {
        Polynomial::extract(expr, "x", ctxt)
            .unwrap()
            .expect("expression is a polynomial")
    }

    fn count(parts: &[Polynomial], target: &Polynomial) -> usize {
        parts.iter().filter(|part| *part == target).count()
    }

    #[test]
    fn recovers_nested_rational_factors() {
        with_ctxt(|ctxt| {
            // (x - 1)^2 (x - 2) (x^2 + 1)
            let lin1 = Expr::difference(x(), Expr::int(1));
            let lin2 = Expr::difference(x(), Expr::int(2));
            let quad = Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1));
            let expr = Expr::product(
                Expr::product(Expr::power(lin1.clone(), Expr::int(2)), lin2.clone()),
                quad.clone(),
            );

            let input = poly(&expr, ctxt);
            let parts = input.factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 4);
            assert_eq!(count(&parts, &poly(&lin1, ctxt)), 2);
            assert_eq!(count(&parts, &poly(&lin2, ctxt)), 1);
            assert_eq!(count(&parts, &poly(&quad, ctxt)), 1);

            // every recovered factor divides the input exactly
            for part in &parts {
                let (_, remainder) = input.divide(part, ctxt).unwrap();
                assert!(remainder.is_zero());
            }
        });
    }

    #[test]
    fn monomial_content_is_pulled_out() {
        with_ctxt(|ctxt| {
            // x^3 + x^2 = x * x * (x + 1)
            let expr = Expr::sum(Expr::power(x(), Expr::int(3)), Expr::power(x(), Expr::int(2)));
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 3);
            assert_eq!(count(&parts, &poly(&x(), ctxt)), 2);
            assert_eq!(count(&parts, &poly(&Expr::sum(x(), Expr::int(1)), ctxt)), 1);
        });
    }

    #[test]
    fn all_ones_polynomial_splits_over_quadratics() {
        with_ctxt(|ctxt| {
            // 1 + x + x^2 + x^3 = (x + 1)(x^2 + 1)
            let expr = Expr::sum(
                Expr::sum(Expr::int(1), x()),
                Expr::sum(Expr::power(x(), Expr::int(2)), Expr::power(x(), Expr::int(3))),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);
            assert_eq!(count(&parts, &poly(&Expr::sum(x(), Expr::int(1)), ctxt)), 1);
            assert_eq!(
                count(
                    &parts,
                    &poly(&Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)), ctxt),
                ),
                1,
            );
        });
    }

    #[test]
    fn periodic_blocks_split() {
        with_ctxt(|ctxt| {
            // 1 + 2x + x^2 + 2x^3 = (2x + 1)(x^2 + 1)
            let expr = Expr::sum(
                Expr::sum(Expr::int(1), Expr::product(Expr::int(2), x())),
                Expr::sum(
                    Expr::power(x(), Expr::int(2)),
                    Expr::product(Expr::int(2), Expr::power(x(), Expr::int(3))),
                ),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);

            let head = poly(&Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(1)), ctxt);
            let spaced = poly(&Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)), ctxt);
            assert_eq!(count(&parts, &head), 1);
            assert_eq!(count(&parts, &spaced), 1);
        });
    }

    #[test]
    fn alternating_blocks_split() {
        with_ctxt(|ctxt| {
            // 1 - x + x^2 - x^3 = -1 * (x - 1)(x^2 + 1)
            let expr = Expr::sum(
                Expr::difference(Expr::int(1), x()),
                Expr::difference(Expr::power(x(), Expr::int(2)), Expr::power(x(), Expr::int(3))),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 3);
            assert_eq!(count(&parts, &Polynomial::constant("x", Expr::int(-1))), 1);
            assert_eq!(count(&parts, &poly(&Expr::difference(x(), Expr::int(1)), ctxt)), 1);
            assert_eq!(
                count(
                    &parts,
                    &poly(&Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1)), ctxt),
                ),
                1,
            );
        });
    }

    #[test]
    fn difference_of_cubes_goes_through_roots_of_unity() {
        with_ctxt(|ctxt| {
            // x^3 - 8 = (x - 2)(x^2 + 2x + 4)
            let expr = Expr::difference(Expr::power(x(), Expr::int(3)), Expr::int(8));
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);
            assert_eq!(count(&parts, &poly(&Expr::difference(x(), Expr::int(2)), ctxt)), 1);

            let quad = poly(
                &Expr::sum(
                    Expr::power(x(), Expr::int(2)),
                    Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(4)),
                ),
                ctxt,
            );
            assert_eq!(count(&parts, &quad), 1);
        });
    }

    #[test]
    fn sixth_roots_of_unity_fold_to_rational_quadratics() {
        with_ctxt(|ctxt| {
            // x^6 - 1 = (x - 1)(x + 1)(x^2 - x + 1)(x^2 + x + 1)
            let expr = Expr::difference(Expr::power(x(), Expr::int(6)), Expr::int(1));
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 4);
            assert_eq!(count(&parts, &poly(&Expr::difference(x(), Expr::int(1)), ctxt)), 1);
            assert_eq!(count(&parts, &poly(&Expr::sum(x(), Expr::int(1)), ctxt)), 1);

            let minus = poly(
                &Expr::sum(
                    Expr::difference(Expr::power(x(), Expr::int(2)), x()),
                    Expr::int(1),
                ),
                ctxt,
            );
            let plus = poly(
                &Expr::sum(Expr::sum(Expr::power(x(), Expr::int(2)), x()), Expr::int(1)),
                ctxt,
            );
            assert_eq!(count(&parts, &minus), 1);
            assert_eq!(count(&parts, &plus), 1);
        });
    }

    #[test]
    fn squarefree_reduction_splits_repeated_factors() {
        with_ctxt(|ctxt| {
            // (x^2 + x + 1)^2
            let base = Expr::sum(Expr::sum(Expr::power(x(), Expr::int(2)), x()), Expr::int(1));
            let expr = Expr::power(base.clone(), Expr::int(2));
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);
            assert_eq!(count(&parts, &poly(&base, ctxt)), 2);
        });
    }

    #[test]
    fn quartics_split_by_coefficient_matching() {
        with_ctxt(|ctxt| {
            // x^4 + 2x^2 + 9 = (x^2 + 2x + 3)(x^2 - 2x + 3)
            let expr = Expr::sum(
                Expr::power(x(), Expr::int(4)),
                Expr::sum(
                    Expr::product(Expr::int(2), Expr::power(x(), Expr::int(2))),
                    Expr::int(9),
                ),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);

            let plus = poly(
                &Expr::sum(
                    Expr::power(x(), Expr::int(2)),
                    Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(3)),
                ),
                ctxt,
            );
            let minus = poly(
                &Expr::sum(
                    Expr::difference(Expr::power(x(), Expr::int(2)), Expr::product(Expr::int(2), x())),
                    Expr::int(3),
                ),
                ctxt,
            );
            assert_eq!(count(&parts, &plus), 1);
            assert_eq!(count(&parts, &minus), 1);
        });
    }

    #[test]
    fn shared_exponent_factors_compress_and_map_back() {
        with_ctxt(|ctxt| {
            // x^6 + 5x^3 + 6 = (x^3 + 2)(x^3 + 3), each splitting further over radicals
            let expr = Expr::sum(
                Expr::power(x(), Expr::int(6)),
                Expr::sum(
                    Expr::product(Expr::int(5), Expr::power(x(), Expr::int(3))),
                    Expr::int(6),
                ),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 4);
            assert_eq!(parts.iter().filter(|p| p.degree() == Some(1)).count(), 2);
            assert_eq!(parts.iter().filter(|p| p.degree() == Some(2)).count(), 2);
        });
    }

    #[test]
    fn quadratic_formula_keeps_radical_roots_exact() {
        with_ctxt(|ctxt| {
            // x^2 - x - 1: the golden ratio roots are irrational
            let expr = Expr::difference(
                Expr::difference(Expr::power(x(), Expr::int(2)), x()),
                Expr::int(1),
            );
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);
            for part in &parts {
                assert_eq!(part.degree(), Some(1));
                assert!(part.coefficient(0).as_rational().is_none());
            }
        });
    }

    #[test]
    fn cardano_splits_a_one_real_root_cubic() {
        with_ctxt(|ctxt| {
            // x^3 + x + 1 has one real root
            let expr = Expr::sum(Expr::power(x(), Expr::int(3)), Expr::sum(x(), Expr::int(1)));
            let parts = poly(&expr, ctxt).factor(ctxt).unwrap().unwrap();
            assert_eq!(parts.len(), 2);
            assert_eq!(parts.iter().filter(|p| p.degree() == Some(1)).count(), 1);
            assert_eq!(parts.iter().filter(|p| p.degree() == Some(2)).count(), 1);
        });
    }

    #[test]
    fn irreducible_shapes_decline() {
        with_ctxt(|ctxt| {
            // negative discriminant quadratics
            let quad = Expr::sum(Expr::sum(Expr::power(x(), Expr::int(2)), x()), Expr::int(1));
            assert_eq!(poly(&quad, ctxt).factor(ctxt).unwrap(), None);

            let quad = Expr::sum(Expr::power(x(), Expr::int(2)), Expr::int(1));
            assert_eq!(poly(&quad, ctxt).factor(ctxt).unwrap(), None);

            // three real roots: no real radical form
            let cubic = Expr::sum(
                Expr::difference(Expr::power(x(), Expr::int(3)), Expr::product(Expr::int(3), x())),
                Expr::int(1),
            );
            assert_eq!(poly(&cubic, ctxt).factor(ctxt).unwrap(), None);
        });
    }

    #[test]
    fn degrees_above_the_ceiling_decline() {
        with_ctxt(|ctxt| {
            let expr = Expr::sum(Expr::power(x(), Expr::int(17)), Expr::int(1));
            assert_eq!(poly(&expr, ctxt).factor(ctxt).unwrap(), None);
        });
    }
}
