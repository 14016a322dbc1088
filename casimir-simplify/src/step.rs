//! Types to assist in collecting the steps applied by the simplifier.

/// A single simplification step, named after the family of rewrite rules that produced it.
///
/// The variants intentionally describe rule families rather than individual rules. For
/// example, [`Step::FoldConstants`] is reported whether two integers, two fractions, or two
/// floating-point approximations were combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// `a + 0 = a`
    AddZero,

    /// `a - a = 0`, `a + (-a) = 0`
    CancelOpposites,

    /// `a * 0 = 0`
    MultiplyZero,

    /// `a * 1 = a`
    MultiplyOne,

    /// `0 / a = 0`
    ZeroNumerator,

    /// `a / 1 = a`
    DivideByOne,

    /// Numeric operands combined exactly (integers and fractions) or approximately (floats).
    FoldConstants,

    /// Like factors of a product combined into a single power.
    CombineLikeFactors,

    /// Quotient factors of a product merged into one fraction.
    MergeQuotients,

    /// A sum of quotients rewritten over a single common denominator.
    CommonDenominator,

    /// A quotient reduced by a common factor of the numerator and denominator.
    ReduceQuotient,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `0^a = 0` for positive `a`
    PowerZeroBase,

    /// `1^a = 1`
    PowerOneBase,

    /// `x^(-n) = 1 / x^n`
    NegativeExponent,

    /// `(a^b)^c = a^(b*c)`, with an absolute value where the inner exponent demands one.
    CollapsePower,

    /// A power of a sum expanded into a sum of monomials.
    Expand,

    /// A common factor extracted from two terms of a sum.
    FactorOut,

    /// A perfect power extracted from under a radical.
    ReduceRadical,

    /// `10^(lg a) = a`, `lg(10^a) = a`, and exact logarithms of powers of ten.
    PowerOfTen,

    /// An absolute value resolved or absorbed.
    AbsoluteValue,

    /// A trigonometric function evaluated exactly or moved into its fundamental domain.
    Trigonometry,

    /// An inverse trigonometric function evaluated exactly.
    InverseTrigonometry,
}

/// Any type that can collect steps generated by the simplifier.
pub trait StepCollector<S> {
    /// Collects a step generated by the simplifier.
    fn push(&mut self, step: S);
}

/// A step collector that does nothing.
impl<S> StepCollector<S> for () {
    fn push(&mut self, _: S) {}
}

/// A step collector that collects steps into a [`Vec`].
impl<S> StepCollector<S> for Vec<S> {
    fn push(&mut self, step: S) {
        self.push(step);
    }
}
