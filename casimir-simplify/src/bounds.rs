//! Limits on the work the simplifier is willing to do.
//!
//! Symbolic rewriting can blow up combinatorially: expanding `(a + b + c)^40`, factoring a
//! degree-200 polynomial, or recursing through half-angle formulas forever are all cheap to
//! request and expensive to perform. A [`Bounds`] value caps each of these axes. Rules that
//! would exceed a cap simply decline to fire, except for polynomial extraction, which
//! reports [`ErrorKind::DegreeTooHigh`](casimir_expr::ErrorKind::DegreeTooHigh) so the
//! caller learns why nothing happened.

/// How aggressively powers of sums are multiplied out.
///
/// The profile caps the number of terms an expansion may produce. The number of monomials in
/// `(t_1 + ... + t_k)^n` is `C(n + k - 1, k - 1)`, which is computed up front so that an
/// oversized expansion is rejected before any work is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionProfile {
    /// Only tiny expansions, suitable for interactive display.
    Short,

    /// The default. Binomials and small multinomials to moderate powers.
    Moderate,

    /// Large expansions, for callers that want polynomial normal forms at any cost.
    Powerful,
}

impl ExpansionProfile {
    /// The maximum number of terms an expansion may produce under this profile.
    pub fn term_limit(self) -> usize {
        match self {
            Self::Short => 32,
            Self::Moderate => 256,
            Self::Powerful => 4096,
        }
    }
}

impl Default for ExpansionProfile {
    fn default() -> Self {
        Self::Moderate
    }
}

/// Caps applied to every simplification pass.
///
/// The bounds are read-only during simplification. Callers build one value up front and
/// share it by reference through [`Ctxt`](crate::Ctxt).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// The largest degree a polynomial may have to be extracted from an expression.
    pub max_polynomial_degree: usize,

    /// The largest degree attempted by the polynomial factorization strategies.
    pub max_factor_degree: usize,

    /// The largest number of candidates enumerated by the rational root search.
    pub max_rational_root_candidates: usize,

    /// How many times the half-angle formulas may be applied recursively when evaluating a
    /// trigonometric function at a rational multiple of pi.
    pub max_half_angle_depth: u32,

    /// The expansion profile, capping how many terms a power of a sum may expand into.
    pub expansion: ExpansionProfile,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max_polynomial_degree: 64,
            max_factor_degree: 16,
            max_rational_root_candidates: 256,
            max_half_angle_depth: 4,
            expansion: ExpansionProfile::default(),
        }
    }
}
