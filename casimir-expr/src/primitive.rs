//! Functions to construct [`Integer`]s, [`Float`]s, and [`Rational`]s from various types.

use rug::{Assign, Float, Integer, Rational};

/// The number of digits of precision to use when computing approximate values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a [`Float`] by truncating the fractional part.
///
/// Returns `None` if the float is not normal (infinite or NaN).
pub fn int_from_float(f: &Float) -> Option<Integer> {
    float(f.trunc_ref()).to_integer()
}

/// Creates a [`Float`] with the given value, using the crate precision.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Rational`] with the given value.
///
/// The value is normalized by [`rug`]: the result is always in lowest terms with a positive
/// denominator.
pub fn rat<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rat_normalizes() {
        assert_eq!(rat((5, 10)), rat((1, 2)));
        assert_eq!(rat((3, -6)), rat((-1, 2)));
        assert_eq!(*rat((3, -6)).denom(), int(2));
    }

    #[test]
    fn float_truncation() {
        assert_eq!(int_from_float(&float(3.7)), Some(int(3)));
        assert_eq!(int_from_float(&float(-3.7)), Some(int(-3)));
        assert_eq!(int_from_float(&Float::with_val(53, f64::NAN)), None);
    }
}
