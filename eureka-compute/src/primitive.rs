//! Functions to construct [`Integer`]s, [`Rational`]s, and [`Float`]s from various types.

use rug::{Assign, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Rational`] from a string slice of decimal digits. Returns [`None`] if the string
/// is not a valid integer.
pub fn rational_from_str(s: &str) -> Option<Rational> {
    Integer::from_str_radix(s, 10).ok().map(Rational::from)
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Float`] from a string slice, such as `3.14` or `1.602176634e-19`. Returns
/// [`None`] if the string is not a valid number.
pub fn float_from_str(s: &str) -> Option<Float> {
    let parsed = match s.strip_prefix('.') {
        Some(fraction) => Float::parse(format!("0.{}", fraction)),
        None => Float::parse(s),
    };
    parsed.ok().map(|parsed| Float::with_val(PRECISION, parsed))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_decimal() {
        let value = float_from_str(".5").unwrap();
        assert_eq!(value, float(0.5));
    }

    #[test]
    fn parse_scientific() {
        let value = float_from_str("1.5e3").unwrap();
        assert_eq!(value, float(1500));
    }

    #[test]
    fn parse_invalid() {
        assert!(float_from_str("abc").is_none());
        assert!(rational_from_str("1.5").is_none());
    }

    #[test]
    fn parse_integer() {
        assert_eq!(rational_from_str("144"), Some(rational(144)));
    }
}
