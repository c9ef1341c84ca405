//! Scalar values stored in table rows.
//!
//! This module provides [`Scalar`], the value held by every key and data field, and
//! [`Number`], its numeric half.
//!
//! ## Core Types
//!
//! - [`Scalar`]: either text or a number
//! - [`Number`]: an integer, a float, or positive infinity
//!
//! Numbers compare by numeric value, so `Integer(3)` equals `Float(3.0)` and
//! `Float(f64::INFINITY)` equals `Infinity`. Hashing agrees with that equality, which
//! lets scalars form primary-key tuples.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use opl_dat::{Number, Scalar};
//!
//! let city = Scalar::from("Detroit");
//! let capacity = Scalar::from(100);
//!
//! assert!(city.is_text());
//! assert_eq!(capacity.as_f64(), Some(100.0));
//! assert_eq!(Scalar::from(100), Scalar::from(100.0));
//! assert_eq!(Scalar::Number(Number::Float(f64::INFINITY)), Scalar::infinity());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A numeric value: an integer, a float, or positive infinity.
///
/// # Examples
///
/// ```rust
/// use opl_dat::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert_eq!(Number::Float(3.5).as_f64(), 3.5);
/// assert!(Number::Infinity.is_infinite());
/// assert!(Number::Float(f64::INFINITY).is_infinite());
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
}

// Equality/hash key: whole floats collapse onto integers, +inf onto Infinity.
#[derive(PartialEq, Eq, Hash)]
enum Canonical {
    Int(i64),
    Bits(u64),
    Inf,
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` for positive infinity, whether spelled `Infinity` or as a float.
    #[inline]
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        match self {
            Number::Infinity => true,
            Number::Float(f) => *f == f64::INFINITY,
            Number::Integer(_) => false,
        }
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Returns `Some(i64)` for integers and floats with no fractional part
    /// that fit in i64 range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Number::Infinity => None,
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
        }
    }

    fn canonical(&self) -> Canonical {
        if self.is_infinite() {
            return Canonical::Inf;
        }
        match self {
            Number::Integer(i) => Canonical::Int(*i),
            Number::Float(f) => match self.as_i64() {
                Some(i) => Canonical::Int(i),
                None => Canonical::Bits(f.to_bits()),
            },
            Number::Infinity => Canonical::Inf,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Infinity => write!(f, "Infinity"),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A single key or data value.
///
/// # Examples
///
/// ```rust
/// use opl_dat::{Number, Scalar};
///
/// let text = Scalar::from("Boston");
/// let num = Scalar::Number(Number::Integer(7));
///
/// assert_eq!(text.as_str(), Some("Boston"));
/// assert_eq!(num.as_str(), None);
/// assert_eq!(num.to_string(), "7");
/// assert_eq!(text.to_string(), "\"Boston\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Text(String),
    Number(Number),
}

impl Scalar {
    /// Positive infinity, written as the configured sentinel when encoded.
    #[must_use]
    pub const fn infinity() -> Self {
        Scalar::Number(Number::Infinity)
    }

    /// Returns `true` if the value is text.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Scalar::Text(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }

    /// If the value is text, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Scalar::Number(n) => Some(n),
            Scalar::Text(_) => None,
        }
    }

    /// If the value is a number, returns it as `f64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    /// If the value is a whole number, returns it as `i64`. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "\"{}\"", s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<Number> for Scalar {
    fn from(value: Number) -> Self {
        Scalar::Number(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value.into())
    }
}

/// Formats a primary-key tuple for diagnostics, e.g. `("Detroit", "Boston")`.
pub(crate) fn format_key(key: &[Scalar]) -> String {
    let parts: Vec<String> = key.iter().map(|v| v.to_string()).collect();
    format!("({})", parts.join(", "))
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Scalar::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Scalar::Number(Number::Infinity) => serializer.serialize_f64(f64::INFINITY),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a number")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Scalar::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Scalar::Number(Number::Integer(value as i64)))
                } else {
                    Ok(Scalar::Number(Number::Float(value as f64)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Scalar::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Scalar::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Scalar::Text(value))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_numeric_equality() {
        assert_eq!(Number::Integer(3), Number::Float(3.0));
        assert_ne!(Number::Integer(3), Number::Float(3.5));
        assert_eq!(Number::Float(f64::INFINITY), Number::Infinity);
        assert_ne!(Number::Float(f64::NEG_INFINITY), Number::Infinity);
        assert_eq!(Number::Float(-0.0), Number::Integer(0));
    }

    #[test]
    fn test_floats_beyond_i64_stay_floats() {
        let two_pow_63 = 9_223_372_036_854_775_808.0;
        assert_eq!(Number::Float(two_pow_63).as_i64(), None);
        assert_ne!(Number::Float(two_pow_63), Number::Integer(i64::MAX));
        assert_eq!(Number::Float(i64::MIN as f64).as_i64(), Some(i64::MIN));

        let mut keys = HashSet::new();
        keys.insert(Scalar::from(i64::MAX));
        assert!(!keys.contains(&Scalar::from(two_pow_63)));
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let mut keys = HashSet::new();
        keys.insert(vec![Scalar::from("a"), Scalar::from(1)]);
        assert!(keys.contains(&vec![Scalar::from("a"), Scalar::from(1.0)]));
        assert!(!keys.contains(&vec![Scalar::from("a"), Scalar::from("1")]));
    }

    #[test]
    fn test_text_and_number_differ() {
        assert_ne!(Scalar::from("1"), Scalar::from(1));
    }

    #[test]
    fn test_format_key() {
        let key = vec![Scalar::from("Detroit"), Scalar::from(2)];
        assert_eq!(format_key(&key), "(\"Detroit\", 2)");
    }

    #[test]
    fn test_serde_untagged() {
        let values: Vec<Scalar> = serde_json::from_str(r#"["x", 2, 2.5]"#).unwrap();
        assert_eq!(
            values,
            vec![Scalar::from("x"), Scalar::from(2), Scalar::from(2.5)]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"["x",2,2.5]"#);
    }
}
