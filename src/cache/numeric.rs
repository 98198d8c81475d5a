//! Lenient integer arguments.
//!
//! `expire` and `offset` arguments often come straight from host data, so the
//! facade accepts anything number-like and coerces it the way the host would:
//! floats truncate toward zero and strings contribute their leading integer
//! (`" 42px"` → 42). Input with no leading integer is not-a-number, which the
//! facade forwards as 0.

use serde_json::Value;

/// An integer argument before defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {
    /// No value given; the operation's default applies.
    Missing,
    Int(i64),
    /// Input that does not start with an integer.
    NaN,
}

impl Numeric {
    /// Resolves to an integer: `default` when missing, 0 when not-a-number.
    pub fn resolve(self, default: i64) -> i64 {
        match self {
            Self::Missing => default,
            Self::Int(value) => value,
            Self::NaN => 0,
        }
    }

    /// Parses the leading integer of `text`, ignoring leading whitespace.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_start();
        if text.is_empty() {
            return Self::Missing;
        }

        let (negative, digits) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return Self::NaN;
        }

        let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
        Self::Int(if negative { -magnitude } else { magnitude })
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            // Saturating cast
            Self::Int(value.trunc() as i64)
        } else {
            Self::NaN
        }
    }
}

impl From<Option<i64>> for Numeric {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Missing, Self::Int)
    }
}

impl From<&str> for Numeric {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<&Value> for Numeric {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::NaN, Self::from),
            },
            Value::String(s) => Self::parse(s),
            _ => Self::NaN,
        }
    }
}
