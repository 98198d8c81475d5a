//! Stored cache entry with expiration metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A cached payload and its absolute expiry time.
///
/// `expire` is a Unix timestamp in seconds, or `0` for entries that never
/// expire. This is also the persisted shape: `{"data": .., "expire": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub data: Value,
    #[serde(default)]
    pub expire: i64,
}

impl Entry {
    /// Builds an entry that expires `expire` seconds after `now`.
    ///
    /// An `expire` of 0 means the entry never expires.
    pub fn new(data: Value, expire: i64, now: i64) -> Self {
        let expire = if expire == 0 {
            0
        } else {
            now.saturating_add(expire)
        };

        Self { data, expire }
    }

    /// True once the expiry time lies strictly in the past.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expire != 0 && self.expire < now
    }

    /// Adds `delta` to a numeric payload, clamping at zero.
    ///
    /// Non-numeric payloads count as 0. The payload is replaced by the result,
    /// which is also returned.
    pub fn adjust(&mut self, delta: i64) -> Number {
        let next = match &self.data {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Number::from(i.saturating_add(delta).max(0))
                } else if let Some(u) = n.as_u64() {
                    if delta >= 0 {
                        Number::from(u.saturating_add(delta.unsigned_abs()))
                    } else {
                        Number::from(u.saturating_sub(delta.unsigned_abs()))
                    }
                } else {
                    let f = n.as_f64().unwrap_or(0.0) + delta as f64;
                    Number::from_f64(f.max(0.0)).unwrap_or_else(|| Number::from(0))
                }
            },
            _ => Number::from(delta.max(0)),
        };

        self.data = Value::Number(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_expire_never_expires() {
        let entry = Entry::new(json!("v"), 0, 1_000);
        assert_eq!(entry.expire, 0);
        assert!(!entry.is_expired(i64::MAX));
    }

    #[test]
    fn test_expire_is_relative_to_now() {
        let entry = Entry::new(json!("v"), 10, 1_000);
        assert_eq!(entry.expire, 1_010);
        assert!(!entry.is_expired(1_010));
        assert!(entry.is_expired(1_011));
    }

    #[test]
    fn test_negative_expire_is_already_past() {
        let entry = Entry::new(json!("v"), -5, 1_000);
        assert!(entry.is_expired(1_000));
    }

    #[test]
    fn test_adjust_integer_clamps_at_zero() {
        let mut entry = Entry::new(json!(5), 0, 0);
        assert_eq!(entry.adjust(-10), Number::from(0));
        assert_eq!(entry.data, json!(0));
        assert_eq!(entry.adjust(3), Number::from(3));
    }

    #[test]
    fn test_adjust_non_numeric_counts_as_zero() {
        let mut entry = Entry::new(json!("x"), 0, 0);
        assert_eq!(entry.adjust(1), Number::from(1));

        let mut entry = Entry::new(json!({"a": 1}), 0, 0);
        assert_eq!(entry.adjust(-1), Number::from(0));
    }

    #[test]
    fn test_adjust_float_payload() {
        let mut entry = Entry::new(json!(2.5), 0, 0);
        assert_eq!(entry.adjust(1).as_f64(), Some(3.5));
        assert_eq!(entry.adjust(-10).as_f64(), Some(0.0));
    }

    #[test]
    fn test_adjust_saturates() {
        let mut entry = Entry::new(json!(i64::MAX), 0, 0);
        assert_eq!(entry.adjust(1), Number::from(i64::MAX));
    }

    #[test]
    fn test_persisted_shape() {
        let entry = Entry::new(json!({"a": 1}), 60, 100);
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(text, r#"{"data":{"a":1},"expire":160}"#);

        let back: Entry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, entry);
    }
}
