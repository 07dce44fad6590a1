//! Serde helpers for configuration types.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serializes a [`Duration`] as whole milliseconds.
///
/// Every ttl in the configuration surface goes through this module, so a
/// `default_ttl_ms: 0` in a config file means "never expire".
///
/// ```rust
/// use std::time::Duration;
///
/// use keystash::duration_millis;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Entry {
///     #[serde(with = "duration_millis")]
///     ttl: Duration,
/// }
///
/// let entry: Entry = serde_json::from_str(r#"{"ttl":1500}"#).unwrap();
/// assert_eq!(entry.ttl, Duration::from_millis(1500));
/// ```
pub mod duration_millis {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Serialize a Duration as milliseconds, clamping at `u64::MAX`
    pub fn serialize<S>(duration: &Duration, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Deserialize milliseconds (u64) into a Duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for utils::serde.
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TtlHolder {
        #[serde(with = "duration_millis")]
        ttl: Duration,
        label: String,
    }

    /// Validates that a ttl serializes to whole milliseconds.
    ///
    /// Assertions:
    /// - Ensures `json.contains("\"ttl\":1500")` evaluates to true.
    #[test]
    fn test_duration_millis_serialize() {
        let holder = TtlHolder { ttl: Duration::from_millis(1500), label: "session".to_string() };

        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.contains("\"ttl\":1500"));
    }

    /// Validates that sub-millisecond precision is truncated on the way out.
    ///
    /// Assertions:
    /// - Confirms `back.ttl` equals `Duration::from_millis(2)`.
    #[test]
    fn test_duration_millis_truncates_submillis() {
        let holder = TtlHolder { ttl: Duration::from_micros(2_900), label: "tiny".to_string() };

        let json = serde_json::to_string(&holder).unwrap();
        let back: TtlHolder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ttl, Duration::from_millis(2));
    }

    /// Validates that `Duration::MAX` clamps instead of wrapping.
    ///
    /// Assertions:
    /// - Ensures the serialized value contains `u64::MAX`.
    #[test]
    fn test_duration_millis_clamps_max() {
        let holder = TtlHolder { ttl: Duration::MAX, label: "forever".to_string() };

        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.contains(&u64::MAX.to_string()));
    }

    /// Validates the duration millis deserialize invalid json scenario.
    ///
    /// Assertions:
    /// - Ensures `result.is_err()` evaluates to true.
    #[test]
    fn test_duration_millis_rejects_negative() {
        let result: Result<TtlHolder, _> = serde_json::from_str(r#"{"ttl":-5,"label":"bad"}"#);
        assert!(result.is_err());
    }
}
