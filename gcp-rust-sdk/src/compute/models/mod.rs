mod enums;
mod image;
mod instance_group_manager;
mod instance_template;
mod operation;

pub use enums::*;
pub use image::*;
pub use instance_group_manager::*;
pub use instance_template::*;
pub use operation::*;

/// Compute v1 encodes `int64` fields as JSON strings. Accepts bare numbers
/// too, which emulators tend to emit.
pub(crate) mod int64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(serde_json::Value::String(s)) => {
                s.parse().map(Some).map_err(serde::de::Error::custom)
            }
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("number out of i64 range")),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected int64 string, got {other}"
            ))),
        }
    }
}

/// Same as [`int64_string`] for `uint64` fields (resource and instance ids).
pub(crate) mod uint64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(serde_json::Value::String(s)) => {
                s.parse().map(Some).map_err(serde::de::Error::custom)
            }
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("number out of u64 range")),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected uint64 string, got {other}"
            ))),
        }
    }
}
