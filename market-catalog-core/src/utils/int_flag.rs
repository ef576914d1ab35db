//! `bool` carried as an integer `0/1` on the wire.
//!
//! The backend stores the `important` flag as an integer column; booleans are
//! accepted on input as well.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<IntOrBool>::deserialize(deserializer)? {
        Some(IntOrBool::Bool(b)) => b,
        Some(IntOrBool::Int(i)) => i != 0,
        None => false,
    })
}

/// `Option<bool>` as an optional integer, for partial-update payloads.
pub mod option {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&u8::from(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::deserialize(deserializer).map(Some)
    }
}
