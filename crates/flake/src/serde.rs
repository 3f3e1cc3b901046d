use crate::FlakeId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for FlakeId {
    /// Serializes the ID as its native integer representation.
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

impl<'de> Deserialize<'de> for FlakeId {
    /// Deserializes an ID from its native integer representation.
    ///
    /// Values with the reserved high bit set are rejected.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        let id = Self::from_raw(raw);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(format_args!(
                "flake id {raw} has the reserved bit set"
            )));
        }
        Ok(id)
    }
}
