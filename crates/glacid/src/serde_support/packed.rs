use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize/deserialize a packed ID as its native integer representation.
///
/// For use with `#[serde(with = "glacid::as_native")]` on struct fields.
/// Deserialization rejects raw values with reserved bits set, so IDs that
/// never came from a well-formed pack cannot enter the system through a
/// decode path.
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::PackedId;

    /// Serialize a packed ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: PackedId,
        ID::Ty: Serialize,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a packed ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The deserialized value has reserved bits set
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: PackedId,
        ID::Ty: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let n = <ID::Ty>::deserialize(d)?;
        let id = ID::from_raw(n);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(
                "packed id has reserved bits set",
            ));
        }
        Ok(id)
    }
}
