//! Serde helpers shared by request types.

use serde::{Deserialize, Deserializer};

/// Deserialize a PATCH field that distinguishes "absent" from "null".
///
/// Pair with `#[serde(default)]`: an absent key never reaches this function
/// and stays `None`, `null` becomes `Some(None)` (clear the value) and a
/// value becomes `Some(Some(v))` (set it).
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
