//! Null-tolerant deserialisers for server payloads.
//!
//! The API omits unset columns or sends them as `null`; bound form inputs need
//! a concrete value, so text collapses to `""` and lists to `[]`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
  Text(String),
  Int(i64),
  Float(f64),
  Bool(bool),
}

/// Text field: `null` or missing becomes `""`; numbers and booleans are
/// rendered as text.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Scalar>::deserialize(deserializer)? {
    None => String::new(),
    Some(Scalar::Text(s)) => s,
    Some(Scalar::Int(n)) => n.to_string(),
    Some(Scalar::Float(n)) => n.to_string(),
    Some(Scalar::Bool(b)) => b.to_string(),
  })
}

/// Sequence field: `null` or missing becomes an empty vector. A scalar is
/// still an error.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Nested object that the server sometimes replaces with a placeholder
/// string (e.g. `"No creator information available"`). Anything that does
/// not parse as `T` becomes `None`.
pub(crate) fn object_or_none<'de, D, T>(
  deserializer: D,
) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Option::<serde_json::Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
