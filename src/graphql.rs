//! GraphQL response envelope as returned by the tarkov.dev API.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A `{ data, errors }` response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    /// Partial or complete payload. `null` and absent are treated the same.
    #[serde(default)]
    pub data: Option<Value>,
    /// Field-level resolution errors. Absent means no errors.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlError>,
}

/// A single field-level error entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    /// Location of the failing field inside `data`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: Vec<PathSegment>,
}

/// One step of an error path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
    /// Anything else the server put in a path; never resolves.
    Other(Value),
}

/// Deserializes an absent or `null` list as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a list element by element, dropping entries that do not fit
/// `T`. Partial responses null out failed fields, so one bad entry must not
/// take the rest of the list with it. Absent or `null` lists are empty.
pub(crate) fn skip_unreadable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries: Vec<Value> = null_as_empty(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable entry");
                None
            }
        })
        .collect())
}

impl GraphqlResponse {
    /// Returns the named top-level field of `data`, treating `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get(name))
            .filter(|value| !value.is_null())
    }
}

/// Number of leading path segments followed when locating the record an
/// error belongs to: the collection field, then the record within it.
const DIAGNOSTIC_DEPTH: usize = 2;

/// Locates the record an error entry points at, for diagnostics.
///
/// Follows the first two path segments into `data`. Keys only index objects
/// and indices only index arrays; any mismatch, out-of-range index or short
/// path yields `None`.
pub fn resolve_error_path<'a>(data: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    if path.len() < DIAGNOSTIC_DEPTH {
        return None;
    }

    let mut current = data;
    for segment in &path[..DIAGNOSTIC_DEPTH] {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(obj)) => obj.get(key)?,
            (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }

    Some(current).filter(|value| !value.is_null())
}
