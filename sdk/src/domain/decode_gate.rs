//! Decode gate: turns raw response documents into typed collections.
//!
//! Strict decoding is all-or-nothing: the number of decoded records must
//! equal the number of raw records, otherwise the whole call fails with an
//! integrity error. Lenient decoding drops unreadable rows and logs how many
//! were lost; it is only used where a partial list is acceptable.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::entity::{decode_entity, EntityRef};
use super::error::{Error, SdkResult};
use super::ports::Endpoint;

/// Name of the array holding list results.
pub const ROWS_FIELD: &str = "rows";

/// How unreadable rows are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Any unreadable row fails the whole call.
    #[default]
    Strict,
    /// Unreadable rows are dropped with a warning.
    Lenient,
}

/// Decode the array under `field` of `document` with `decode`.
///
/// # Errors
/// [`Error::MalformedEnvelope`] when `document` is not an object or `field`
/// holds something other than an array. A missing `field` reads as empty.
/// [`Error::Integrity`] when a strict array holds a row `decode` rejects.
///
/// # Examples
/// ```
/// use moysklad_sdk::domain::ports::Endpoint;
/// use moysklad_sdk::domain::{decode_rows, RowPolicy};
/// use serde_json::json;
///
/// let document = json!({ "rows": [1, "two", 3] });
/// let as_number = |row: &serde_json::Value| row.as_u64();
///
/// let lenient = decode_rows(&document, Endpoint::Uom, "rows", RowPolicy::Lenient, as_number);
/// assert_eq!(lenient.unwrap(), vec![1, 3]);
///
/// let strict = decode_rows(&document, Endpoint::Uom, "rows", RowPolicy::Strict, as_number);
/// assert!(strict.is_err());
/// ```
pub fn decode_rows<T, F>(
    document: &Value,
    endpoint: Endpoint,
    field: &str,
    policy: RowPolicy,
    decode: F,
) -> SdkResult<Vec<T>>
where
    F: Fn(&Value) -> Option<T>,
{
    let object = document
        .as_object()
        .ok_or_else(|| Error::malformed(endpoint))?;
    let records = match object.get(field) {
        Some(Value::Array(records)) => records.as_slice(),
        None => &[],
        Some(_) => return Err(Error::malformed(endpoint)),
    };
    decode_records(records, endpoint, policy, decode)
}

/// Decode already extracted `records` under `policy`.
///
/// # Errors
/// [`Error::Integrity`] when `policy` is strict and a record is rejected.
pub fn decode_records<T, F>(
    records: &[Value],
    endpoint: Endpoint,
    policy: RowPolicy,
    decode: F,
) -> SdkResult<Vec<T>>
where
    F: Fn(&Value) -> Option<T>,
{
    let total = records.len();
    let decoded: Vec<T> = records.iter().filter_map(decode).collect();
    if decoded.len() == total {
        return Ok(decoded);
    }
    match policy {
        RowPolicy::Strict => Err(Error::integrity(endpoint, decoded.len(), total)),
        RowPolicy::Lenient => {
            warn!(
                endpoint = %endpoint,
                dropped = total - decoded.len(),
                total,
                "dropped undecodable rows"
            );
            Ok(decoded)
        }
    }
}

/// Strictly decode the `rows` array of a list response into entities.
///
/// # Errors
/// See [`decode_rows`].
pub fn decode_entity_rows<T: DeserializeOwned>(
    document: &Value,
    endpoint: Endpoint,
) -> SdkResult<Vec<EntityRef<T>>> {
    decode_rows(document, endpoint, ROWS_FIELD, RowPolicy::Strict, decode_entity::<T>)
}

/// Decode a single-record response into an entity.
///
/// # Errors
/// [`Error::MalformedEnvelope`] when the document is not a decodable record.
pub fn decode_single<T: DeserializeOwned>(
    document: &Value,
    endpoint: Endpoint,
) -> SdkResult<EntityRef<T>> {
    if !document.is_object() {
        return Err(Error::malformed(endpoint));
    }
    decode_entity::<T>(document).ok_or_else(|| Error::malformed(endpoint))
}
