//! JSON form of coded errors.
//!
//! Any error chain can be serialized; what comes out is always a
//! [`CodedError`] object:
//!
//! ```json
//! {"code":"FieldNotFound","message":"field not found: fld","wrapped":"loading: field not found: fld"}
//! ```
//!
//! `wrapped` is omitted when empty. A chain whose root is not a
//! [`CodedError`] is serialized with an empty `code`, which is distinct from
//! [`UNCODED`](crate::UNCODED).

use crate::Error;
use crate::code::Code;
use crate::coded::CodedError;
use crate::wrap::{cause, render};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::{debug, warn};

/// Serializes `err` to a JSON [`CodedError`] object.
///
/// The root cause supplies `code` and `message`; `wrapped` is the rendered
/// text of the whole chain. The input is not modified.
///
/// Encoding cannot fail for this shape, but the signature has no error
/// channel: should it fail anyway, the plain rendered text is returned.
pub fn marshal_json(err: &Error) -> String {
    let out = snapshot(err);

    match serde_json::to_string(&out) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, code = %out.code(), "failed to encode coded error, falling back to text");
            out.to_string()
        }
    }
}

/// The [`CodedError`] that [`marshal_json`] encodes for `err`.
pub fn snapshot(err: &Error) -> CodedError {
    let root = cause(err);
    let rendered = render(err);

    match root.downcast_ref::<CodedError>() {
        Some(coded) => coded.with_wrapped(rendered),
        None => {
            debug!(root = %root, "serializing chain without a coded root");
            CodedError::new(Code::default(), root.to_string()).with_wrapped(rendered)
        }
    }
}

/// Reads a serialized error from `reader`.
///
/// A well-formed payload becomes a [`CodedError`] in a fresh envelope and
/// classifies by its code. Anything else becomes a plain error whose text is
/// the raw payload; the decode failure itself is not reported. A read error
/// keeps whatever was read before it.
pub fn unmarshal_json<R: Read>(mut reader: R) -> Error {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf) {
        warn!(error = %e, read = buf.len(), "short read while decoding coded error");
    }
    decode(&buf)
}

/// Payload longer than the read limit given to [`unmarshal_json_limited`].
#[derive(Debug, thiserror::Error)]
#[error("payload exceeds {limit} bytes")]
pub struct PayloadTooLarge {
    pub limit: u64,
}

/// [`unmarshal_json`] reading at most `max_bytes`.
///
/// A payload of exactly `max_bytes` decodes normally. A longer one is
/// rejected rather than decoded as a truncated fragment.
pub fn unmarshal_json_limited<R: Read>(
    reader: R,
    max_bytes: u64,
) -> Result<Error, PayloadTooLarge> {
    let mut limited = reader.take(max_bytes.saturating_add(1));
    let mut buf = Vec::new();
    if let Err(e) = limited.read_to_end(&mut buf) {
        warn!(error = %e, read = buf.len(), "short read while decoding coded error");
    }
    if buf.len() as u64 > max_bytes {
        warn!(max_bytes, "payload exceeds the read limit");
        return Err(PayloadTooLarge { limit: max_bytes });
    }
    Ok(decode(&buf))
}

/// [`unmarshal_json`] over an in-memory payload.
pub fn unmarshal_json_str(payload: &str) -> Error {
    decode(payload.as_bytes())
}

fn decode(bytes: &[u8]) -> Error {
    match decode_object(bytes) {
        Ok(coded) => coded.into_error(),
        Err(e) => {
            debug!(error = %e, len = bytes.len(), "payload is not a coded error");
            anyhow::Error::msg(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

const FIELDS: [&str; 3] = ["code", "message", "wrapped"];

// serde accepts a JSON array for a struct; only objects count here. Keys
// match case-insensitively and an object with none of them is not ours.
fn decode_object(bytes: &[u8]) -> serde_json::Result<CodedError> {
    let object = match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(object) => object,
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {other}"
            )));
        }
    };

    let mut fields = Map::new();
    for (key, value) in object {
        if let Some(field) = FIELDS.iter().find(|field| field.eq_ignore_ascii_case(&key)) {
            fields.entry(*field).or_insert(value);
        }
    }
    if fields.is_empty() {
        return Err(serde::de::Error::custom("object has no coded error fields"));
    }
    serde_json::from_value(Value::Object(fields))
}
