//! Passphrase decoding.
//!
//! A secret is either a plain string or `{ciphertext, protected}` where
//! `ciphertext` is base64 and `protected` is a base64url JOSE header. Only the
//! "no encryption" and device transparent-encryption headers are accepted.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use crate::error::ConvertError;

/// `{"alg":"dir","enc":"none"}`
pub const HEADER_NO_ENCRYPTION: &str = "eyJhbGciOiJkaXIiLCJlbmMiOiJub25lIn0";
/// `{"alg":"dir","enc":"f5sv"}`
pub const HEADER_DEVICE_ENCRYPTION: &str = "eyJhbGciOiJkaXIiLCJlbmMiOiJmNXN2In0";

/// Decode the secret stored under `key`.
pub fn decode_secret(key: &str, value: &Value) -> Result<String, ConvertError> {
    match value {
        Value::String(plain) => Ok(plain.clone()),
        Value::Object(fields) => {
            let ciphertext = fields
                .get("ciphertext")
                .and_then(Value::as_str)
                .ok_or_else(|| ConvertError::secret(key, "no ciphertext found"))?;
            let protected = fields
                .get("protected")
                .and_then(Value::as_str)
                .ok_or_else(|| ConvertError::secret(key, "ciphertext has no protected header"))?;
            if !accepted_header(protected) {
                return Err(ConvertError::secret(
                    key,
                    format!("unrecognized protected header '{protected}'"),
                ));
            }
            decode_base64_text(ciphertext)
                .map_err(|reason| ConvertError::secret(key, reason))
        }
        other => Err(ConvertError::secret(
            key,
            format!("expected string or object, found {}", rest_tree::value_kind(other)),
        )),
    }
}

fn accepted_header(protected: &str) -> bool {
    protected.starts_with(HEADER_NO_ENCRYPTION) || protected.starts_with(HEADER_DEVICE_ENCRYPTION)
}

/// Decode standard base64 into UTF-8 text.
pub(crate) fn decode_base64_text(encoded: &str) -> Result<String, String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| format!("invalid base64: {err}"))?;
    String::from_utf8(bytes).map_err(|err| format!("decoded content is not UTF-8: {err}"))
}
