//! Container name and blob key validation.
//!
//! Container names:
//! - Must be non-empty and at most 63 bytes
//! - Must not contain the `/` delimiter, whitespace, or control characters
//! - Must not be `.` or `..`
//!
//! Blob keys:
//! - Must be non-empty and at most 1024 bytes
//! - Must not contain control characters
//!
//! Keys may freely contain `/`; the store attaches no meaning to it.

use crate::error::{StoreError, StoreResult};

const MAX_CONTAINER_NAME_LEN: usize = 63;
pub(crate) const MAX_BLOB_KEY_LEN: usize = 1024;

/// Characters that are forbidden anywhere in a container name.
const FORBIDDEN_CONTAINER_CHARS: &[char] = &['/', '\\', ' ', '\t', '\n', '\r'];

fn invalid(kind: &'static str, name: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a container name, returning `Ok(())` if the store accepts it.
///
/// # Examples
///
/// ```
/// use azfs_store::validate_container_name;
///
/// assert!(validate_container_name("photos").is_ok());
/// assert!(validate_container_name("").is_err());
/// assert!(validate_container_name("a/b").is_err());
/// ```
pub fn validate_container_name(name: &str) -> StoreResult<()> {
    const KIND: &str = "container name";

    if name.is_empty() {
        return Err(invalid(KIND, name, "container name must not be empty"));
    }
    if name.len() > MAX_CONTAINER_NAME_LEN {
        return Err(invalid(
            KIND,
            name,
            format!("longer than {MAX_CONTAINER_NAME_LEN} bytes"),
        ));
    }
    for ch in FORBIDDEN_CONTAINER_CHARS {
        if name.contains(*ch) {
            return Err(invalid(
                KIND,
                name,
                format!("contains forbidden character: {ch:?}"),
            ));
        }
    }
    if name.chars().any(char::is_control) {
        return Err(invalid(KIND, name, "contains a control character"));
    }
    if name == "." || name == ".." {
        return Err(invalid(KIND, name, "reserved name"));
    }
    Ok(())
}

/// Validate a blob key.
pub fn validate_blob_key(key: &str) -> StoreResult<()> {
    const KIND: &str = "blob key";

    if key.is_empty() {
        return Err(invalid(KIND, key, "blob key must not be empty"));
    }
    if key.len() > MAX_BLOB_KEY_LEN {
        return Err(invalid(
            KIND,
            key,
            format!("longer than {MAX_BLOB_KEY_LEN} bytes"),
        ));
    }
    if key.chars().any(char::is_control) {
        return Err(invalid(KIND, key, "contains a control character"));
    }
    Ok(())
}
