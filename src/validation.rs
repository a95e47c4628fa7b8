//! Input validation for the quorum core
//!
//! Validates caller-supplied request descriptions and freeform session
//! payloads before they reach the panel or the store, with size and depth
//! limits that keep persisted JSON bounded.

use crate::constants::system::MAX_DESCRIPTION_LENGTH;
use crate::error::{QuorumError, Result};
use serde_json::Value;

/// Maximum allowed size for session payloads (1MB)
const MAX_PAYLOAD_SIZE_BYTES: usize = 1024 * 1024;

/// Maximum nesting depth for JSON objects/arrays
const MAX_PAYLOAD_DEPTH: usize = 10;

/// Maximum number of keys in a JSON object
const MAX_PAYLOAD_KEYS: usize = 1000;

/// Maximum string length for JSON string values
const MAX_PAYLOAD_STRING_LENGTH: usize = 10_000;

/// Validates a free-text request description
pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(QuorumError::Validation(
            "description must not be empty".to_string(),
        ));
    }

    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(QuorumError::Validation(format!(
            "description too long: {} chars (max: {MAX_DESCRIPTION_LENGTH})",
            description.len()
        )));
    }

    Ok(())
}

/// Validates a freeform session payload for size and structure constraints
pub fn validate_session_payload(payload: &Value) -> Result<()> {
    let serialized = serde_json::to_string(payload)
        .map_err(|e| QuorumError::Validation(format!("Invalid JSON structure: {e}")))?;

    if serialized.len() > MAX_PAYLOAD_SIZE_BYTES {
        return Err(QuorumError::Validation(format!(
            "session payload too large: {} bytes (max: {MAX_PAYLOAD_SIZE_BYTES})",
            serialized.len()
        )));
    }

    validate_payload_depth(payload, 0)
}

/// Validates JSON depth recursively
fn validate_payload_depth(value: &Value, current_depth: usize) -> Result<()> {
    if current_depth > MAX_PAYLOAD_DEPTH {
        return Err(QuorumError::Validation(format!(
            "session payload nesting too deep: {current_depth} (max: {MAX_PAYLOAD_DEPTH})"
        )));
    }

    match value {
        Value::Object(map) => {
            if map.len() > MAX_PAYLOAD_KEYS {
                return Err(QuorumError::Validation(format!(
                    "too many payload keys: {} (max: {MAX_PAYLOAD_KEYS})",
                    map.len()
                )));
            }

            for (key, val) in map {
                if key.len() > MAX_PAYLOAD_STRING_LENGTH {
                    return Err(QuorumError::Validation(format!(
                        "payload key too long: {} chars (max: {MAX_PAYLOAD_STRING_LENGTH})",
                        key.len()
                    )));
                }

                validate_payload_depth(val, current_depth + 1)?;
            }
        }
        Value::Array(arr) => {
            if arr.len() > MAX_PAYLOAD_KEYS {
                return Err(QuorumError::Validation(format!(
                    "payload array too large: {} items (max: {MAX_PAYLOAD_KEYS})",
                    arr.len()
                )));
            }

            for item in arr {
                validate_payload_depth(item, current_depth + 1)?;
            }
        }
        Value::String(s) => {
            if s.len() > MAX_PAYLOAD_STRING_LENGTH {
                return Err(QuorumError::Validation(format!(
                    "payload string too long: {} chars (max: {MAX_PAYLOAD_STRING_LENGTH})",
                    s.len()
                )));
            }
        }
        _ => {} // Numbers, booleans, null are always safe
    }

    Ok(())
}
