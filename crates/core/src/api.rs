//! JSON response envelope.
//!
//! Every JSON endpoint answers with `{ "success": bool, "data": T }` on
//! success or `{ "success": false, "message": "..." }` on failure.

use serde::{Deserialize, Serialize};

/// Uniform JSON response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response with a message, e.g. after a delete.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Failed response with a user-facing message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ok_serializes_without_message() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_error_serializes_without_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("Address not found")).unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "message": "Address not found" })
        );
    }

    #[test]
    fn test_deserializes_backend_envelope() {
        let parsed: ApiResponse<String> =
            serde_json::from_value(json!({ "success": true, "data": "ok" })).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.data.as_deref(), Some("ok"));
    }
}
