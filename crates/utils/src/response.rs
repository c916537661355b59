use serde::{Deserialize, Serialize};

/// JSON envelope for endpoints that do not define their own body shape.
///
/// Empty fields are omitted, so a bare acknowledgement serializes as
/// `{"success":true,"message":"..."}` and a failure as
/// `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, with a human-readable note.
    pub fn acknowledged(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledged_shape() {
        let json = serde_json::to_value(ApiResponse::acknowledged("Feedback recorded!")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Feedback recorded!" })
        );
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("Please describe your mood"))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Please describe your mood" })
        );
    }

    #[test]
    fn test_success_carries_data() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
