use serde::{Deserialize, Serialize};

/// Uniform response envelope: every endpoint, success or failure, returns
/// `{ success, data?, message? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["message"], serde_json::Value::Null);
    }

    #[test]
    fn error_envelope_carries_the_message() {
        let json = serde_json::to_value(ApiResponse::<()>::error("Not found: job")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Not found: job");
    }
}
