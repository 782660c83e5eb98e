//! The `{success, data, error, pagination}` envelope every call resolves to.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiErrorKind};

/// Uniform result of every API call.
///
/// On success `error` is `None`; on failure `data` is `None` and `error`
/// holds a human-readable message. `error_kind` is set by the client for
/// every failure it produces and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    pub error_kind: Option<ApiErrorKind>,
}

/// Page position reported by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
            error_kind: None,
        }
    }

    pub fn failure(err: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.message),
            pagination: None,
            error_kind: Some(err.kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The failure as a typed error, if this envelope is one.
    pub fn api_error(&self) -> Option<ApiError> {
        if self.success {
            return None;
        }
        let kind = self.error_kind.unwrap_or(ApiErrorKind::Application);
        Some(ApiError::new(kind, self.error.clone().unwrap_or_default()))
    }

    /// Convert into a `Result`, dropping pagination.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self.api_error() {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            pagination: self.pagination,
            error_kind: self.error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let env: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
        assert!(env.error.is_none());
        assert!(env.pagination.is_none());
        assert!(env.error_kind.is_none());
    }

    #[test]
    fn failure_has_no_data() {
        let env: ApiResponse<u32> = ApiResponse::failure(ApiError::protocol("expected JSON"));
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("expected JSON"));
        assert_eq!(env.error_kind, Some(ApiErrorKind::ProtocolMismatch));
    }

    #[test]
    fn into_result_reports_kind() {
        let env: ApiResponse<u32> = ApiResponse::failure(ApiError::transport("down"));
        let err = env.into_result().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.message, "down");

        assert_eq!(ApiResponse::ok(7).into_result().unwrap(), Some(7));
    }

    #[test]
    fn pagination_page_math() {
        let p = Pagination { total: 21, page: 2, limit: 10 };
        assert_eq!(p.total_pages(), 3);
        assert!(p.has_next());

        let last = Pagination { total: 20, page: 2, limit: 10 };
        assert!(!last.has_next());

        let empty = Pagination { total: 5, page: 1, limit: 0 };
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let env = ApiResponse::ok(json!({ "id": 1 }));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value, json!({ "success": true, "data": { "id": 1 } }));
    }
}
