use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response envelope: a success flag plus either a payload or an
/// end-user error string
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            ok: true,
            data,
            message,
            error: None,
            meta,
            errors: None,
        }
    }

    /// Shorthand for a list payload with its length as `meta.total`
    pub fn list(items: Vec<T>) -> ApiResponse<Vec<T>> {
        let total = items.len() as i64;
        ApiResponse::success(Some(items), None, Some(Meta { total }))
    }

    pub fn error(error: String, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            ok: false,
            data: None,
            message: None,
            error: Some(error),
            meta: None,
            errors,
        }
    }
}
