use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode,
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::utils::validation::{FieldErrors, single};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation { errors: FieldErrors, input: Value },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(StoreError::DuplicateNik) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { errors, input } => json!({
                "success": false,
                "message": self.to_string(),
                "errors": errors,
                "input": input,
            }),
            AppError::NotFound(msg) | AppError::Conflict(msg) => json!({
                "success": false,
                "message": msg,
            }),
            AppError::Store(StoreError::DuplicateNik) => json!({
                "success": false,
                "message": StoreError::DuplicateNik.to_string(),
            }),
            AppError::Store(e) => {
                error!(error = %e, "Storage failure");
                json!({
                    "success": false,
                    "message": "Something went wrong, Contact with system admin",
                })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Bodies that fail to parse answer like any other validation failure. The
/// raw payload is already consumed here, so `input` is null.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(e) => e.to_string(),
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        other => other.to_string(),
    };
    AppError::Validation {
        errors: single("body", message),
        input: Value::Null,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let validation = AppError::Validation {
            errors: single("nik", "NIK already exists"),
            input: Value::Null,
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("Employee not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("blocked".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn storage_faults_do_not_leak_details() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Something went wrong, Contact with system admin"
        );
    }

    #[actix_web::test]
    async fn validation_body_carries_field_errors() {
        let err = AppError::Validation {
            errors: single("actual_ot_hours", "Maximum OT hours is 3 hours"),
            input: json!({ "employee_id": 1 }),
        };
        let resp = err.error_response();
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["errors"]["actual_ot_hours"][0], "Maximum OT hours is 3 hours");
        assert_eq!(body["input"]["employee_id"], 1);
    }
}
