mod health_check;
mod refresh;
mod signin;

pub use health_check::health_check;
pub use refresh::refresh_access;
pub use signin::signin;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};

use crate::error::ErrorResponse;

/// Answer undecodable JSON bodies with 422 (415 for a wrong content type)
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let status = match &err {
        JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::warn!(
        request_id = %request_id,
        error = %err,
        "Rejected request payload"
    );

    let body = ErrorResponse::new(
        request_id,
        err.to_string(),
        "VALIDATION_ERROR".to_string(),
        status.as_u16(),
    );

    InternalError::from_response(err, HttpResponse::build(status).json(body)).into()
}
