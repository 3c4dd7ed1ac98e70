use actix_web::{web, HttpResponse};

use crate::backends::RefreshBackend;
use crate::error::{AppError, ErrorContext};
use crate::schemas::RefreshToken;

/// POST {path}{refresh_url}
///
/// Exchange a refresh token for a new access token. The response
/// carries `access_token` only; the refresh token is not rotated.
///
/// # Errors
/// - 401 `UNAUTHORIZED`: token is valid but not a refresh token
/// - 401 `AUTHENTICATION_FAILED`: bad signature, malformed or expired token
/// - 422: Malformed payload
pub async fn refresh_access<R: RefreshBackend>(
    payload: web::Json<RefreshToken>,
    backend: web::Data<R>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("refresh_access");

    let access_token = backend.refresh(payload.into_inner()).await?;

    tracing::debug!(
        request_id = %context.request_id,
        operation = %context.operation,
        "Access token issued from refresh token"
    );

    Ok(HttpResponse::Ok().json(access_token))
}
