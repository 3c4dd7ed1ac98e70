use actix_web::{web, HttpResponse};

use crate::backends::{AuthenticationBackend, LoginPayload};
use crate::error::{AppError, ErrorContext};

/// POST {path}{signin_url}
///
/// Authenticate with the configured credential payload and return
/// `{access_token, refresh_token}`.
///
/// # Errors
/// - 401: Invalid credentials (unknown principal, wrong password or inactive account)
/// - 422: Malformed payload or invalid field shape
/// - 503: User store unavailable
///
/// # Security Notes
/// - Same message for every rejected sign-in
/// - The backend verifies a password hash even for unknown principals
pub async fn signin<A: AuthenticationBackend>(
    payload: web::Json<A::Credentials>,
    backend: web::Data<A>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("signin");

    let credentials = payload.into_inner();
    credentials.validate()?;

    let tokens = backend.authenticate(credentials).await?;

    tracing::debug!(
        request_id = %context.request_id,
        operation = %context.operation,
        "Token pair issued"
    );

    Ok(HttpResponse::Ok().json(tokens))
}
