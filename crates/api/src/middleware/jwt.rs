use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// Extracts and validates the bearer token from the Authorization header and
/// stores the claims in the request extensions for handlers to pick up.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(auth_header) = request.headers().get(AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                match state.jwt_service().verify_token(token) {
                    Ok(claims) => {
                        request.extensions_mut().insert::<Claims>(claims);
                    }
                    Err(_) => {
                        return Err(AppError::Unauthorized(
                            "invalid or expired token".to_string(),
                        ));
                    }
                }
            }
        }
    }

    Ok(next.run(request).await)
}
