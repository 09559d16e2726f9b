//! JWT Extractor
//!
//! Custom extractor validating the JWT carried in the `token` header.
//! The wire contract predates this server: clients send the raw token in a
//! custom header, not an `Authorization: Bearer` scheme.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, TOKEN_HEADER};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted earlier in the request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let jwt_service = state.get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims).map_err(|e| {
                    tracing::warn!(error = %e, "Malformed JWT claims");
                    AppError::InvalidToken
                })?;

                // Store in extensions for potential reuse
                parts.extensions.insert(user.clone());

                Ok(user)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    uri = %parts.uri,
                    "Token validation failed"
                );
                Err(AppError::InvalidToken)
            }
        }
    }
}
