//! Identity Extractor
//!
//! Lets handlers take [`Identity`] as an argument. The global auth middleware
//! normally inserts it already; otherwise the token is validated here.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{Identity, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("auth_missing", uri = parts.uri.path());
                return Err(AppError::not_authenticated());
            }
        };

        match state.get_jwt_service().validate_token(token) {
            Ok(claims) => {
                let identity = Identity::try_from(claims)
                    .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
                parts.extensions.insert(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                security_log!("auth_failed", error = %e, uri = parts.uri.path());
                match e {
                    JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}
