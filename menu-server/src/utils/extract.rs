//! Request extractors
//!
//! Body rejections go through [`AppError`] so clients always receive the
//! `ApiResponse` error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::AppError;

/// JSON body extractor / response, rejecting with `ValidationFailed` (400)
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let reason = match &rejection {
        JsonRejection::JsonDataError(_) => "Request body does not match the expected shape",
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => "Expected `Content-Type: application/json`",
        _ => "Failed to read request body",
    };
    tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
    AppError::validation(reason).with_detail("reason", rejection.body_text())
}
