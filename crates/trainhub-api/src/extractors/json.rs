//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use trainhub_core::error::AppError;

use crate::error::ApiError;

/// Like `Json<T>`, but rejects with a `VALIDATION_ERROR` body when the
/// payload is malformed or fails its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::validation(errors.to_string()))?;

        Ok(Self(value))
    }
}
