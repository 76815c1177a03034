//! `EmbedCaller` extractor: checks the LMS shared key from the headers.
//!
//! List it before the body extractor: the key is checked before the
//! payload is parsed or validated.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared key.
pub const EMBED_KEY_HEADER: &str = "x-embed-key";

/// Proof that the request carried a valid embed key.
#[derive(Debug, Clone, Copy)]
pub struct EmbedCaller;

impl FromRequestParts<AppState> for EmbedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(EMBED_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        state.embed.verify(presented)?;
        Ok(EmbedCaller)
    }
}
