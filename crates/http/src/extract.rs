//! Request extractors that validate input forms before handlers run and
//! report every rejection through [`AppError`].

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppError;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            field,
            error: error.into(),
        }
    }
}

/// Input forms implement this to declare their constraints.
pub trait Validate {
    /// Every violated constraint, or `Ok(())` when the form is acceptable.
    fn validate(&self) -> Result<(), Vec<FieldViolation>>;
}

/// JSON body extractor that rejects malformed bodies with `400 bad_request`
/// and invalid forms with `400 validation_error`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        if let Err(violations) = value.validate() {
            let details = violations
                .iter()
                .map(|violation| serde_json::json!(violation))
                .collect();
            return Err(AppError::validation(details, "The request body is not valid"));
        }

        Ok(Self(value))
    }
}

/// Path parameter extractor; unparsable segments become `400 bad_request`.
#[derive(Debug, Clone)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
