//! Validated query extractor - Combines query-string parsing with validation.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::format_validation_errors;
use crate::errors::AppError;

/// Query-string extractor that validates the parsed value.
///
/// # Example
///
/// ```rust,ignore
/// use member_directory::api::extractors::ValidatedQuery;
/// use member_directory::domain::MemberSearchCondition;
///
/// async fn search(ValidatedQuery(cond): ValidatedQuery<MemberSearchCondition>) {
///     // cond.age_goe is known to be non-negative here
/// }
/// ```
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedQuery(value))
    }
}
