//! Path extractor that resolves a member ID to the member itself.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::api::AppState;
use crate::domain::Member;
use crate::errors::AppError;

/// The member whose ID is the single path parameter of the route.
///
/// Rejects with `NotFound` when no member has that ID.
pub struct LoadedMember(pub Member);

#[async_trait]
impl FromRequestParts<AppState> for LoadedMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let member = state.member_service.get_member(id).await?;
        Ok(LoadedMember(member))
    }
}
