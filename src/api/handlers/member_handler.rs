//! Member handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{LoadedMember, ValidatedQuery};
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_SIZE, MEMBER_LIST_PAGE_SIZE};
use crate::domain::{MemberDto, MemberSearchCondition};
use crate::errors::AppResult;
use crate::types::{Page, PageParams};

/// Create member routes
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members))
        .route("/members/:id", get(find_member))
        .route("/members2/:id", get(find_member_by_entity))
        .route("/v1/members", get(search_members_v1))
        .route("/v2/members", get(search_members_v2))
        .route("/v3/members", get(search_members_v3))
}

/// Get a member's username by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "Members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Username of the member", body = String, content_type = "text/plain"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn find_member(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<String> {
    state.member_service.find_username(id).await
}

/// Get a member's username, with the path ID resolved to the member
#[utoipa::path(
    get,
    path = "/members2/{id}",
    tag = "Members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Username of the member", body = String, content_type = "text/plain"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn find_member_by_entity(LoadedMember(member): LoadedMember) -> String {
    member.username
}

/// List members page by page
#[utoipa::path(
    get,
    path = "/members",
    tag = "Members",
    params(PageParams),
    responses(
        (status = 200, description = "One page of members", body = MemberDtoPage),
        (status = 400, description = "Invalid paging or sort parameters")
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> AppResult<Json<Page<MemberDto>>> {
    let request = params.into_request(MEMBER_LIST_PAGE_SIZE)?;
    let page = state.member_service.list(&request).await?;
    Ok(Json(page))
}

/// Search members by condition
#[utoipa::path(
    get,
    path = "/v1/members",
    tag = "Members",
    params(MemberSearchCondition),
    responses(
        (status = 200, description = "Every matching member", body = Vec<MemberDto>),
        (status = 400, description = "Invalid search condition")
    )
)]
pub async fn search_members_v1(
    State(state): State<AppState>,
    ValidatedQuery(cond): ValidatedQuery<MemberSearchCondition>,
) -> AppResult<Json<Vec<MemberDto>>> {
    let members = state.member_service.search(&cond).await?;
    Ok(Json(members))
}

/// Search members by condition, one page at a time (always counted)
#[utoipa::path(
    get,
    path = "/v2/members",
    tag = "Members",
    params(MemberSearchCondition, PageParams),
    responses(
        (status = 200, description = "One page of matching members", body = MemberDtoPage),
        (status = 400, description = "Invalid search condition or paging parameters")
    )
)]
pub async fn search_members_v2(
    State(state): State<AppState>,
    ValidatedQuery(cond): ValidatedQuery<MemberSearchCondition>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> AppResult<Json<Page<MemberDto>>> {
    let request = params.into_request(DEFAULT_PAGE_SIZE)?;
    let page = state.member_service.search_page_simple(&cond, &request).await?;
    Ok(Json(page))
}

/// Search members by condition, one page at a time (count only when needed)
#[utoipa::path(
    get,
    path = "/v3/members",
    tag = "Members",
    params(MemberSearchCondition, PageParams),
    responses(
        (status = 200, description = "One page of matching members", body = MemberDtoPage),
        (status = 400, description = "Invalid search condition or paging parameters")
    )
)]
pub async fn search_members_v3(
    State(state): State<AppState>,
    ValidatedQuery(cond): ValidatedQuery<MemberSearchCondition>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> AppResult<Json<Page<MemberDto>>> {
    let request = params.into_request(DEFAULT_PAGE_SIZE)?;
    let page = state.member_service.search_page_complex(&cond, &request).await?;
    Ok(Json(page))
}
