//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration.

use utoipa::OpenApi;

use crate::api::handlers::member_handler;
use crate::domain::MemberDto;
use crate::types::MemberDtoPage;

/// OpenAPI documentation for the member directory
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Member Directory API",
        version = "0.1.0",
        description = "Read-only member and team queries over SeaORM"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        member_handler::find_member,
        member_handler::find_member_by_entity,
        member_handler::list_members,
        member_handler::search_members_v1,
        member_handler::search_members_v2,
        member_handler::search_members_v3,
    ),
    components(
        schemas(
            MemberDto,
            MemberDtoPage,
        )
    ),
    tags(
        (name = "Members", description = "Member lookup, listing and search")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_member_paths() {
        let doc = ApiDoc::openapi();

        for path in [
            "/members",
            "/members/{id}",
            "/members2/{id}",
            "/v1/members",
            "/v2/members",
            "/v3/members",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
