use serde::Serialize;
use utoipa::ToSchema;

/// Team domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Team {
    pub id: i64,
    pub name: String,
}
