//! Member domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::Team;

/// Member domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub age: i32,
    /// Owning team, if any (many members per team)
    pub team_id: Option<i64>,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_by: String,
}

impl Member {
    /// Check whether the member belongs to the given team
    pub fn is_member_of(&self, team: &Team) -> bool {
        self.team_id == Some(team.id)
    }
}

/// Data needed to persist a new member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl NewMember {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: username.into(),
            age,
            team_id: None,
        }
    }

    pub fn in_team(mut self, team: &Team) -> Self {
        self.team_id = Some(team.id);
        self
    }
}

/// Member loaded together with its team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

impl MemberWithTeam {
    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref().map(|team| team.name.as_str())
    }
}
