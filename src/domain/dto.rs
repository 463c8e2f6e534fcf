//! Projection DTOs and the member search condition.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::Member;

/// Member projection returned by the REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "member1")]
    pub username: String,
    #[schema(example = 10)]
    pub age: i32,
    #[schema(example = 1)]
    pub team_id: Option<i64>,
    #[schema(example = "teamA")]
    pub teamname: Option<String>,
}

impl MemberDto {
    pub fn new(
        id: i64,
        username: impl Into<String>,
        age: i32,
        team_id: Option<i64>,
        teamname: Option<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            age,
            team_id,
            teamname,
        }
    }
}

/// Built from the entity alone, so the team name is not loaded.
impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            username: member.username,
            age: member.age,
            team_id: member.team_id,
            teamname: None,
        }
    }
}

/// Inner-join projection of a member and its team name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberTeamDto {
    pub id: i64,
    pub username: String,
    pub teamname: String,
}

/// Username-only projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameOnly {
    pub username: String,
}

/// Optional filters for member search; unset or blank fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MemberSearchCondition {
    /// Exact username
    #[param(example = "member1")]
    pub username: Option<String>,
    /// Exact team name
    #[param(example = "teamA")]
    pub teamname: Option<String>,
    /// Minimum age (inclusive)
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0, message = "ageGoe must not be negative"))]
    #[param(value_type = Option<i32>, example = 10)]
    pub age_goe: Option<i32>,
    /// Maximum age (inclusive)
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 0, message = "ageLoe must not be negative"))]
    #[param(value_type = Option<i32>, example = 40)]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_teamname(mut self, teamname: impl Into<String>) -> Self {
        self.teamname = Some(teamname.into());
        self
    }

    pub fn with_age_between(mut self, goe: Option<i32>, loe: Option<i32>) -> Self {
        self.age_goe = goe;
        self.age_loe = loe;
        self
    }

    /// Username filter, if it has text
    pub fn username_filter(&self) -> Option<&str> {
        has_text(self.username.as_deref())
    }

    /// Team name filter, if it has text
    pub fn teamname_filter(&self) -> Option<&str> {
        has_text(self.teamname.as_deref())
    }
}

fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat `ageGoe=` like an absent parameter.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
