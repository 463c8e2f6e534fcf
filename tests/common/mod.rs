//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use member_directory::config::Config;
use member_directory::domain::{Member, NewMember, Team};
use member_directory::infra::{Database, Persistence, UnitOfWork};

pub const AUDITOR: &str = "tester";

/// Fresh, migrated in-memory database
pub async fn test_database() -> Database {
    Database::connect(&Config::in_memory())
        .await
        .expect("in-memory database should start")
}

pub fn persistence(db: &Database) -> Arc<Persistence> {
    Arc::new(Persistence::new(db.get_connection(), AUDITOR))
}

pub async fn team(uow: &Persistence, name: &str) -> Team {
    uow.teams().save(name.to_string()).await.unwrap()
}

pub async fn member(uow: &Persistence, username: &str, age: i32, team: Option<&Team>) -> Member {
    let mut new_member = NewMember::new(username, age);
    if let Some(team) = team {
        new_member = new_member.in_team(team);
    }
    uow.members().save(new_member).await.unwrap()
}

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40);
/// member5 (50) without a team.
pub async fn seed_search_fixture(uow: &Persistence) -> (Team, Team) {
    let team_a = team(uow, "teamA").await;
    let team_b = team(uow, "teamB").await;

    member(uow, "member1", 10, Some(&team_a)).await;
    member(uow, "member2", 20, Some(&team_a)).await;
    member(uow, "member3", 30, Some(&team_b)).await;
    member(uow, "member4", 40, Some(&team_b)).await;
    member(uow, "member5", 50, None).await;

    (team_a, team_b)
}
