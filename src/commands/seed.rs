//! Seed command - Inserts sample teams and members.

use crate::config::{Config, SEED_TEAM_NAMES};
use crate::domain::NewMember;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the seed command
pub async fn execute(count: i32, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Persistence::new(db.get_connection(), config.auditor.clone());

    let created = seed_members(&uow, count).await?;
    tracing::info!(teams = SEED_TEAM_NAMES.len(), members = created, "Seed completed");

    Ok(())
}

/// Create the sample teams and `count` members.
///
/// Member `i` is named `member{i}`, is `i` years old and joins the teams
/// in turn.
pub async fn seed_members<U: UnitOfWork>(uow: &U, count: i32) -> AppResult<usize> {
    let mut teams = Vec::with_capacity(SEED_TEAM_NAMES.len());
    for name in SEED_TEAM_NAMES {
        teams.push(uow.teams().save(name.to_string()).await?);
    }

    let members = uow.members();
    let mut created = 0;
    for (i, team) in (0..count).zip(teams.iter().cycle()) {
        members
            .save(NewMember::new(format!("member{}", i), i).in_team(team))
            .await?;
        created += 1;
    }

    Ok(created)
}
