//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
pub(crate) mod entities;
mod member_repository;
mod member_search;
mod team_repository;

pub use base::{DeleteRepository, ReadRepository, WriteRepository};
pub use member_repository::{MemberRepository, MemberStore};
pub use team_repository::{TeamRepository, TeamStore};

pub(crate) use member_repository::{by_username, rename_member};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use member_repository::MockMemberRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use team_repository::MockTeamRepository;
