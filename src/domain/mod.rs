//! Domain layer - Core business entities and projections
//!
//! Domain types carry no ORM dependencies; the infrastructure layer
//! converts its database models into them.

pub mod dto;
pub mod member;
pub mod team;

pub use dto::{MemberDto, MemberSearchCondition, MemberTeamDto, UsernameOnly};
pub use member::{Member, MemberWithTeam, NewMember};
pub use team::Team;
