//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod member;
pub mod team;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use member::{ActiveModel as MemberActiveModel, Entity as MemberEntity, Model as MemberModel};
#[allow(unused_imports)]
pub use team::{ActiveModel as TeamActiveModel, Entity as TeamEntity, Model as TeamModel};
