//! Shared types used across layers.

mod pagination;

pub use pagination::{
    page_or_count, Direction, MemberDtoPage, Page, PageParams, PageRequest, Slice, SortOrder,
};
