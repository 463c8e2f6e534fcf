//! Member Directory - Member and team persistence over SeaORM
//!
//! Entities, derived-query repositories, a conditional search builder with
//! two paging strategies, and a thin read-only REST surface.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, projections and the search condition
//! - **services**: Application use cases
//! - **infra**: Database, migrations, repositories, unit of work
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Paging types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Insert sample data
//! cargo run -- seed --count 100
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Member, MemberDto, MemberSearchCondition, Team};
pub use errors::{AppError, AppResult};
pub use types::{Page, PageRequest};
