//! HTTP request handlers.

pub mod member_handler;

pub use member_handler::member_routes;
