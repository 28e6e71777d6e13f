//! Per-user favorites over listings, unique per (user, property) pair.

pub mod dto;
pub mod handlers;
pub mod repo;

pub use handlers::router;
