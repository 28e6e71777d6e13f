//! Listings: property entities with their image galleries, public browsing
//! with optional filters, and authenticated mutations.

pub mod dto;
pub mod handlers;
pub mod repo;

pub use handlers::router;
