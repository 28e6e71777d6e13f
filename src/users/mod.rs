//! Accounts: the shared user entity, self-service profile routes and the
//! admin management surface.

pub mod dto;
pub mod handlers;
pub mod repo;

pub use handlers::{admin_router, router};
