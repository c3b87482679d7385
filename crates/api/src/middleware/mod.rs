//! Request middleware.

pub mod admin;
pub mod auth;
pub mod scope;

pub use admin::admin_middleware;
pub use auth::{AuthUser, auth_middleware};
pub use scope::{Scoped, scope_middleware};
