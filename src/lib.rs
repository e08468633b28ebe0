//! Authorization context and role-hierarchy enforcement for an API gateway.
//!
//! The gateway authenticates each request into a [`context::RequestContext`],
//! protected operations call into [`guard`], and the role store is reached
//! only through the read-only [`resolver::RoleResolver`] trait.

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod resolver;
pub mod util;
