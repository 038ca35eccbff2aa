//! Route handlers
//!
//! Handlers extract, call one service operation on a fresh unit of work and
//! forward whatever error comes back untouched.

pub mod admin;
pub mod health;
pub mod users;
pub mod workspaces;
