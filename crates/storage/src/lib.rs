//! # Dev-Share Storage
//!
//! sqlx-backed persistence for Dev-Share.
//!
//! - [`Coordinator`]: the depth-counted unit of work every repository call
//!   runs through
//! - [`classify`]: per-backend translation of driver failures into
//!   [`devshare_error::Error`]
//! - [`backend`]: connection setup, migrations and the repository
//!   implementations, one module per database
//!
//! ## Features
//!
//! - `sqlite` (default): single-connection SQLite with WAL and foreign keys
//! - `postgres` (default): PostgreSQL over rustls

pub mod backend;
pub mod classify;
mod record;
mod uow;

pub use backend::{DatabaseConfig, Driver};
#[cfg(feature = "postgres")]
pub use backend::postgres::{PostgresBackend, PostgresUnitOfWork};
#[cfg(feature = "sqlite")]
pub use backend::sqlite::{SqliteBackend, SqliteUnitOfWork};
pub use uow::{Coordinator, Querier, TransactionDriver};
