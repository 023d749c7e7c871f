//! # sp-storage-sql
//!
//! SQLx-based `PostgreSQL` storage for the secportal identity backend.
//!
//! Provides concrete implementations of the `sp-storage` provider traits
//! plus the transactional directory reconciler.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

mod audit;
mod config;
mod convert;
mod entities;
mod error;
mod mapping;
mod pool;
mod reconcile;
mod role;
mod user;

pub use audit::PgAuditProvider;
pub use config::PgDirectoryConfigProvider;
pub use mapping::PgRoleMappingProvider;
pub use pool::{PoolConfig, create_pool};
pub use reconcile::PgDirectoryReconciler;
pub use role::PgRoleProvider;
pub use user::PgUserProvider;
