//! # sp-storage
//!
//! Storage abstraction traits for the secportal identity backend.
//!
//! This crate defines the provider interfaces implemented by concrete
//! storage backends (currently PostgreSQL via `sp-storage-sql`).
//!
//! ## Provider Traits
//!
//! - [`UserProvider`] - CRUD operations for users
//! - [`RoleProvider`] - CRUD operations for roles and assignments
//! - [`DirectoryConfigProvider`] - CRUD operations for directory configurations
//! - [`RoleMappingProvider`] - CRUD operations for group-to-role mappings
//! - [`AuditProvider`] - append-only audit events
//! - [`DirectoryReconciler`] - the transactional login reconciliation

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod audit;
pub mod config;
pub mod error;
pub mod mapping;
pub mod reconcile;
pub mod role;
pub mod user;

pub use audit::AuditProvider;
pub use config::DirectoryConfigProvider;
pub use error::{StorageError, StorageResult};
pub use mapping::RoleMappingProvider;
pub use reconcile::{DirectoryReconciler, ReconcileOutcome};
pub use role::RoleProvider;
pub use user::UserProvider;
