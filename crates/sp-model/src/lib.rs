//! # sp-model
//!
//! Domain model for the secportal identity backend.
//!
//! This crate defines the entities shared by every other crate: users,
//! roles and role assignments, directory (LDAP) configurations, the
//! group-to-role mapping table, and audit events. It also carries the
//! pure group-matching logic used during role resolution, so that the
//! storage layer can resolve roles inside a transaction without pulling
//! in directory-protocol dependencies.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod audit;
pub mod directory;
pub mod mapping;
pub mod role;
pub mod user;

pub use audit::{AuditAction, AuditEvent};
pub use directory::{AttributeMap, DirectoryConfig, DirectoryDetail, DirectoryUser};
pub use mapping::{DirectoryRoleMapping, MappingType, WILDCARD_CONFIG_ID};
pub use role::{Permission, Role, RoleAssignment, RoleSource, DEFAULT_ROLE_NAME};
pub use user::User;
