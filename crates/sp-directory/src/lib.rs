//! # sp-directory
//!
//! LDAP directory client for the secportal identity backend.
//!
//! Resolves which directory configuration applies to a login attempt,
//! connects and binds to the directory server, locates the user entry,
//! validates the password via a user bind, and maps the entry to the
//! canonical profile shape consumed by the reconciler.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod mapper;
pub mod params;
pub mod search;

pub use client::DirectoryClient;
pub use error::{DirectoryError, DirectoryResult};
pub use mapper::map_entry;
pub use params::{ConnectionParams, resolve_configuration};
pub use search::DirectoryEntry;
