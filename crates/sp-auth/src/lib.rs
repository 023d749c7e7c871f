//! # sp-auth
//!
//! Authentication flows for the secportal identity backend.
//!
//! Wires the directory client, attribute mapper, and transactional
//! reconciler into login flows, validates the local admin credential,
//! and issues signed access/refresh token pairs.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod cache;
pub mod error;
pub mod flow;
pub mod password;
pub mod sync;
pub mod token;
pub mod validation;

pub use cache::{InMemoryRoleCache, RoleCache};
pub use error::{AuthError, AuthResult};
pub use flow::{AdminCredentials, AuthSuccess, DirectoryAuthFlow};
pub use sync::{DirectorySynchronizer, SyncResult};
pub use token::{Claims, TokenConfig, TokenIssuer, TokenPair};
