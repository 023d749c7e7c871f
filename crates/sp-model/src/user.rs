//! User domain model.
//!
//! Users are created either by an administrator or on first successful
//! directory login. Directory-sourced users carry a link to the
//! configuration they were authenticated against and are refreshed on
//! every subsequent login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A portal user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique username.
    pub username: String,
    /// Email address (unique when present).
    pub email: Option<String>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Timestamp of the last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Directory configuration this user was last authenticated against.
    pub directory_config_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with the given username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email: None,
            display_name: None,
            is_active: true,
            last_login_at: None,
            directory_config_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Links the user to a directory configuration.
    #[must_use]
    pub const fn with_directory_config(mut self, config_id: Uuid) -> Self {
        self.directory_config_id = Some(config_id);
        self
    }

    /// Checks if the user is backed by a directory.
    #[must_use]
    pub const fn is_directory_user(&self) -> bool {
        self.directory_config_id.is_some()
    }

    /// Records a successful login at the current time.
    pub fn touch_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let user = User::new("jdoe");

        assert_eq!(user.username, "jdoe");
        assert!(user.is_active);
        assert!(user.last_login_at.is_none());
        assert!(!user.is_directory_user());
    }

    #[test]
    fn builder_pattern_works() {
        let config_id = Uuid::now_v7();
        let user = User::new("jdoe")
            .with_email("jdoe@example.com")
            .with_display_name("John Doe")
            .with_directory_config(config_id);

        assert_eq!(user.email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("John Doe"));
        assert_eq!(user.directory_config_id, Some(config_id));
        assert!(user.is_directory_user());
    }

    #[test]
    fn touch_login_sets_timestamps() {
        let mut user = User::new("jdoe");
        let created = user.updated_at;

        user.touch_login();

        assert!(user.last_login_at.is_some());
        assert!(user.updated_at >= created);
    }
}
