//! Secure credential container with automatic memory zeroing.
//!
//! # Security
//! - Credentials are stored in `Zeroizing<T>` containers
//! - Memory is automatically cleared when credentials go out of scope
//! - The password is never exposed in debug output or logs

use zeroize::{Zeroize, Zeroizing};

/// Database user and password, zeroed on drop.
///
/// WordPress always defines a password constant, so the password is a plain
/// (possibly empty) string rather than an `Option`.
///
/// # Example
///
/// ```rust
/// use dbprefix_core::security::Credentials;
///
/// let creds = Credentials::new("wordpress".to_string(), "secret".to_string());
/// assert_eq!(creds.username(), "wordpress");
/// assert!(creds.has_password());
/// assert!(!format!("{creds:?}").contains("secret"));
/// ```
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing.
    pub fn new(username: String, password: String) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password. Callers must not log the returned value.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks if a non-empty password is present without exposing it.
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username())
            .field("password", &"****")
            .finish()
    }
}
