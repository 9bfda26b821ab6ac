//! Credential protection.
//!
//! Credentials live in `Zeroizing` containers and are redacted from every
//! `Debug` and `Display` implementation in this crate. The password reaches
//! the dump tool through its environment, never through its argument vector.

mod credentials;

pub use credentials::Credentials;

/// Environment variable the MySQL client tools read the password from.
pub const MYSQL_PASSWORD_ENV: &str = "MYSQL_PWD";
