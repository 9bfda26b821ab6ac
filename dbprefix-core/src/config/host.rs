//! Parsing of WordPress-style `DB_HOST` values.
//!
//! `DB_HOST` can carry a port or a Unix socket path alongside the host name:
//! `db.example.com`, `db.example.com:3307`, `localhost:/run/mysqld.sock`,
//! `/run/mysqld.sock`, `[::1]` and `[::1]:3307` are all valid.

use crate::{Result, error::DbPrefixError};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "localhost";

/// A `DB_HOST` value split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    /// Host name or IP address, without brackets
    pub host: String,
    /// Optional TCP port
    pub port: Option<u16>,
    /// Optional Unix socket path
    pub socket: Option<PathBuf>,
}

impl Default for HostSpec {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: None,
            socket: None,
        }
    }
}

impl std::fmt::Display for HostSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            write!(f, "{}", self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(socket) = &self.socket {
            write!(f, ":{}", socket.display())?;
        }
        Ok(())
    }
}

impl HostSpec {
    /// Parses a `DB_HOST` value.
    ///
    /// # Errors
    /// Returns a configuration error for an unterminated IPv6 bracket, a
    /// non-numeric port or port zero.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        // A bare socket path connects to localhost.
        if raw.starts_with('/') {
            return Ok(Self {
                socket: Some(PathBuf::from(raw)),
                ..Self::default()
            });
        }

        let (address, socket) = match raw.find(":/") {
            Some(idx) => (&raw[..idx], Some(PathBuf::from(&raw[idx + 1..]))),
            None => (raw, None),
        };

        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let end = rest.find(']').ok_or_else(|| {
                DbPrefixError::configuration(format!(
                    "DB_HOST '{}' has an unterminated IPv6 bracket",
                    raw
                ))
            })?;
            let port = match &rest[end + 1..] {
                "" => None,
                tail => match tail.strip_prefix(':') {
                    Some(port) => parse_port(port)?,
                    None => {
                        return Err(DbPrefixError::configuration(format!(
                            "DB_HOST '{}' has unexpected text after the IPv6 address",
                            raw
                        )));
                    }
                },
            };
            (&rest[..end], port)
        } else if let Some((host, port)) = address
            .split_once(':')
            .filter(|(_, port)| !port.contains(':'))
        {
            (host, parse_port(port)?)
        } else {
            // No colon, or an unbracketed IPv6 address that cannot carry a port.
            (address, None)
        };

        Ok(Self {
            host: if host.is_empty() {
                DEFAULT_HOST.to_string()
            } else {
                host.to_string()
            },
            port,
            socket,
        })
    }
}

fn parse_port(raw: &str) -> Result<Option<u16>> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u16>() {
        Ok(0) => Err(DbPrefixError::configuration(
            "Invalid port number: must be greater than 0",
        )),
        Ok(port) => Ok(Some(port)),
        Err(_) => Err(DbPrefixError::configuration(format!(
            "Invalid port number '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(host: &str, port: Option<u16>, socket: Option<&str>) -> HostSpec {
        HostSpec {
            host: host.to_string(),
            port,
            socket: socket.map(PathBuf::from),
        }
    }

    #[test]
    fn test_parse_plain_host() {
        assert_eq!(
            HostSpec::parse("db.example.com").unwrap(),
            spec("db.example.com", None, None)
        );
        assert_eq!(HostSpec::parse("").unwrap(), HostSpec::default());
    }

    #[test]
    fn test_parse_host_and_port() {
        assert_eq!(
            HostSpec::parse("127.0.0.1:3307").unwrap(),
            spec("127.0.0.1", Some(3307), None)
        );
        assert_eq!(
            HostSpec::parse(":3307").unwrap(),
            spec("localhost", Some(3307), None)
        );
        assert_eq!(
            HostSpec::parse("db:").unwrap(),
            spec("db", None, None)
        );
    }

    #[test]
    fn test_parse_socket() {
        assert_eq!(
            HostSpec::parse("localhost:/var/run/mysqld/mysqld.sock").unwrap(),
            spec("localhost", None, Some("/var/run/mysqld/mysqld.sock"))
        );
        assert_eq!(
            HostSpec::parse("/tmp/mysql.sock").unwrap(),
            spec("localhost", None, Some("/tmp/mysql.sock"))
        );
    }

    #[test]
    fn test_parse_ipv6() {
        assert_eq!(HostSpec::parse("[::1]").unwrap(), spec("::1", None, None));
        assert_eq!(
            HostSpec::parse("[::1]:3307").unwrap(),
            spec("::1", Some(3307), None)
        );
        assert_eq!(
            HostSpec::parse("fe80::1").unwrap(),
            spec("fe80::1", None, None)
        );
    }

    #[test]
    fn test_parse_rejects_bad_ports() {
        assert!(HostSpec::parse("db:abc").is_err());
        assert!(HostSpec::parse("db:0").is_err());
        assert!(HostSpec::parse("db:70000").is_err());
        assert!(HostSpec::parse("[::1").is_err());
        assert!(HostSpec::parse("[::1]x").is_err());
    }

    #[test]
    fn test_display_round_trips_common_forms() {
        for raw in ["localhost", "db:3307", "[::1]:3307", "localhost:/tmp/mysql.sock"] {
            assert_eq!(HostSpec::parse(raw).unwrap().to_string(), raw);
        }
    }
}
