//! Login Gate
//!
//! Fixed credential table for the two console roles.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Nesprávne meno alebo heslo")]
    InvalidCredentials,
}

/// Usernames offered in the login select, in display order
pub const USERNAMES: &[&str] = &["admin", "operator"];

const CREDENTIALS: &[(&str, &str, Role)] = &[
    ("admin", "BantVegas", Role::Admin),
    ("operator", "etis1", Role::Operator),
];

pub fn authenticate(username: &str, password: &str) -> Result<Role, AuthError> {
    CREDENTIALS
        .iter()
        .find(|(user, pass, _)| *user == username && *pass == password)
        .map(|(_, _, role)| *role)
        .ok_or(AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_credentials() {
        assert_eq!(authenticate("admin", "BantVegas"), Ok(Role::Admin));
        assert_eq!(authenticate("operator", "etis1"), Ok(Role::Operator));
    }

    #[test]
    fn test_password_belongs_to_user() {
        assert_eq!(authenticate("operator", "BantVegas"), Err(AuthError::InvalidCredentials));
        assert_eq!(authenticate("admin", ""), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Nesprávne meno alebo heslo");
    }
}
