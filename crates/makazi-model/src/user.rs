use crate::validation::ValidationError;
use serde::Serialize;

pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Admin account. The hash string is the store's concern; the model only
/// guarantees it is never the cleartext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdminUser {
    pub username: String,
    pub password: String,
}

impl NewAdminUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError("username must not be empty".to_string()));
        }
        if username.len() > USERNAME_MAX_LEN {
            return Err(ValidationError(format!(
                "username exceeds max length {USERNAME_MAX_LEN}"
            )));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
        {
            return Err(ValidationError(
                "username must match [a-z0-9_.]+".to_string(),
            ));
        }
        if self.password.len() < PASSWORD_MIN_LEN {
            return Err(ValidationError(format!(
                "password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_and_password_rules() {
        let ok = NewAdminUser {
            username: "admin".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = NewAdminUser {
            username: "Admin!".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(bad.validate().is_err());

        let bad = NewAdminUser {
            username: "admin".to_string(),
            password: "short".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = AdminUser {
            id: 1,
            username: "admin".to_string(),
            password_hash: "pbkdf2$x$y$z".to_string(),
        };
        let json = serde_json::to_string(&user).expect("json");
        assert!(!json.contains("pbkdf2"));
    }
}
