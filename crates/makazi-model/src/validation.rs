use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MIN_DIGITS: usize = 7;

/// Shape check only: one `@`, non-empty local part, domain with a dot.
/// Deliverability is the notifier's problem, not the model's.
pub fn validate_email(input: &str) -> Result<(), ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError("email must not be empty".to_string()));
    }
    if s.len() > EMAIL_MAX_LEN {
        return Err(ValidationError(format!(
            "email exceeds max length {EMAIL_MAX_LEN}"
        )));
    }
    let Some((local, domain)) = s.split_once('@') else {
        return Err(ValidationError("email must contain '@'".to_string()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError("email is malformed".to_string()));
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(ValidationError(
            "email domain must contain a dot".to_string(),
        ));
    };
    if host.is_empty() || tld.is_empty() || s.contains(char::is_whitespace) {
        return Err(ValidationError("email is malformed".to_string()));
    }
    Ok(())
}

/// Accepts separators and a leading `+`; requires enough digits to be
/// plausibly dialable.
pub fn validate_phone(input: &str) -> Result<(), ValidationError> {
    let digits = input.chars().filter(char::is_ascii_digit).count();
    if digits < PHONE_MIN_DIGITS {
        return Err(ValidationError(format!(
            "phone must contain at least {PHONE_MIN_DIGITS} digits"
        )));
    }
    let ok = input
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !ok {
        return Err(ValidationError(
            "phone contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_is_enforced() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.example.co.ke").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn phone_requires_enough_digits() {
        assert!(validate_phone("0712345678").is_ok());
        assert!(validate_phone("+254 712 345 678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("071234x678").is_err());
    }
}
