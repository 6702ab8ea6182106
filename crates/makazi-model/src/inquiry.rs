use crate::validation::{validate_email, validate_phone, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum InquiryStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl InquiryStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Resolved, Self::Cancelled];

    pub fn parse_normalized(input: &str) -> Result<Self, ValidationError> {
        let folded: String = input
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                _ => c.to_ascii_lowercase(),
            })
            .collect();
        match folded.as_str() {
            "new" => Ok(Self::New),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError(format!("unknown inquiry status: {other}"))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for InquiryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    /// Weak reference: the property may have been deleted since.
    pub property_id: Option<i64>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub property_id: Option<i64>,
}

impl NewInquiry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("name must not be empty".to_string()));
        }
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        if self.message.trim().is_empty() {
            return Err(ValidationError("message must not be empty".to_string()));
        }
        if self.property_id.is_some_and(|id| id <= 0) {
            return Err(ValidationError(
                "propertyId must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewInquiry {
        NewInquiry {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            phone: "0712345678".to_string(),
            subject: "Viewing".to_string(),
            message: "Interested, please call".to_string(),
            property_id: None,
        }
    }

    #[test]
    fn status_parse_accepts_variants_and_rejects_unknown() {
        assert_eq!(
            InquiryStatus::parse_normalized("In Progress").expect("parse"),
            InquiryStatus::InProgress
        );
        assert_eq!(
            InquiryStatus::parse_normalized("resolved").expect("parse"),
            InquiryStatus::Resolved
        );
        assert!(InquiryStatus::parse_normalized("done").is_err());
    }

    #[test]
    fn required_fields_are_enforced() {
        assert!(sample().validate().is_ok());

        let mut i = sample();
        i.message = String::new();
        assert!(i.validate().is_err());

        let mut i = sample();
        i.email = "not-an-email".to_string();
        assert!(i.validate().is_err());

        let mut i = sample();
        i.phone = "123".to_string();
        assert!(i.validate().is_err());

        let mut i = sample();
        i.property_id = Some(0);
        assert!(i.validate().is_err());
    }
}
