use crate::validation::{validate_email, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image_url: String,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDirector {
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image_url: String,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

impl NewDirector {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError("name must not be empty".to_string()));
        }
        if self.position.trim().is_empty() {
            return Err(ValidationError("position must not be empty".to_string()));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}
