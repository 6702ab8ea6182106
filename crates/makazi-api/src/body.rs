use crate::errors::ApiError;
use makazi_model::{
    validate_email, validate_phone, InquiryStatus, ListingStatus, NewAdminUser, NewDirector,
    NewInquiry, NewProperty, PropertyPatch, PropertyType,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

pub const CONTACT_DEFAULT_SUBJECT: &str = "Contact Form Submission";

fn field_error(field: &str, reason: impl Into<String>) -> Value {
    json!({"field": field, "reason": reason.into()})
}

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`) so PATCH-style bodies can clear optional columns.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateInquiryBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Clients send this as a number or a numeric string; both accepted.
    #[serde(default)]
    pub property_id: Option<Value>,
}

impl CreateInquiryBody {
    pub fn into_new_inquiry(self, default_subject: &str) -> Result<NewInquiry, ApiError> {
        let mut errors: Vec<Value> = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(field_error("name", "required"));
        }
        if let Err(e) = validate_email(&self.email) {
            errors.push(field_error("email", e.to_string()));
        }
        if let Err(e) = validate_phone(&self.phone) {
            errors.push(field_error("phone", e.to_string()));
        }
        if self.message.trim().is_empty() {
            errors.push(field_error("message", "required"));
        }

        let property_id = match &self.property_id {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(id) if id > 0 => Some(id),
                _ => {
                    errors.push(field_error("propertyId", "must be a positive integer"));
                    None
                }
            },
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                _ => {
                    errors.push(field_error("propertyId", "must be a positive integer"));
                    None
                }
            },
            Some(_) => {
                errors.push(field_error("propertyId", "must be a positive integer"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(ApiError::validation_failed(json!(errors)));
        }

        let subject = self
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_subject.to_string());

        Ok(NewInquiry {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            subject,
            message: self.message.trim().to_string(),
            property_id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePropertyBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub location: String,
    pub property_type: String,
    pub status: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    pub offices: Option<i64>,
    #[serde(default)]
    pub parking: Option<i64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl CreatePropertyBody {
    pub fn into_new_property(self) -> Result<NewProperty, ApiError> {
        let mut errors: Vec<Value> = Vec::new();

        let property_type = match PropertyType::parse(&self.property_type) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(field_error("propertyType", e.to_string()));
                None
            }
        };
        let status = match ListingStatus::parse_normalized(&self.status) {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push(field_error("status", e.to_string()));
                None
            }
        };

        let candidate = NewProperty {
            title: self.title.trim().to_string(),
            description: self.description,
            price: self.price,
            location: self.location.trim().to_string(),
            property_type: property_type.unwrap_or(PropertyType::Residential),
            status: status.unwrap_or(ListingStatus::ForSale),
            size: self.size,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            offices: self.offices,
            parking: self.parking,
            features: self.features,
            images: self.images,
            featured: self.featured,
        };
        if let Err(e) = candidate.validate() {
            errors.push(field_error("body", e.to_string()));
        }
        if !errors.is_empty() {
            return Err(ApiError::validation_failed(json!(errors)));
        }
        Ok(candidate)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePropertyBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub bedrooms: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bathrooms: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub offices: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parking: Option<Option<i64>>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl UpdatePropertyBody {
    pub fn into_patch(self) -> Result<PropertyPatch, ApiError> {
        let mut errors: Vec<Value> = Vec::new();

        let property_type = match self.property_type.as_deref() {
            None => None,
            Some(raw) => match PropertyType::parse(raw) {
                Ok(t) => Some(t),
                Err(e) => {
                    errors.push(field_error("propertyType", e.to_string()));
                    None
                }
            },
        };
        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => match ListingStatus::parse_normalized(raw) {
                Ok(s) => Some(s),
                Err(e) => {
                    errors.push(field_error("status", e.to_string()));
                    None
                }
            },
        };

        let patch = PropertyPatch {
            title: self.title,
            description: self.description,
            price: self.price,
            location: self.location,
            property_type,
            status,
            size: self.size,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            offices: self.offices,
            parking: self.parking,
            features: self.features,
            images: self.images,
            featured: self.featured,
        };
        if let Err(e) = patch.validate() {
            errors.push(field_error("body", e.to_string()));
        }
        if !errors.is_empty() {
            return Err(ApiError::validation_failed(json!(errors)));
        }
        Ok(patch)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateInquiryStatusBody {
    pub status: String,
}

impl UpdateInquiryStatusBody {
    pub fn parse_status(&self) -> Result<InquiryStatus, ApiError> {
        InquiryStatus::parse_normalized(&self.status).map_err(|e| {
            ApiError::validation_failed(json!([field_error("status", e.to_string())]))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsBody {
    pub fn into_new_admin(self) -> Result<NewAdminUser, ApiError> {
        let candidate = NewAdminUser {
            username: self.username.trim().to_string(),
            password: self.password,
        };
        candidate.validate().map_err(|e| {
            ApiError::validation_failed(json!([field_error("credentials", e.to_string())]))
        })?;
        Ok(candidate)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DirectorBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl DirectorBody {
    pub fn into_new_director(self) -> Result<NewDirector, ApiError> {
        let candidate = NewDirector {
            name: self.name.trim().to_string(),
            position: self.position.trim().to_string(),
            bio: self.bio,
            image_url: self.image_url,
            linkedin: self.linkedin.filter(|v| !v.trim().is_empty()),
            email: self.email.filter(|v| !v.trim().is_empty()),
        };
        candidate.validate().map_err(|e| {
            ApiError::validation_failed(json!([field_error("body", e.to_string())]))
        })?;
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_body_accepts_numeric_and_string_property_ids() {
        let body: CreateInquiryBody = serde_json::from_value(json!({
            "name": "A",
            "email": "a@b.com",
            "phone": "0712345678",
            "message": "Interested, please call",
            "propertyId": 7
        }))
        .expect("deserialize");
        let inquiry = body.into_new_inquiry(CONTACT_DEFAULT_SUBJECT).expect("valid");
        assert_eq!(inquiry.property_id, Some(7));
        assert_eq!(inquiry.subject, CONTACT_DEFAULT_SUBJECT);
        assert_eq!(inquiry.message, "Interested, please call");

        let body: CreateInquiryBody = serde_json::from_value(json!({
            "name": "A",
            "email": "a@b.com",
            "phone": "0712345678",
            "message": "hello",
            "propertyId": "12"
        }))
        .expect("deserialize");
        assert_eq!(
            body.into_new_inquiry("x").expect("valid").property_id,
            Some(12)
        );
    }

    #[test]
    fn inquiry_body_missing_message_is_a_validation_error() {
        let body: CreateInquiryBody = serde_json::from_value(json!({
            "name": "A",
            "email": "a@b.com",
            "phone": "0712345678"
        }))
        .expect("deserialize");
        let err = body.into_new_inquiry("x").expect_err("must fail");
        assert_eq!(crate::error_mapping::map_error(&err), 400);
    }

    #[test]
    fn inquiry_body_rejects_garbage_property_id() {
        let body: CreateInquiryBody = serde_json::from_value(json!({
            "name": "A",
            "email": "a@b.com",
            "phone": "0712345678",
            "message": "hi",
            "propertyId": "plot-9"
        }))
        .expect("deserialize");
        assert!(body.into_new_inquiry("x").is_err());
    }

    #[test]
    fn property_body_round_trips_into_validated_domain_type() {
        let body: CreatePropertyBody = serde_json::from_value(json!({
            "title": "CBD office block",
            "description": "Open-plan floors",
            "price": 180000,
            "location": "Nairobi",
            "propertyType": "commercial",
            "status": "For Sale",
            "size": 800,
            "offices": 12,
            "features": ["backup power"],
            "featured": true
        }))
        .expect("deserialize");
        let property = body.into_new_property().expect("valid");
        assert_eq!(property.property_type, PropertyType::Commercial);
        assert_eq!(property.status, ListingStatus::ForSale);
        assert!(property.featured);
    }

    #[test]
    fn property_body_rejects_unknown_enum_tokens() {
        let body: CreatePropertyBody = serde_json::from_value(json!({
            "title": "x",
            "description": "",
            "price": 1,
            "location": "y",
            "propertyType": "castle",
            "status": "for-sale"
        }))
        .expect("deserialize");
        assert!(body.into_new_property().is_err());
    }

    #[test]
    fn update_body_distinguishes_null_from_absent() {
        let body: UpdatePropertyBody =
            serde_json::from_value(json!({"bedrooms": null})).expect("deserialize");
        let patch = body.into_patch().expect("patch");
        assert_eq!(patch.bedrooms, Some(None));
        assert_eq!(patch.bathrooms, None);

        let body: UpdatePropertyBody =
            serde_json::from_value(json!({"bedrooms": 4})).expect("deserialize");
        let patch = body.into_patch().expect("patch");
        assert_eq!(patch.bedrooms, Some(Some(4)));
    }

    #[test]
    fn unknown_body_keys_are_rejected_at_deserialization() {
        let result: Result<UpdateInquiryStatusBody, _> =
            serde_json::from_value(json!({"status": "resolved", "note": "done"}));
        assert!(result.is_err());
    }
}
