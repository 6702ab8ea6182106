use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const TITLE_MAX_LEN: usize = 200;
pub const LOCATION_MAX_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Land,
}

impl PropertyType {
    pub const ALL: [Self; 3] = [Self::Residential, Self::Commercial, Self::Land];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            "land" => Ok(Self::Land),
            other => Err(ValidationError(format!(
                "unknown property type: {other}"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Land => "land",
        }
    }
}

impl Display for PropertyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing lifecycle state. The canonical wire and storage form is the
/// lowercase hyphenated token; `parse_normalized` folds the legacy spellings
/// (`"For Sale"`, `"for sale"`) into it at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum ListingStatus {
    #[serde(rename = "for-sale")]
    ForSale,
    #[serde(rename = "for-rent")]
    ForRent,
    #[serde(rename = "for-lease")]
    ForLease,
    #[serde(rename = "sold")]
    Sold,
    #[serde(rename = "pending")]
    Pending,
}

impl ListingStatus {
    pub const ALL: [Self; 5] = [
        Self::ForSale,
        Self::ForRent,
        Self::ForLease,
        Self::Sold,
        Self::Pending,
    ];
    pub const ACTIVE: [Self; 3] = [Self::ForSale, Self::ForRent, Self::ForLease];

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
            "for-sale" => Ok(Self::ForSale),
            "for-rent" => Ok(Self::ForRent),
            "for-lease" => Ok(Self::ForLease),
            "sold" => Ok(Self::Sold),
            "pending" => Ok(Self::Pending),
            other => Err(ValidationError(format!("unknown listing status: {other}"))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForSale => "for-sale",
            Self::ForRent => "for-rent",
            Self::ForLease => "for-lease",
            Self::Sold => "sold",
            Self::Pending => "pending",
        }
    }

    /// Active listings are the ones the public catalog surfaces.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::ForSale | Self::ForRent | Self::ForLease)
    }
}

impl Display for ListingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub location: String,
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub size: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub offices: Option<i64>,
    pub parking: Option<i64>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub location: String,
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub size: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub offices: Option<i64>,
    pub parking: Option<i64>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub featured: bool,
}

impl NewProperty {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError("title must not be empty".to_string()));
        }
        if title.len() > TITLE_MAX_LEN {
            return Err(ValidationError(format!(
                "title exceeds max length {TITLE_MAX_LEN}"
            )));
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError("location must not be empty".to_string()));
        }
        if location.len() > LOCATION_MAX_LEN {
            return Err(ValidationError(format!(
                "location exceeds max length {LOCATION_MAX_LEN}"
            )));
        }
        if self.price < 0 {
            return Err(ValidationError("price must be non-negative".to_string()));
        }
        if self.size < 0 {
            return Err(ValidationError("size must be non-negative".to_string()));
        }
        for (name, value) in [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("offices", self.offices),
            ("parking", self.parking),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(ValidationError(format!("{name} must be non-negative")));
            }
        }
        Ok(())
    }
}

/// Partial update: every field optional, absent fields untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<ListingStatus>,
    pub size: Option<i64>,
    pub bedrooms: Option<Option<i64>>,
    pub bathrooms: Option<Option<i64>>,
    pub offices: Option<Option<i64>>,
    pub parking: Option<Option<i64>>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

impl PropertyPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError("title must not be empty".to_string()));
            }
            if title.trim().len() > TITLE_MAX_LEN {
                return Err(ValidationError(format!(
                    "title exceeds max length {TITLE_MAX_LEN}"
                )));
            }
        }
        if let Some(location) = &self.location {
            if location.trim().is_empty() {
                return Err(ValidationError("location must not be empty".to_string()));
            }
            if location.trim().len() > LOCATION_MAX_LEN {
                return Err(ValidationError(format!(
                    "location exceeds max length {LOCATION_MAX_LEN}"
                )));
            }
        }
        if self.price.is_some_and(|p| p < 0) {
            return Err(ValidationError("price must be non-negative".to_string()));
        }
        if self.size.is_some_and(|s| s < 0) {
            return Err(ValidationError("size must be non-negative".to_string()));
        }
        for (name, value) in [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("offices", self.offices),
            ("parking", self.parking),
        ] {
            if value.flatten().is_some_and(|v| v < 0) {
                return Err(ValidationError(format!("{name} must be non-negative")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewProperty {
        NewProperty {
            title: "Three bedroom maisonette".to_string(),
            description: "Gated community off Kiambu Road".to_string(),
            price: 8_100,
            location: "Kiambu".to_string(),
            property_type: PropertyType::Residential,
            status: ListingStatus::ForSale,
            size: 180,
            bedrooms: Some(3),
            bathrooms: Some(2),
            offices: None,
            parking: Some(2),
            features: vec!["borehole".to_string()],
            images: Vec::new(),
            featured: false,
        }
    }

    #[test]
    fn property_type_parse_is_closed() {
        assert_eq!(
            PropertyType::parse("Commercial").expect("parse"),
            PropertyType::Commercial
        );
        assert!(PropertyType::parse("castle").is_err());
        assert!(PropertyType::parse("").is_err());
    }

    #[test]
    fn status_normalizes_legacy_casings() {
        for raw in ["For Sale", "for sale", "FOR-SALE", "for_sale"] {
            assert_eq!(
                ListingStatus::parse_normalized(raw).expect("parse"),
                ListingStatus::ForSale
            );
        }
        assert_eq!(
            ListingStatus::parse_normalized("For Lease").expect("parse"),
            ListingStatus::ForLease
        );
        assert!(ListingStatus::parse_normalized("available").is_err());
    }

    #[test]
    fn status_serializes_canonically() {
        let json = serde_json::to_string(&ListingStatus::ForRent).expect("json");
        assert_eq!(json, "\"for-rent\"");
    }

    #[test]
    fn active_statuses_exclude_sold_and_pending() {
        assert!(ListingStatus::ForLease.is_active());
        assert!(!ListingStatus::Sold.is_active());
        assert!(!ListingStatus::Pending.is_active());
    }

    #[test]
    fn new_property_validation_rejects_negatives_and_blanks() {
        assert!(sample().validate().is_ok());

        let mut p = sample();
        p.price = -1;
        assert!(p.validate().is_err());

        let mut p = sample();
        p.title = "   ".to_string();
        assert!(p.validate().is_err());

        let mut p = sample();
        p.bedrooms = Some(-2);
        assert!(p.validate().is_err());
    }

    #[test]
    fn patch_validation_checks_only_present_fields() {
        assert!(PropertyPatch::default().validate().is_ok());
        assert!(PropertyPatch::default().is_empty());

        let patch = PropertyPatch {
            price: Some(-5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = PropertyPatch {
            status: Some(ListingStatus::Sold),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert!(!patch.is_empty());
    }
}
