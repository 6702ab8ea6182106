use chrono::{DateTime, Utc};
use makazi_model::{InquiryStatus, ListingStatus, PropertyType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
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
#[serde(rename_all = "camelCase")]
pub struct InquiryDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub property_id: Option<i64>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorDto {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image_url: String,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListResponse {
    pub properties: Vec<PropertyDto>,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsResponse {
    pub locations: Vec<String>,
    pub property_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_properties: u64,
    pub for_sale: u64,
    pub for_rent: u64,
    pub for_lease: u64,
    pub sold: u64,
    pub pending: u64,
    pub featured: u64,
    pub total_inquiries: u64,
    pub new_inquiries: u64,
}
