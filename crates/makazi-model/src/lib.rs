#![forbid(unsafe_code)]
//! Makazi domain model SSOT.
//!
//! Every string that crosses the service boundary is turned into one of
//! these types before anything else looks at it; `parse` is the only
//! constructor for the closed enumerations.

mod director;
mod inquiry;
mod property;
mod user;
mod validation;

pub use director::{Director, NewDirector};
pub use inquiry::{Inquiry, InquiryStatus, NewInquiry};
pub use property::{
    ListingStatus, NewProperty, Property, PropertyPatch, PropertyType, LOCATION_MAX_LEN,
    TITLE_MAX_LEN,
};
pub use user::{AdminUser, NewAdminUser, PASSWORD_MIN_LEN, USERNAME_MAX_LEN};
pub use validation::{validate_email, validate_phone, ValidationError};

pub const CRATE_NAME: &str = "makazi-model";
