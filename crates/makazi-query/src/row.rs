use chrono::{DateTime, Utc};
use makazi_model::{ListingStatus, Property, PropertyType};
use rusqlite::types::Type;
use rusqlite::Row;

/// Column order contract shared by every statement that materializes a
/// [`Property`]; [`decode_property_row`] indexes into it positionally.
pub const PROPERTY_SELECT_COLUMNS: &str = "p.id, p.title, p.description, p.price, p.location, \
     p.property_type, p.status, p.size, p.bedrooms, p.bathrooms, p.offices, p.parking, \
     p.features, p.images, p.featured, p.created_at";

fn text_conversion_err(idx: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn decode_property_row(row: &Row<'_>) -> rusqlite::Result<Property> {
    let property_type_raw: String = row.get(5)?;
    let property_type =
        PropertyType::parse(&property_type_raw).map_err(|e| text_conversion_err(5, e))?;
    let status_raw: String = row.get(6)?;
    let status =
        ListingStatus::parse_normalized(&status_raw).map_err(|e| text_conversion_err(6, e))?;

    let features_raw: String = row.get(12)?;
    let features: Vec<String> =
        serde_json::from_str(&features_raw).map_err(|e| text_conversion_err(12, e))?;
    let images_raw: String = row.get(13)?;
    let images: Vec<String> =
        serde_json::from_str(&images_raw).map_err(|e| text_conversion_err(13, e))?;

    let created_raw: String = row.get(15)?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|e| text_conversion_err(15, e))?
        .with_timezone(&Utc);

    Ok(Property {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        location: row.get(4)?,
        property_type,
        status,
        size: row.get(7)?,
        bedrooms: row.get(8)?,
        bathrooms: row.get(9)?,
        offices: row.get(10)?,
        parking: row.get(11)?,
        features,
        images,
        featured: row.get::<_, i64>(14)? != 0,
        created_at,
    })
}
