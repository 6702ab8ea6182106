use crate::error::StoreError;
use chrono::{SecondsFormat, Utc};
use makazi_model::{ListingStatus, NewProperty, Property, PropertyPatch};
use makazi_query::{decode_property_row, PROPERTY_SELECT_COLUMNS};
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension};

pub fn get(conn: &Connection, id: i64) -> Result<Option<Property>, StoreError> {
    let sql = format!("SELECT {PROPERTY_SELECT_COLUMNS} FROM properties p WHERE p.id = ?1");
    conn.query_row(&sql, params![id], decode_property_row)
        .optional()
        .map_err(StoreError::from)
}

pub fn create(conn: &Connection, new: &NewProperty) -> Result<Property, StoreError> {
    let features = serde_json::to_string(&new.features)
        .map_err(|e| StoreError::Internal(e.to_string()))?;
    let images =
        serde_json::to_string(&new.images).map_err(|e| StoreError::Internal(e.to_string()))?;
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    conn.execute(
        "INSERT INTO properties
           (title, description, price, location, property_type, status, size,
            bedrooms, bathrooms, offices, parking, features, images, featured, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            new.title,
            new.description,
            new.price,
            new.location,
            new.property_type.as_str(),
            new.status.as_str(),
            new.size,
            new.bedrooms,
            new.bathrooms,
            new.offices,
            new.parking,
            features,
            images,
            new.featured as i64,
            created_at,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or_else(|| {
        StoreError::Internal(format!("property {id} missing immediately after insert"))
    })
}

pub fn update(
    conn: &Connection,
    id: i64,
    patch: &PropertyPatch,
) -> Result<Option<Property>, StoreError> {
    if patch.is_empty() {
        return get(conn, id);
    }

    let mut set_parts: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(title) = &patch.title {
        set_parts.push("title = ?".to_string());
        values.push(Value::Text(title.clone()));
    }
    if let Some(description) = &patch.description {
        set_parts.push("description = ?".to_string());
        values.push(Value::Text(description.clone()));
    }
    if let Some(price) = patch.price {
        set_parts.push("price = ?".to_string());
        values.push(Value::Integer(price));
    }
    if let Some(location) = &patch.location {
        set_parts.push("location = ?".to_string());
        values.push(Value::Text(location.clone()));
    }
    if let Some(property_type) = patch.property_type {
        set_parts.push("property_type = ?".to_string());
        values.push(Value::Text(property_type.as_str().to_string()));
    }
    if let Some(status) = patch.status {
        set_parts.push("status = ?".to_string());
        values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(size) = patch.size {
        set_parts.push("size = ?".to_string());
        values.push(Value::Integer(size));
    }
    for (column, value) in [
        ("bedrooms", patch.bedrooms),
        ("bathrooms", patch.bathrooms),
        ("offices", patch.offices),
        ("parking", patch.parking),
    ] {
        if let Some(inner) = value {
            set_parts.push(format!("{column} = ?"));
            values.push(match inner {
                Some(v) => Value::Integer(v),
                None => Value::Null,
            });
        }
    }
    if let Some(features) = &patch.features {
        let encoded =
            serde_json::to_string(features).map_err(|e| StoreError::Internal(e.to_string()))?;
        set_parts.push("features = ?".to_string());
        values.push(Value::Text(encoded));
    }
    if let Some(images) = &patch.images {
        let encoded =
            serde_json::to_string(images).map_err(|e| StoreError::Internal(e.to_string()))?;
        set_parts.push("images = ?".to_string());
        values.push(Value::Text(encoded));
    }
    if let Some(featured) = patch.featured {
        set_parts.push("featured = ?".to_string());
        values.push(Value::Integer(featured as i64));
    }

    let sql = format!("UPDATE properties SET {} WHERE id = ?", set_parts.join(", "));
    values.push(Value::Integer(id));
    let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, id)
}

/// Removal is idempotent at the storage level; the returned flag tells the
/// caller whether anything was actually there.
pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let changed = conn.execute("DELETE FROM properties WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn distinct_locations(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT location FROM properties ORDER BY location ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

pub fn distinct_types(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT property_type FROM properties ORDER BY property_type ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

/// Homepage highlights: featured rows still on the market, newest first.
pub fn featured(conn: &Connection, limit: usize) -> Result<Vec<Property>, StoreError> {
    let placeholders = vec!["?"; ListingStatus::ACTIVE.len()].join(", ");
    let sql = format!(
        "SELECT {PROPERTY_SELECT_COLUMNS} FROM properties p
         WHERE p.featured = 1 AND p.status IN ({placeholders})
         ORDER BY p.created_at DESC, p.id DESC LIMIT ?"
    );
    let mut values: Vec<Value> = ListingStatus::ACTIVE
        .iter()
        .map(|s| Value::Text(s.as_str().to_string()))
        .collect();
    values.push(Value::Integer(limit as i64));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), decode_property_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

pub fn count_all(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM properties", [], |row| row.get(0))?;
    Ok(total.max(0) as u64)
}

pub fn count_by_status(conn: &Connection, status: ListingStatus) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM properties WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )?;
    Ok(total.max(0) as u64)
}

pub fn count_featured(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM properties WHERE featured = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(total.max(0) as u64)
}
