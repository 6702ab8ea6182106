use crate::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use makazi_model::{Inquiry, InquiryStatus, NewInquiry};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension, Row};

const INQUIRY_SELECT_COLUMNS: &str =
    "i.id, i.name, i.email, i.phone, i.subject, i.message, i.property_id, i.status, i.created_at";

fn decode_inquiry_row(row: &Row<'_>) -> rusqlite::Result<Inquiry> {
    let status_raw: String = row.get(7)?;
    let status = InquiryStatus::parse_normalized(&status_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    let created_raw: String = row.get(8)?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(Inquiry {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        property_id: row.get(6)?,
        status,
        created_at,
    })
}

pub fn create(conn: &Connection, new: &NewInquiry) -> Result<Inquiry, StoreError> {
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    conn.execute(
        "INSERT INTO inquiries (name, email, phone, subject, message, property_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.name,
            new.email,
            new.phone,
            new.subject,
            new.message,
            new.property_id,
            InquiryStatus::New.as_str(),
            created_at,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or_else(|| {
        StoreError::Internal(format!("inquiry {id} missing immediately after insert"))
    })
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Inquiry>, StoreError> {
    let sql = format!("SELECT {INQUIRY_SELECT_COLUMNS} FROM inquiries i WHERE i.id = ?1");
    conn.query_row(&sql, params![id], decode_inquiry_row)
        .optional()
        .map_err(StoreError::from)
}

/// Triage listing: optional case-sensitive substring over the free-text
/// columns, optional status equality, newest first.
pub fn list(
    conn: &Connection,
    search: Option<&str>,
    status: Option<InquiryStatus>,
) -> Result<Vec<Inquiry>, StoreError> {
    let mut where_parts: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(needle) = search {
        where_parts.push(
            "(instr(i.name, ?) > 0 OR instr(i.email, ?) > 0 OR instr(i.subject, ?) > 0 OR instr(i.message, ?) > 0)"
                .to_string(),
        );
        for _ in 0..4 {
            values.push(Value::Text(needle.to_string()));
        }
    }
    if let Some(status) = status {
        where_parts.push("i.status = ?".to_string());
        values.push(Value::Text(status.as_str().to_string()));
    }

    let mut sql = format!("SELECT {INQUIRY_SELECT_COLUMNS} FROM inquiries i");
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    sql.push_str(" ORDER BY i.created_at DESC, i.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), decode_inquiry_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

pub fn update_status(
    conn: &Connection,
    id: i64,
    status: InquiryStatus,
) -> Result<Option<Inquiry>, StoreError> {
    let changed = conn.execute(
        "UPDATE inquiries SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, id)
}

pub fn count_all(conn: &Connection) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM inquiries", [], |row| row.get(0))?;
    Ok(total.max(0) as u64)
}

pub fn count_by_status(conn: &Connection, status: InquiryStatus) -> Result<u64, StoreError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM inquiries WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )?;
    Ok(total.max(0) as u64)
}
