use crate::error::StoreError;
use makazi_model::{Director, NewDirector};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn decode_director_row(row: &Row<'_>) -> rusqlite::Result<Director> {
    Ok(Director {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        bio: row.get(3)?,
        image_url: row.get(4)?,
        linkedin: row.get(5)?,
        email: row.get(6)?,
    })
}

const DIRECTOR_COLUMNS: &str = "id, name, position, bio, image_url, linkedin, email";

pub fn list(conn: &Connection) -> Result<Vec<Director>, StoreError> {
    let sql = format!("SELECT {DIRECTOR_COLUMNS} FROM directors ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], decode_director_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Director>, StoreError> {
    let sql = format!("SELECT {DIRECTOR_COLUMNS} FROM directors WHERE id = ?1");
    conn.query_row(&sql, params![id], decode_director_row)
        .optional()
        .map_err(StoreError::from)
}

pub fn create(conn: &Connection, new: &NewDirector) -> Result<Director, StoreError> {
    conn.execute(
        "INSERT INTO directors (name, position, bio, image_url, linkedin, email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.name,
            new.position,
            new.bio,
            new.image_url,
            new.linkedin,
            new.email
        ],
    )?;
    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or_else(|| {
        StoreError::Internal(format!("director {id} missing immediately after insert"))
    })
}

pub fn update(
    conn: &Connection,
    id: i64,
    new: &NewDirector,
) -> Result<Option<Director>, StoreError> {
    let changed = conn.execute(
        "UPDATE directors
         SET name = ?1, position = ?2, bio = ?3, image_url = ?4, linkedin = ?5, email = ?6
         WHERE id = ?7",
        params![
            new.name,
            new.position,
            new.bio,
            new.image_url,
            new.linkedin,
            new.email,
            id
        ],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let changed = conn.execute("DELETE FROM directors WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
