use crate::error::StoreError;
use rusqlite::Connection;

/// Idempotent bootstrap: every statement is `IF NOT EXISTS`, so running it
/// against an existing database is a no-op.
pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          username TEXT NOT NULL UNIQUE,
          password_hash TEXT NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS properties (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          title TEXT NOT NULL,
          description TEXT NOT NULL DEFAULT '',
          price INTEGER NOT NULL,
          location TEXT NOT NULL,
          property_type TEXT NOT NULL,
          status TEXT NOT NULL,
          size INTEGER NOT NULL DEFAULT 0,
          bedrooms INTEGER,
          bathrooms INTEGER,
          offices INTEGER,
          parking INTEGER,
          features TEXT NOT NULL DEFAULT '[]',
          images TEXT NOT NULL DEFAULT '[]',
          featured INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_properties_created ON properties(created_at, id);
        CREATE INDEX IF NOT EXISTS idx_properties_type ON properties(property_type);
        CREATE INDEX IF NOT EXISTS idx_properties_status ON properties(status);
        CREATE INDEX IF NOT EXISTS idx_properties_location ON properties(location);
        CREATE INDEX IF NOT EXISTS idx_properties_price ON properties(price);
        CREATE INDEX IF NOT EXISTS idx_properties_featured ON properties(featured, status);

        CREATE TABLE IF NOT EXISTS directors (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          position TEXT NOT NULL,
          bio TEXT NOT NULL DEFAULT '',
          image_url TEXT NOT NULL DEFAULT '',
          linkedin TEXT,
          email TEXT
        );

        CREATE TABLE IF NOT EXISTS inquiries (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          email TEXT NOT NULL,
          phone TEXT NOT NULL,
          subject TEXT NOT NULL DEFAULT '',
          message TEXT NOT NULL,
          property_id INTEGER,
          status TEXT NOT NULL DEFAULT 'new',
          created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_inquiries_status ON inquiries(status);
        CREATE INDEX IF NOT EXISTS idx_inquiries_created ON inquiries(created_at, id);

        CREATE TABLE IF NOT EXISTS sessions (
          token_hash TEXT PRIMARY KEY,
          user_id INTEGER NOT NULL REFERENCES users(id),
          created_at TEXT NOT NULL,
          expires_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);
        ",
    )
    .map_err(StoreError::from)
}
