use rusqlite::{Connection, Result};

/// Initialize complete database schema for the daily memento app
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Schema version table for future migrations
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // Check if schema already exists
    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_schema(conn)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Create the complete schema (version 1)
fn create_schema(conn: &Connection) -> Result<()> {
    // Table: photos (one row per imported photo)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            day_number INTEGER NOT NULL CHECK(day_number >= 1),
            assigned_date TEXT NOT NULL,
            relative_path TEXT,
            viewed INTEGER NOT NULL DEFAULT 0 CHECK(viewed IN (0,1)),
            favorite INTEGER NOT NULL DEFAULT 0 CHECK(favorite IN (0,1)),
            note TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_photos_day_number ON photos(day_number)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_photos_favorite ON photos(favorite)",
        [],
    )?;

    conn.execute(
        "CREATE TRIGGER IF NOT EXISTS update_photos_timestamp
         AFTER UPDATE ON photos
         BEGIN
            UPDATE photos SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
         END",
        [],
    )?;

    // Table: quotes (seeded catalog plus custom entries)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS quotes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            author TEXT NOT NULL DEFAULT 'Unknown',
            category TEXT CHECK(category IN ('hope', 'love', 'remembrance', 'strength')) NOT NULL,
            day_number INTEGER NOT NULL DEFAULT 0,
            is_custom INTEGER NOT NULL DEFAULT 0 CHECK(is_custom IN (0,1)),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_quotes_day_number ON quotes(day_number)",
        [],
    )?;

    conn.execute(
        "CREATE TRIGGER IF NOT EXISTS update_quotes_timestamp
         AFTER UPDATE ON quotes
         BEGIN
            UPDATE quotes SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
         END",
        [],
    )?;

    // Table: settings (exactly one row)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            notification_time TEXT NOT NULL DEFAULT '09:00:00',
            theme TEXT CHECK(theme IN ('system', 'light', 'dark')) NOT NULL DEFAULT 'system',
            font_size TEXT CHECK(font_size IN ('small', 'medium', 'large')) NOT NULL DEFAULT 'medium',
            onboarding_complete INTEGER NOT NULL DEFAULT 0 CHECK(onboarding_complete IN (0,1)),
            start_date TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TRIGGER IF NOT EXISTS update_settings_timestamp
         AFTER UPDATE ON settings
         BEGIN
            UPDATE settings SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
         END",
        [],
    )?;

    // Table: selection_cache (today's pick per collection)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS selection_cache (
            kind TEXT PRIMARY KEY CHECK(kind IN ('photo', 'quote')),
            selected_date TEXT,
            selected_id INTEGER
        )",
        [],
    )?;

    Ok(())
}
