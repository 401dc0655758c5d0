//! SQLite schema definition

/// SQL schema for the event database
pub const SCHEMA_SQL: &str = r#"
-- Earthquakes: one row per observed event, keyed by the feed id
CREATE TABLE IF NOT EXISTS earthquakes (
    id TEXT PRIMARY KEY,
    title TEXT,
    magnitude REAL,
    location TEXT,
    time INTEGER,
    updated INTEGER,
    timezone INTEGER,
    url TEXT,
    detail TEXT,
    felt INTEGER,
    cdi REAL,
    mmi REAL,
    alert TEXT,
    status TEXT,
    tsunami INTEGER,
    sig INTEGER,
    net TEXT,
    code TEXT,
    ids TEXT,
    sources TEXT,
    types TEXT,
    nst INTEGER,
    dmin REAL,
    rms REAL,
    gap REAL,
    magType TEXT,
    type TEXT,
    longitude REAL,
    latitude REAL,
    depth REAL,
    created_at TEXT NOT NULL
);

-- Scrape history: append-only audit trail, one row per ingestion batch
CREATE TABLE IF NOT EXISTS scrape_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time_range TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    scraped_at TEXT NOT NULL
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_earthquakes_time ON earthquakes(time);
CREATE INDEX IF NOT EXISTS idx_earthquakes_magnitude ON earthquakes(magnitude);
CREATE INDEX IF NOT EXISTS idx_earthquakes_location ON earthquakes(location);
"#;
