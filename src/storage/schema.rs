//! Database schema definitions
//!
//! Two tables keyed by channel code and document id. Items carry their
//! parent's key; there is no foreign key between the tables.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS content (
    ChannelID CHAR(8) NOT NULL,
    ID CHAR(8) NOT NULL,
    Title VARCHAR(64) NOT NULL,
    URL VARCHAR(256) NOT NULL,
    Date CHAR(16) NOT NULL,
    PRIMARY KEY (ChannelID, ID)
);

CREATE TABLE IF NOT EXISTS item (
    ChannelID CHAR(8) NOT NULL,
    ContentID CHAR(8) NOT NULL,
    Seq CHAR(8) NOT NULL,
    Name VARCHAR(256) NOT NULL,
    Catalog VARCHAR(256),
    Publisher VARCHAR(256),
    Operator VARCHAR(256),
    ApprovalNumber VARCHAR(256) NOT NULL,
    ISBN VARCHAR(256),
    ChangeInfo VARCHAR(256),
    RevokeInfo VARCHAR(256),
    Date CHAR(16) NOT NULL,
    PRIMARY KEY (ChannelID, ContentID, Seq)
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
