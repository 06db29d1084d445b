//! SQLite storage implementation
//!
//! Contents are keyed by `(ChannelID, ID)`, items by
//! `(ChannelID, ContentID, Seq)`. A content is known as soon as its row
//! exists, so the SQL store never re-checks a stored bulletin.

use crate::channel::Channel;
use crate::record::{Content, ContentStub, Item};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Baseline, Storage, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and migrates its schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns true if an item row with this key exists
    pub fn has_item(&self, channel: Channel, content_id: &str, seq: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM item WHERE ChannelID = ?1 AND ContentID = ?2 AND Seq = ?3",
                params![channel.code(), content_id, seq],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Counts the stored items of all contents
    pub fn item_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM item", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn load_items(&self, channel: Channel, content_id: &str) -> StorageResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT Seq, Name, Catalog, Publisher, Operator, ApprovalNumber, ISBN,
             ChangeInfo, RevokeInfo, Date
             FROM item WHERE ChannelID = ?1 AND ContentID = ?2 ORDER BY rowid",
        )?;

        let items = stmt
            .query_map(params![channel.code(), content_id], |row| {
                Ok(Item {
                    seq: row.get(0)?,
                    name: row.get(1)?,
                    catalog: row.get(2)?,
                    publisher: row.get(3)?,
                    operator: row.get(4)?,
                    approval_number: row.get(5)?,
                    isbn: row.get(6)?,
                    change_info: row.get(7)?,
                    revoke_info: row.get(8)?,
                    date: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}

impl Baseline for SqliteStorage {
    fn is_known(&self, stub: &ContentStub) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM content WHERE ChannelID = ?1 AND ID = ?2",
                params![stub.channel.code(), stub.id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn prior_version(&self, stub: &ContentStub) -> StorageResult<Option<Content>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT Title, URL, Date FROM content WHERE ChannelID = ?1 AND ID = ?2",
                params![stub.channel.code(), stub.id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((title, url, date)) = row else {
            return Ok(None);
        };

        let items = self.load_items(stub.channel, &stub.id)?;
        Ok(Some(Content {
            channel: stub.channel,
            id: stub.id.clone(),
            title,
            url,
            date,
            items,
        }))
    }
}

impl Storage for SqliteStorage {
    fn add_content(&mut self, content: &Content) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        // Items go in first; rows already present under the same key are kept
        for item in &content.items {
            tx.execute(
                "INSERT OR IGNORE INTO item (ChannelID, ContentID, Seq, Name, Catalog, Publisher,
                 Operator, ApprovalNumber, ISBN, ChangeInfo, RevokeInfo, Date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    content.channel.code(),
                    content.id,
                    item.seq,
                    item.name,
                    item.catalog,
                    item.publisher,
                    item.operator,
                    item.approval_number,
                    item.isbn,
                    item.change_info,
                    item.revoke_info,
                    item.date,
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO content (ChannelID, ID, Title, URL, Date) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                content.channel.code(),
                content.id,
                content.title,
                content.url,
                content.date
            ],
        )
        .map_err(|e| {
            StorageError::Database(format!(
                "insert content {}/{}: {}",
                content.channel, content.id, e
            ))
        })?;

        tx.commit()?;
        Ok(())
    }

    fn content_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM content", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revoked_content() -> Content {
        let item = |seq: &str| Item {
            seq: seq.to_string(),
            name: format!("Game {}", seq),
            catalog: Some("移动".to_string()),
            publisher: Some("Pub".to_string()),
            operator: Some("Op".to_string()),
            approval_number: format!("GA{}", seq),
            isbn: Some(format!("ISBN-{}", seq)),
            date: "2024-04-01".to_string(),
            change_info: None,
            revoke_info: Some("主动撤销".to_string()),
        };
        Content {
            channel: Channel::GameRevoked,
            id: "t20240401_7".to_string(),
            title: "2024年4月游戏审批撤销信息".to_string(),
            url: "yxspcxxx/202404/t20240401_7.html".to_string(),
            date: "2024-04-01".to_string(),
            items: vec![item("2"), item("1"), item("10")],
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.content_count().unwrap(), 0);
    }

    #[test]
    fn test_add_content_makes_it_known() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let content = revoked_content();

        assert!(!storage.is_known(&content.stub()).unwrap());
        storage.add_content(&content).unwrap();

        assert!(storage.is_known(&content.stub()).unwrap());
        assert_eq!(storage.content_count().unwrap(), 1);
        assert_eq!(storage.item_count().unwrap(), 3);
        assert!(storage
            .has_item(Channel::GameRevoked, "t20240401_7", "10")
            .unwrap());
    }

    #[test]
    fn test_known_is_scoped_by_channel() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let content = revoked_content();
        storage.add_content(&content).unwrap();

        let mut other = content.stub();
        other.channel = Channel::GameChanged;
        assert!(!storage.is_known(&other).unwrap());
    }

    #[test]
    fn test_prior_version_preserves_order_and_absent_fields() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let content = revoked_content();
        storage.add_content(&content).unwrap();

        let prior = storage.prior_version(&content.stub()).unwrap().unwrap();
        assert_eq!(prior, content);
        assert_eq!(prior.items[2].seq, "10");
        assert_eq!(prior.items[0].change_info, None);
    }

    #[test]
    fn test_prior_version_missing() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage
            .prior_version(&revoked_content().stub())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_content_is_rejected_atomically() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let content = revoked_content();
        storage.add_content(&content).unwrap();

        let result = storage.add_content(&content);
        assert!(matches!(result, Err(StorageError::Database(_))));
        assert_eq!(storage.content_count().unwrap(), 1);
        assert_eq!(storage.item_count().unwrap(), 3);
    }

    #[test]
    fn test_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nppa.db");
        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage.add_content(&revoked_content()).unwrap();
        }
        let reopened = SqliteStorage::new(&path).unwrap();
        assert!(reopened.is_known(&revoked_content().stub()).unwrap());
    }
}
