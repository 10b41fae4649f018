//! SQLite persistence for [`VectorIndex`].
//!
//! The whole index is written to a fresh database next to the target path and
//! renamed over it once complete, so readers see either the previous file or
//! the new one.

use super::{IndexEntry, VectorIndex};
use crate::chunking::Chunk;
use crate::error::{RegscoutError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Bumped whenever the on-disk layout changes.
const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
    PRAGMA journal_mode=DELETE;

    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE entries (
        position INTEGER PRIMARY KEY,
        source_id TEXT NOT NULL,
        content TEXT NOT NULL,
        metadata TEXT NOT NULL,
        start_offset INTEGER NOT NULL,
        end_offset INTEGER NOT NULL,
        embedding BLOB NOT NULL
    );
"#;

impl VectorIndex {
    /// Persist the index to `location`, atomically replacing prior content.
    #[instrument(skip(self), fields(entries = self.len()))]
    pub fn save(&self, location: &Path) -> Result<()> {
        let parent = match location.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new()
            .prefix(".regscout-index-")
            .suffix(".tmp")
            .tempfile_in(parent)?;

        self.write_database(staging.path())?;

        staging
            .persist(location)
            .map_err(|e| RegscoutError::Io(e.error))?;

        info!("Saved index with {} entries to {:?}", self.len(), location);
        Ok(())
    }

    fn write_database(&self, path: &Path) -> Result<()> {
        let mut conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        {
            let mut meta = tx.prepare("INSERT INTO meta (key, value) VALUES (?1, ?2)")?;
            meta.execute(params!["format_version", FORMAT_VERSION])?;
            meta.execute(params!["dimension", self.dimension.to_string()])?;
            meta.execute(params!["embedding_model", self.embedding_model])?;
            meta.execute(params!["entry_count", self.entries.len().to_string()])?;
            meta.execute(params!["built_at", self.built_at.to_rfc3339()])?;

            let mut insert = tx.prepare(
                r#"
                INSERT INTO entries
                (position, source_id, content, metadata, start_offset, end_offset, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for (position, entry) in self.entries.iter().enumerate() {
                insert.execute(params![
                    position as i64,
                    entry.chunk.source_id,
                    entry.chunk.text,
                    serde_json::to_string(&entry.chunk.metadata)?,
                    entry.chunk.start as i64,
                    entry.chunk.end as i64,
                    embedding_to_bytes(&entry.vector),
                ])?;
            }
        }
        tx.commit()?;

        conn.close().map_err(|(_, e)| RegscoutError::Database(e))?;
        Ok(())
    }

    /// Load an index previously written by [`VectorIndex::save`].
    #[instrument]
    pub fn load(location: &Path) -> Result<Self> {
        if !location.exists() {
            return Err(RegscoutError::IndexNotFound(location.to_path_buf()));
        }
        if !location.is_file() {
            return Err(RegscoutError::corrupt(location, "not a regular file"));
        }

        let db_err = |e: rusqlite::Error| RegscoutError::corrupt(location, e.to_string());

        let conn = Connection::open_with_flags(
            location,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(db_err)?;

        let meta: HashMap<String, String> = {
            let mut stmt = conn.prepare("SELECT key, value FROM meta").map_err(db_err)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(db_err)?;
            rows.collect::<rusqlite::Result<_>>().map_err(db_err)?
        };

        let field = |key: &str| {
            meta.get(key)
                .ok_or_else(|| RegscoutError::corrupt(location, format!("missing meta field '{}'", key)))
        };

        let version = field("format_version")?;
        if version != FORMAT_VERSION {
            return Err(RegscoutError::corrupt(
                location,
                format!("unsupported format version {}", version),
            ));
        }

        let dimension: usize = field("dimension")?
            .parse()
            .map_err(|_| RegscoutError::corrupt(location, "invalid dimension"))?;
        let entry_count: usize = field("entry_count")?
            .parse()
            .map_err(|_| RegscoutError::corrupt(location, "invalid entry count"))?;
        let embedding_model = field("embedding_model")?.clone();
        let built_at = DateTime::parse_from_rfc3339(field("built_at")?)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| RegscoutError::corrupt(location, "invalid build timestamp"))?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT source_id, content, metadata, start_offset, end_offset, embedding
                FROM entries
                ORDER BY position
                "#,
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RawEntry {
                    source_id: row.get(0)?,
                    content: row.get(1)?,
                    metadata: row.get(2)?,
                    start: row.get(3)?,
                    end: row.get(4)?,
                    embedding: row.get(5)?,
                })
            })
            .map_err(db_err)?;

        let mut entries = Vec::with_capacity(entry_count);
        for row in rows {
            let raw = row.map_err(db_err)?;
            entries.push(raw.into_entry(location, dimension)?);
        }

        if entries.len() != entry_count {
            return Err(RegscoutError::corrupt(
                location,
                format!("expected {} entries, found {}", entry_count, entries.len()),
            ));
        }

        debug!("Loaded {} entries from {:?}", entries.len(), location);

        Ok(Self {
            entries,
            dimension,
            embedding_model,
            built_at,
        })
    }
}

struct RawEntry {
    source_id: String,
    content: String,
    metadata: String,
    start: i64,
    end: i64,
    embedding: Vec<u8>,
}

impl RawEntry {
    fn into_entry(self, location: &Path, dimension: usize) -> Result<IndexEntry> {
        let metadata: BTreeMap<String, String> = serde_json::from_str(&self.metadata)
            .map_err(|e| RegscoutError::corrupt(location, format!("invalid metadata: {}", e)))?;

        let vector = bytes_to_embedding(&self.embedding)
            .filter(|v| v.len() == dimension)
            .ok_or_else(|| RegscoutError::corrupt(location, "embedding size mismatch"))?;

        let (start, end) = match (usize::try_from(self.start), usize::try_from(self.end)) {
            (Ok(s), Ok(e)) if s <= e => (s, e),
            _ => return Err(RegscoutError::corrupt(location, "invalid chunk offsets")),
        };

        Ok(IndexEntry {
            vector,
            chunk: Chunk {
                text: self.content,
                source_id: self.source_id,
                metadata,
                start,
                end,
            },
        })
    }
}

/// Serialize embedding to bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize embedding from bytes.
fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}
