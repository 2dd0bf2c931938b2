//! SQLite-backed store.
//!
//! The connection lives behind a `Mutex`; each lookup holds the lock for one
//! bounded read and never across an await point. Timestamps are stored as
//! RFC 3339 text with nanosecond precision.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::{info, warn};

use crate::domain::{Content, ContentId, Link, LinkId, ModuleId};

use super::snapshot::CatalogSnapshot;
use super::{ContentListing, ContentLookup, LinkIndex, ModuleDirectory, StoreError, StoreResult};

/// Upper bound on bound parameters per `IN (...)` query
const MAX_IN_PARAMS: usize = 500;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS content (
    id          INTEGER PRIMARY KEY,
    title       TEXT    NOT NULL,
    format      TEXT    NOT NULL,
    url         TEXT    NOT NULL DEFAULT '',
    description TEXT    NOT NULL DEFAULT '',
    created_at  TEXT    NOT NULL
);
CREATE TABLE IF NOT EXISTS modules (
    id         INTEGER PRIMARY KEY,
    subject    TEXT    NOT NULL,
    created_at TEXT    NOT NULL
);
CREATE TABLE IF NOT EXISTS links (
    id         INTEGER PRIMARY KEY,
    module_id  INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
    content_id INTEGER NOT NULL REFERENCES content(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_links_module ON links(module_id);
CREATE INDEX IF NOT EXISTS idx_links_content ON links(content_id);
";

/// SQLite catalog store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists
    pub fn open(path: &Path) -> StoreResult<Self> {
        let started_at = Instant::now();
        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;

        info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Opened catalog database"
        );

        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Replace every row with the contents of a snapshot, atomically
    pub fn import_snapshot(&self, snapshot: &CatalogSnapshot) -> StoreResult<()> {
        if let Err(e) = snapshot.validate() {
            warn!(error = %e, "Rejecting snapshot import");
            return Err(e);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute_batch("DELETE FROM links; DELETE FROM content; DELETE FROM modules;")?;

        for content in &snapshot.contents {
            tx.execute(
                "INSERT INTO content (id, title, format, url, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    content.id.get(),
                    content.title,
                    content.format,
                    content.url,
                    content.description,
                    timestamp_to_text(&content.created_at),
                ],
            )?;
        }

        for module in &snapshot.modules {
            tx.execute(
                "INSERT INTO modules (id, subject, created_at) VALUES (?1, ?2, ?3)",
                params![
                    module.id.get(),
                    module.subject,
                    timestamp_to_text(&module.created_at)
                ],
            )?;
        }

        for link in &snapshot.links {
            tx.execute(
                "INSERT INTO links (id, module_id, content_id) VALUES (?1, ?2, ?3)",
                params![link.id.0, link.module_id.get(), link.content_id.get()],
            )?;
        }

        tx.commit()?;

        info!(
            contents = snapshot.contents.len(),
            modules = snapshot.modules.len(),
            links = snapshot.links.len(),
            "Imported catalog snapshot"
        );

        Ok(())
    }
}

fn timestamp_to_text(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn text_to_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Integrity(format!("Invalid timestamp {:?}: {}", raw, e)))
}

fn content_from_row(row: &Row<'_>) -> rusqlite::Result<(Content, String)> {
    let content = Content {
        id: ContentId(row.get(0)?),
        title: row.get(1)?,
        format: row.get(2)?,
        url: row.get(3)?,
        description: row.get(4)?,
        created_at: DateTime::<Utc>::default(),
        links: Vec::new(),
    };
    Ok((content, row.get(5)?))
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link::new(
        LinkId(row.get(0)?),
        ModuleId(row.get(1)?),
        ContentId(row.get(2)?),
    ))
}

fn collect_content(rows: Vec<(Content, String)>) -> StoreResult<BTreeMap<ContentId, Content>> {
    rows.into_iter()
        .map(|(mut content, created_at)| {
            content.created_at = text_to_timestamp(&created_at)?;
            Ok((content.id, content))
        })
        .collect()
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Load content rows and their links for one chunk of ids
fn load_chunk(conn: &Connection, ids: &[i64]) -> StoreResult<BTreeMap<ContentId, Content>> {
    let marks = placeholders(ids.len());

    let mut stmt = conn.prepare(&format!(
        "SELECT id, title, format, url, description, created_at
         FROM content WHERE id IN ({})",
        marks
    ))?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), content_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let mut contents = collect_content(rows)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT id, module_id, content_id FROM links WHERE content_id IN ({}) ORDER BY id",
        marks
    ))?;
    let links = stmt
        .query_map(params_from_iter(ids.iter()), link_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    attach_links(&mut contents, links);

    Ok(contents)
}

fn attach_links(contents: &mut BTreeMap<ContentId, Content>, links: Vec<Link>) {
    for link in links {
        if let Some(content) = contents.get_mut(&link.content_id) {
            content.links.push(link);
        }
    }
}

#[async_trait]
impl LinkIndex for SqliteStore {
    async fn content_ids_for_module(&self, module_id: ModuleId) -> StoreResult<BTreeSet<ContentId>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT content_id FROM links WHERE module_id = ?1")?;
        let ids = stmt
            .query_map(params![module_id.get()], |row| row.get::<_, i64>(0))?
            .map(|id| id.map(ContentId))
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(ids)
    }
}

#[async_trait]
impl ContentLookup for SqliteStore {
    async fn by_ids(&self, ids: &BTreeSet<ContentId>) -> StoreResult<Vec<Content>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let conn = self.lock()?;

        let mut found = Vec::with_capacity(raw.len());
        for chunk in raw.chunks(MAX_IN_PARAMS) {
            found.extend(load_chunk(&conn, chunk)?.into_values());
        }

        Ok(found)
    }
}

#[async_trait]
impl ContentListing for SqliteStore {
    async fn all(&self) -> StoreResult<Vec<Content>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, format, url, description, created_at FROM content ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], content_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut contents = collect_content(rows)?;

        let mut stmt = conn.prepare("SELECT id, module_id, content_id FROM links ORDER BY id")?;
        let links = stmt
            .query_map([], link_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        attach_links(&mut contents, links);

        Ok(contents.into_values().collect())
    }
}

#[async_trait]
impl ModuleDirectory for SqliteStore {
    async fn module_count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM modules", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn link_count(&self, module_id: ModuleId) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM links WHERE module_id = ?1",
            params![module_id.get()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
