//! Catalog stores: an in-memory row set and a directory of situation JSON files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use rightsdb_core::error::{Error, Result};
use rightsdb_core::traits::CatalogStore;
use rightsdb_core::types::CatalogRow;

#[derive(Debug, Clone)]
struct Entry {
    row: CatalogRow,
    active: bool,
}

/// Rows held in memory. Counts fetches so callers can observe cache behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<Entry>>,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { entries: RwLock::new(Self::entries_from(rows)), fetches: AtomicUsize::new(0) }
    }

    /// Swap the whole row set, e.g. after the bundled dataset was replaced.
    pub fn replace(&self, rows: Vec<CatalogRow>) { *self.entries.write() = Self::entries_from(rows); }

    /// Keep the row but hide it from searches. Returns false for unknown ids.
    pub fn set_active(&self, id: &str, active: bool) -> bool {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.row.id == id) {
            Some(e) => { e.active = active; true }
            None => false,
        }
    }

    pub fn rows(&self) -> Vec<CatalogRow> {
        self.entries.read().iter().filter(|e| e.active).map(|e| e.row.clone()).collect()
    }

    pub fn fetch_count(&self) -> usize { self.fetches.load(Ordering::SeqCst) }

    fn entries_from(rows: Vec<CatalogRow>) -> Vec<Entry> {
        rows.into_iter().map(|row| Entry { row, active: true }).collect()
    }
}

impl CatalogStore for MemoryStore {
    fn active_situations(&self) -> Result<Vec<CatalogRow>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows())
    }
}

/// Situations authored as JSON files under a directory tree.
///
/// Each `*.json` file holds one situation object or an array of them. Files
/// are read in path order; a later record with an already seen id replaces
/// the earlier one. Symlinks are followed. The directory is re-read on every
/// fetch.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl Default for TextOrList {
    fn default() -> Self { TextOrList::Text(String::new()) }
}

impl TextOrList {
    fn join(self, sep: &str) -> String {
        match self {
            TextOrList::Text(s) => s,
            TextOrList::List(items) => items.join(sep),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SituationRecord {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    #[serde(default)]
    keywords: TextOrList,
    #[serde(default)]
    natural_queries: TextOrList,
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_severity() -> String { "medium".to_string() }

fn default_active() -> bool { true }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<SituationRecord>),
    One(Box<SituationRecord>),
}

impl SituationRecord {
    /// `None` (with a warning) when a required field is missing or blank.
    fn into_row(self, source: &Path) -> Option<(CatalogRow, bool)> {
        let required = [("id", &self.id), ("title", &self.title), ("description", &self.description), ("category", &self.category)];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            warn!(file = %source.display(), id = self.id.as_deref().unwrap_or("?"), ?missing, "skipping situation with missing fields");
            return None;
        }
        let row = CatalogRow {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            keywords: self.keywords.join(", "),
            natural_queries: self.natural_queries.join("|"),
            severity: self.severity,
            category: self.category.unwrap_or_default(),
        };
        Some((row, self.is_active))
    }
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Any unreadable entry fails the listing; a partial catalog is never returned.
    fn list_json_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).display().to_string();
                Error::Store(format!("{}: {}", path, e))
            })?;
            if entry.file_type().is_file() && entry.path().extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read_records(path: &Path) -> Result<Vec<SituationRecord>> {
        let content = std::fs::read_to_string(path)?;
        let parsed: RecordFile = serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;
        Ok(match parsed {
            RecordFile::Many(records) => records,
            RecordFile::One(record) => vec![*record],
        })
    }
}

impl CatalogStore for JsonDirStore {
    fn active_situations(&self) -> Result<Vec<CatalogRow>> {
        if !self.root.is_dir() {
            return Err(Error::NotFound(format!("catalog directory {}", self.root.display())));
        }
        let files = self.list_json_files()?;
        let mut rows: Vec<(CatalogRow, bool)> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();
        for file in &files {
            for record in Self::read_records(file)? {
                let Some((row, active)) = record.into_row(file) else { continue };
                match by_id.get(&row.id) {
                    Some(&i) => rows[i] = (row, active),
                    None => {
                        by_id.insert(row.id.clone(), rows.len());
                        rows.push((row, active));
                    }
                }
            }
        }
        let active: Vec<CatalogRow> = rows.into_iter().filter(|(_, a)| *a).map(|(r, _)| r).collect();
        debug!(root = %self.root.display(), files = files.len(), rows = active.len(), "read situation catalog");
        Ok(active)
    }
}
