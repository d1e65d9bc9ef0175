use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::models::{WatchEntry, WatchItem};
use crate::utils::error::ValidationError;
use crate::Result;

/// Parses a JSON array of `{slug, asking_price}` objects. Only the structure
/// is checked here; missing fields survive until [`validate`].
pub fn load<R: Read>(source: R) -> Result<Vec<WatchEntry>> {
    let entries: Vec<WatchEntry> = serde_json::from_reader(source)?;
    Ok(entries)
}

pub fn load_file(path: &Path) -> Result<Vec<WatchEntry>> {
    let file = File::open(path)?;
    let entries = load(BufReader::new(file))?;
    tracing::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Appends `new` after `existing`. Duplicate slugs are kept and will be
/// checked once per occurrence.
pub fn merge(mut existing: Vec<WatchEntry>, new: Vec<WatchEntry>) -> Vec<WatchEntry> {
    existing.extend(new);
    existing
}

/// Checks every entry, failing on the first bad one.
pub fn validate(entries: &[WatchEntry]) -> std::result::Result<Vec<WatchItem>, ValidationError> {
    if entries.is_empty() {
        return Err(ValidationError::Empty);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.to_item(index))
        .collect()
}

/// Immutable, ordered list of entries assembled once from all sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    entries: Vec<WatchEntry>,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchEntry>) -> Self {
        Self { entries }
    }

    pub fn builder() -> WatchlistBuilder {
        WatchlistBuilder::default()
    }

    /// Loads and merges every file in order.
    pub fn from_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        paths
            .iter()
            .fold(Self::builder(), |builder, path| builder.source(path.as_ref()))
            .build()
    }

    pub fn entries(&self) -> &[WatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self) -> std::result::Result<Vec<WatchItem>, ValidationError> {
        validate(&self.entries)
    }
}

/// Collects sources first and reads them all in [`WatchlistBuilder::build`].
#[derive(Debug, Default)]
pub struct WatchlistBuilder {
    sources: Vec<PathBuf>,
    entries: Vec<WatchEntry>,
}

impl WatchlistBuilder {
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Adds entries that are already in memory; they come after all file sources.
    pub fn entries(mut self, entries: Vec<WatchEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn build(self) -> Result<Watchlist> {
        let mut merged = Vec::new();
        for path in &self.sources {
            merged = merge(merged, load_file(path)?);
        }
        merged = merge(merged, self.entries);

        tracing::info!("Watchlist built with {} entries from {} sources", merged.len(), self.sources.len());
        Ok(Watchlist::new(merged))
    }
}
