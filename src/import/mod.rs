//! CSV ingestion for the portfolio export.

mod normalizer;
mod parser;

use crate::audit::VenueMetrics;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum VenueImportError {
    #[error("failed to read venue export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid venue CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid venue row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

/// Reads venue rows, dropping any id in the exclusion set.
#[derive(Debug, Clone, Default)]
pub struct VenueImporter {
    excluded: HashSet<u32>,
}

impl VenueImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.excluded.extend(ids);
        self
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<VenueMetrics>, VenueImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening venue export");
        let file = std::fs::File::open(path)?;
        self.from_reader(file)
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Vec<VenueMetrics>, VenueImportError> {
        let mut venues = parser::parse_venues(reader)?;
        let parsed = venues.len();
        venues.retain(|venue| !self.excluded.contains(&venue.id));

        info!(
            rows = parsed,
            excluded = parsed - venues.len(),
            "imported venue export"
        );
        Ok(venues)
    }
}
