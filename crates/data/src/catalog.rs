use crate::AssetResolver;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use twinmatch_core::{CardRecord, Catalog};

/// Rows shorter than this are rejected; only the first three columns are read.
pub const MIN_FIELDS: usize = 7;

const GROUP_ID_COLUMN: usize = 0;
const VISUAL_COLUMN: usize = 1;
const VARIANT_ID_COLUMN: usize = 2;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable at {path}: {source}")]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog read failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("expected at least {min} fields, found {found}", min = MIN_FIELDS)]
    TooFewFields { found: usize },
    #[error("group id {0:?} is not an integer")]
    InvalidGroupId(String),
    #[error("visual {0:?} could not be resolved")]
    UnresolvedVisual(String),
    #[error("variant id {0:?} already loaded")]
    DuplicateVariant(String),
    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A skipped source row. Not fatal: loading carries on with the next row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    pub line: u64,
    pub reason: RowRejection,
}

#[derive(Debug)]
pub struct LoadReport {
    pub catalog: Arc<Catalog>,
    pub rejected: Vec<MalformedRecord>,
}

pub fn load_catalog(path: &Path, resolver: &dyn AssetResolver) -> Result<LoadReport, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::CatalogUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(file, resolver)
}

/// Reads a header-led, comma-separated table. Output keeps source row order.
pub fn parse_catalog<R: Read>(
    reader: R,
    resolver: &dyn AssetResolver,
) -> Result<LoadReport, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                reject(&mut rejected, line, RowRejection::Unreadable(err.to_string()));
                continue;
            }
        };
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        let line = row.position().map(|pos| pos.line()).unwrap_or_default();
        match parse_row(&row, resolver, &seen) {
            Ok(card) => {
                seen.insert(card.variant_id.clone());
                records.push(card);
            }
            Err(reason) => reject(&mut rejected, line, reason),
        }
    }

    let catalog = Catalog::new(records);
    info!(
        cards = catalog.len(),
        groups = catalog.group_count(),
        skipped = rejected.len(),
        "catalog loaded"
    );
    Ok(LoadReport {
        catalog: Arc::new(catalog),
        rejected,
    })
}

fn parse_row(
    row: &csv::StringRecord,
    resolver: &dyn AssetResolver,
    seen: &HashSet<String>,
) -> Result<CardRecord, RowRejection> {
    if row.len() < MIN_FIELDS {
        return Err(RowRejection::TooFewFields { found: row.len() });
    }
    let raw_group = &row[GROUP_ID_COLUMN];
    let group_id: i64 = raw_group
        .parse()
        .map_err(|_| RowRejection::InvalidGroupId(raw_group.to_string()))?;
    let variant_id = &row[VARIANT_ID_COLUMN];
    if seen.contains(variant_id) {
        return Err(RowRejection::DuplicateVariant(variant_id.to_string()));
    }
    let visual_key = &row[VISUAL_COLUMN];
    let visual = resolver
        .resolve(visual_key)
        .ok_or_else(|| RowRejection::UnresolvedVisual(visual_key.to_string()))?;
    Ok(CardRecord::new(group_id, variant_id, visual))
}

fn reject(rejected: &mut Vec<MalformedRecord>, line: u64, reason: RowRejection) {
    let record = MalformedRecord { line, reason };
    warn!(%record, "catalog row skipped");
    rejected.push(record);
}
