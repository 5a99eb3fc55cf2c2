use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;

use crate::model::category::{FundCategory, lookup_category};
use crate::model::fund::FundRankingRow;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid category: {0}")]
    UnknownCategory(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A category snapshot: the funds of one category plus, optionally, the slug it came from.
#[derive(Debug, Clone)]
pub struct FundSnapshot {
    pub category: Option<&'static FundCategory>,
    pub rows: Vec<FundRankingRow>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Rows(Vec<FundRankingRow>),
    Wrapped {
        #[serde(default)]
        category: Option<String>,
        funds: Vec<FundRankingRow>,
    },
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Loads a snapshot from a JSON array of rows or a `{category, funds}` object, gzip or plain.
/// `category_override` wins over the slug recorded in the file.
pub fn load_snapshot(
    path: &Path,
    category_override: Option<&str>,
) -> Result<FundSnapshot, InputError> {
    let reader = open_maybe_gz(path)?;
    let parsed: SnapshotFile =
        serde_json::from_reader(reader).map_err(|source| InputError::Json {
            path: path.display().to_string(),
            source,
        })?;

    let (file_category, rows) = match parsed {
        SnapshotFile::Rows(rows) => (None, rows),
        SnapshotFile::Wrapped { category, funds } => (category, funds),
    };

    let slug = category_override.map(str::to_string).or(file_category);
    let category = match slug {
        Some(slug) => Some(
            lookup_category(&slug).ok_or_else(|| InputError::UnknownCategory(slug.clone()))?,
        ),
        None => None,
    };

    check_rows(&rows)?;

    tracing::info!(
        path = %path.display(),
        funds = rows.len(),
        category = category.map(|c| c.slug).unwrap_or("-"),
        "loaded fund snapshot"
    );

    Ok(FundSnapshot { category, rows })
}

fn check_rows(rows: &[FundRankingRow]) -> Result<(), InputError> {
    let mut seen = std::collections::HashSet::new();
    for (idx, row) in rows.iter().enumerate() {
        if row.scheme_code.trim().is_empty() {
            return Err(InputError::InvalidInput(format!(
                "fund at index {idx} has an empty scheme_code"
            )));
        }
        if !seen.insert(row.scheme_code.as_str()) {
            tracing::warn!(
                scheme_code = %row.scheme_code,
                "duplicate scheme_code in snapshot; both rows are kept"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
