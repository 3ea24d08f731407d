//! JSON-file record source.
//!
//! The file holds a flat array of records, or an object wrapping one
//! under a `records` or `nodes` key as service payloads commonly do.
//! In lazy mode the file stands in for a remote service that
//! serves one hierarchy level at a time: each call re-reads the file
//! and slices it by path prefix.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::source::RecordSource;
use crate::tree::builder::{path_segments, FlatRecord};

/// Record source backed by a single JSON file.
pub struct JsonFileSource {
    path: PathBuf,
    lazy: bool,
}

impl JsonFileSource {
    pub fn new(path: PathBuf, lazy: bool) -> Self {
        Self { path, lazy }
    }

    /// The file path backing this source.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole record set.
    pub fn fetch_all(&self) -> Result<Vec<FlatRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        parse_records(&content)
    }
}

impl RecordSource for JsonFileSource {
    fn fetch_roots(&self) -> Result<Vec<FlatRecord>> {
        let records = self.fetch_all()?;
        if self.lazy {
            Ok(level_slice(&records, None))
        } else {
            Ok(records)
        }
    }

    fn fetch_children(&self, parent_path: &str) -> Result<Vec<FlatRecord>> {
        let records = self.fetch_all()?;
        Ok(level_slice(&records, Some(parent_path)))
    }
}

/// Parse record JSON: a bare array, or an object with a `records` or
/// `nodes` array.
pub fn parse_records(content: &str) -> Result<Vec<FlatRecord>> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            let inner = map
                .remove("records")
                .or_else(|| map.remove("nodes"))
                .ok_or_else(|| {
                    AppError::InvalidSource(
                        "expected an array of records or an object with a `records`/`nodes` array"
                            .into(),
                    )
                })?;
            Ok(serde_json::from_value(inner)?)
        }
        _ => Err(AppError::InvalidSource(
            "expected an array of records".into(),
        )),
    }
}

/// The immediate-child slice under `parent` (`None` = root level).
///
/// A leaf belongs to the slice of the folder at its own full path; every
/// record strictly below the level surfaces as one synthesized folder
/// record per distinct next segment. An explicit folder record at the
/// next level keeps its identity, replacing any synthesized stand-in.
pub fn level_slice(records: &[FlatRecord], parent: Option<&str>) -> Vec<FlatRecord> {
    let parent_segments: Vec<&str> = parent.map(path_segments).unwrap_or_default();
    let level = parent_segments.len();

    let mut out: Vec<FlatRecord> = Vec::new();
    let mut seen_folders: HashSet<String> = HashSet::new();

    for record in records {
        let segments = path_segments(&record.path);
        if segments.len() < level {
            continue;
        }
        if !parent_segments
            .iter()
            .zip(&segments)
            .all(|(a, b)| a == b)
        {
            continue;
        }
        let explicit_folder = record.is_folder == Some(true);

        if segments.len() == level {
            // A leaf whose full path equals the parent hangs directly
            // under it. At root level this also covers pathless records.
            if !explicit_folder && (level > 0 || segments.is_empty()) {
                out.push(record.clone());
            }
            continue;
        }

        let next = segments[..level + 1].join(".");
        if segments.len() == level + 1 && explicit_folder {
            if seen_folders.insert(next.clone()) {
                out.push(record.clone());
            } else if let Some(stand_in) = out
                .iter_mut()
                .find(|r| r.is_folder == Some(true) && path_segments(&r.path).join(".") == next)
            {
                *stand_in = record.clone();
            }
            continue;
        }

        if seen_folders.insert(next.clone()) {
            out.push(FlatRecord {
                id: format!("folder:{next}"),
                path: next.clone(),
                label: segments[level].to_string(),
                value_type: None,
                value: None,
                is_folder: Some(true),
            });
        }
    }

    out
}
