use std::fs;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Collection;

/// On-disk dataset snapshot: the collection plus a generation stamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetFile {
    pub generated_at: DateTime<Utc>,
    pub collection: Collection,
}

/// Conventional file name for a dataset of `entries` records.
pub fn dataset_path(entries: usize) -> PathBuf {
    PathBuf::from(format!("data_{}.json", entries))
}

pub fn save(path: &Path, collection: &Collection) -> Result<()> {
    let file = DatasetFile {
        generated_at: Utc::now(),
        collection: collection.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json)?;
    info!(path = %path.display(), entries = collection.len(), "dataset saved");
    Ok(())
}

pub fn load(path: &Path) -> Result<Collection> {
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::Io,
            format!("dataset file {} not found; generate it first", path.display()),
        ));
    }
    let json = fs::read_to_string(path)?;
    let file: DatasetFile = serde_json::from_str(&json)?;
    info!(path = %path.display(), entries = file.collection.len(), "dataset loaded");
    Ok(file.collection)
}
