//! Local data directory and collection snapshots written by prebuild runs.

use crate::collection::Collection;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn get_data_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("dev", "tarkov", "tarkov-data")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(project_dirs.data_dir().to_path_buf())
}

/// File name of a collection snapshot, e.g. `barters_en.json`.
pub fn snapshot_file_name(collection: Collection, locale: &str) -> String {
    format!("{}_{}.json", collection.name(), locale)
}

/// Writes `records` as pretty-printed JSON into `dir`, creating it if
/// needed. Returns the written path.
pub fn write_snapshot(
    dir: &Path,
    collection: Collection,
    locale: &str,
    records: &[Value],
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(snapshot_file_name(collection, locale));
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

/// Reads a snapshot previously written by [`write_snapshot`].
pub fn load_snapshot(dir: &Path, collection: Collection, locale: &str) -> Result<Vec<Value>> {
    let path = dir.join(snapshot_file_name(collection, locale));
    if !path.exists() {
        anyhow::bail!("Snapshot not found: {}", path.display());
    }
    let file = fs::File::open(&path)?;
    let reader = io::BufReader::new(file);
    let records: Vec<Value> = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(records)
}
