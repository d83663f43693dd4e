//! Backup, restore and compaction of the data files.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacuumReport {
    pub before: u64,
    pub after: u64,
}

impl VacuumReport {
    pub fn reclaimed(&self) -> u64 {
        self.before.saturating_sub(self.after)
    }
}

/// Copy `source` into `backup_dir` under a timestamped name
///
/// `movies.db` becomes `movies-20250101-120000.db`.
pub fn backup_file(source: &Path, backup_dir: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(StoreError::MissingFile(source.to_path_buf()));
    }
    std::fs::create_dir_all(backup_dir)?;

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("data");
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let mut name = format!("{stem}-{timestamp}");
    if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
        name = format!("{name}.{ext}");
    }
    let target = backup_dir.join(name);

    let bytes = std::fs::copy(source, &target)?;
    info!(from = %source.display(), to = %target.display(), bytes, "Backed up data file");
    Ok(target)
}

/// Put a backup back in place of `target`
///
/// The copy goes through a temporary file so an interrupted restore leaves
/// the current data untouched.
pub fn restore_file(backup: &Path, target: &Path) -> Result<()> {
    if !backup.exists() {
        return Err(StoreError::MissingFile(backup.to_path_buf()));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = target.with_extension("restore.tmp");
    std::fs::copy(backup, &temp_path)?;
    std::fs::rename(&temp_path, target)?;
    info!(from = %backup.display(), to = %target.display(), "Restored data file");
    Ok(())
}

/// Backups in `backup_dir` whose name starts with `stem`, oldest first
pub fn list_backups(backup_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }
    let prefix = format!("{stem}-");
    let mut backups: Vec<PathBuf> = std::fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();
    // timestamps sort lexically
    backups.sort();
    Ok(backups)
}

/// Rebuild the database file, returning its size before and after
pub fn vacuum(store: &SqliteStore) -> Result<VacuumReport> {
    let Some(path) = store.path() else {
        warn!("Vacuum requested on an in-memory database");
        store.connection().execute_batch("VACUUM;")?;
        return Ok(VacuumReport { before: 0, after: 0 });
    };

    let before = file_size(path)?;
    store.connection().execute_batch("VACUUM;")?;
    let after = file_size(path)?;

    info!(before, after, "Vacuumed database");
    Ok(VacuumReport { before, after })
}

pub fn file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

pub fn last_modified(path: &Path) -> Result<String> {
    let modified: DateTime<Local> = std::fs::metadata(path)?.modified()?.into();
    Ok(modified.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Human readable size, e.g. `1.5 KB`
pub fn format_bytes(size: u64) -> String {
    let mut value = size as f64;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}
