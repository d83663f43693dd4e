use super::prompts::prompt_yes_no;
use super::Session;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movie_catalog_store::maintenance::{file_size, last_modified, list_backups};
use movie_catalog_store::{backup_file, format_bytes, restore_file, vacuum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run_backup(session: &Session, output: &Output) -> Result<()> {
    let source = session.config.active_data_path(&session.paths);
    let backup_dir = session.config.backup_dir(&session.paths);

    let target = backup_file(&source, &backup_dir)
        .wrap_err_with(|| format!("Failed to back up {}", source.display()))?;
    let size = file_size(&target)?;

    if output.is_json() {
        output.data(&json!({
            "source": source,
            "backup": target,
            "bytes": size,
        }));
    } else {
        output.success(format!("Backed up to {} ({})", target.display(), format_bytes(size)));
    }
    Ok(())
}

/// A bare name is looked up in the backup directory when it is not a path
/// to an existing file
fn locate_backup(file: &Path, backup_dir: &Path) -> Option<PathBuf> {
    if file.is_file() {
        return Some(file.to_path_buf());
    }
    let candidate = backup_dir.join(file);
    candidate.is_file().then_some(candidate)
}

pub fn run_restore(session: &Session, file: &Path, yes: bool, output: &Output) -> Result<()> {
    let target = session.config.active_data_path(&session.paths);
    let backup_dir = session.config.backup_dir(&session.paths);

    let Some(backup) = locate_backup(file, &backup_dir) else {
        let stem = target.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let available = list_backups(&backup_dir, stem)?;
        if !available.is_empty() {
            output.info(format!("Backups in {}:", backup_dir.display()));
            for path in &available {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                output.line(format!("  {}  ({})", name, last_modified(path)?));
            }
        }
        return Err(eyre!("Backup not found: {}", file.display()));
    };

    if backup.extension() != target.extension() {
        output.warn(format!(
            "{} does not look like a {} backup",
            backup.display(),
            session.config.storage.backend
        ));
    }

    if !yes
        && target.exists()
        && !prompt_yes_no(
            &format!("Replace {} with {}?", target.display(), backup.display()),
            Some(false),
        )?
    {
        output.info("Cancelled");
        return Ok(());
    }

    restore_file(&backup, &target).wrap_err_with(|| format!("Failed to restore {}", backup.display()))?;

    let store = session.open_store()?;
    session.sync_mirror(&*store)?;
    let count = store.count()?;
    info!(backup = %backup.display(), count, "Restore complete");

    if output.is_json() {
        output.data(&json!({
            "backup": backup,
            "target": target,
            "count": count,
        }));
    } else {
        output.success(format!("Restored {} movies from {}", count, backup.display()));
    }
    Ok(())
}

pub fn run_vacuum(session: &Session, output: &Output) -> Result<()> {
    let store = session.open_sqlite()?;
    let report = vacuum(&store)?;

    if output.is_json() {
        output.data(&json!({
            "before": report.before,
            "after": report.after,
            "reclaimed": report.reclaimed(),
        }));
    } else {
        output.success(format!(
            "Vacuumed database: {} -> {} ({} reclaimed)",
            format_bytes(report.before),
            format_bytes(report.after),
            format_bytes(report.reclaimed())
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_backup_in_backup_dir() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("movies-20250101-120000.db");
        std::fs::write(&backup, b"data").unwrap();

        assert_eq!(
            locate_backup(Path::new("movies-20250101-120000.db"), dir.path()),
            Some(backup.clone())
        );
        assert_eq!(locate_backup(&backup, Path::new("elsewhere")), Some(backup));
        assert_eq!(locate_backup(Path::new("missing.db"), dir.path()), None);
    }
}
