use super::prompts::prompt_yes_no;
use super::Session;
use crate::output::Output;
use crate::MigrateCommands;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use movie_catalog_core::MovieStore;
use movie_catalog_store::{copy_collection, MigrationReport, StoreError};
use serde_json::json;
use std::io::IsTerminal;
use tracing::info;

fn is_interactive() -> bool {
    std::io::stderr().is_terminal()
}

fn progress_bar(output: &Output) -> ProgressBar {
    if output.is_json() || output.is_quiet() || !is_interactive() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    bar.set_style(style);
    bar
}

fn migrate<S, T>(source: &S, target: &mut T, yes: bool, output: &Output) -> Result<Option<MigrationReport>>
where
    S: MovieStore<Error = StoreError>,
    T: MovieStore<Error = StoreError>,
{
    let existing = target.count()?;
    if existing > 0
        && !yes
        && !prompt_yes_no(
            &format!(
                "The {} store already holds {} movies. Replace them?",
                target.backend_name(),
                existing
            ),
            Some(false),
        )?
    {
        return Ok(None);
    }

    let bar = progress_bar(output);
    bar.set_message(format!("{} -> {}", source.backend_name(), target.backend_name()));
    let report = copy_collection(source, target, &mut |written, total| {
        if bar.length() != Some(total as u64) {
            bar.set_length(total as u64);
        }
        bar.set_position(written as u64);
    })?;
    bar.finish_and_clear();
    Ok(Some(report))
}

pub fn run_migrate(session: &Session, direction: MigrateCommands, yes: bool, output: &Output) -> Result<()> {
    let (from, to, report) = match direction {
        MigrateCommands::CsvToSqlite => {
            let source = session.open_csv();
            let mut target = session.open_sqlite()?;
            ("csv", "sqlite", migrate(&source, &mut target, yes, output)?)
        }
        MigrateCommands::SqliteToCsv => {
            let source = session.open_sqlite()?;
            let mut target = session.open_csv();
            ("sqlite", "csv", migrate(&source, &mut target, yes, output)?)
        }
    };

    let Some(report) = report else {
        output.info("Cancelled");
        return Ok(());
    };
    info!(from, to, count = report.count, "Migration finished");

    if output.is_json() {
        output.data(&json!({
            "from": from,
            "to": to,
            "count": report.count,
            "elapsed_ms": report.elapsed.as_millis(),
        }));
    } else {
        output.success(format!(
            "Migrated {} movies from {} to {} in {:.2}s",
            report.count,
            from,
            to,
            report.elapsed.as_secs_f64()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use movie_catalog_models::{MediaType, NewMovie, Status};
    use movie_catalog_store::{CsvStore, SqliteStore};

    #[test]
    fn test_migrate_into_empty_target_needs_no_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvStore::new(dir.path().join("movies.csv"));
        source
            .create(NewMovie::new("Paprika", Status::Completed, MediaType::Movie))
            .unwrap();
        source
            .create(NewMovie::new("Monster", Status::Waiting, MediaType::Series))
            .unwrap();

        let mut target = SqliteStore::open(dir.path().join("movies.db")).unwrap();
        let output = Output::new(OutputFormat::Json, true);
        let report = migrate(&source, &mut target, false, &output).unwrap().unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(target.load().unwrap(), source.load().unwrap());
    }
}
