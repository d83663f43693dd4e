use super::Session;
use crate::output::Output;
use crate::render;
use clap::{ArgAction, Args};
use color_eyre::Result;
use movie_catalog_core::{genre, validate, CatalogError};
use movie_catalog_models::MoviePatch;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Id of the movie
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New release year
    #[arg(long, conflicts_with = "clear_year")]
    pub year: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_year: bool,

    /// New status or its initial
    #[arg(long)]
    pub status: Option<String>,

    /// New type or its initial
    #[arg(long = "type", value_name = "TYPE")]
    pub movie_type: Option<String>,

    /// New country or its initial
    #[arg(long, conflicts_with = "clear_country")]
    pub country: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_country: bool,

    /// Replace the genres with this comma-separated list (empty clears them)
    #[arg(long)]
    pub genres: Option<String>,

    /// New rating, pulled into 1-10
    #[arg(long, conflicts_with = "clear_rating")]
    pub rating: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_rating: bool,

    /// New watched date (YYYY, YYYY-MM or YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_watched_date")]
    pub watched_date: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_watched_date: bool,

    /// New note
    #[arg(long, conflicts_with = "clear_note")]
    pub note: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_note: bool,
}

/// Turn a value flag and its `--clear-*` twin into a patch field
///
/// Blank values clear the field as well.
fn nullable<T>(
    value: Option<&str>,
    clear: bool,
    parse: impl Fn(&str) -> movie_catalog_core::Result<Option<T>>,
) -> movie_catalog_core::Result<Option<Option<T>>> {
    if clear {
        return Ok(Some(None));
    }
    value.map(parse).transpose()
}

/// Validate every given flag into a patch, failing on the first bad value
pub fn build_patch(session: &Session, args: &UpdateArgs) -> movie_catalog_core::Result<MoviePatch> {
    Ok(MoviePatch {
        name: args.name.as_deref().map(validate::parse_name).transpose()?,
        year: nullable(args.year.as_deref(), args.clear_year, validate::parse_year)?,
        status: args.status.as_deref().map(|s| session.parse_status(s)).transpose()?,
        media_type: args.movie_type.as_deref().map(|t| session.parse_type(t)).transpose()?,
        country: nullable(args.country.as_deref(), args.clear_country, |c| session.parse_country(c))?,
        genres: args.genres.as_deref().map(genre::parse),
        rating: nullable(args.rating.as_deref(), args.clear_rating, validate::parse_rating)?,
        watched_date: nullable(
            args.watched_date.as_deref(),
            args.clear_watched_date,
            validate::parse_watched_date,
        )?,
        note: nullable(args.note.as_deref(), args.clear_note, |n| Ok(validate::optional_text(n)))?,
    })
}

pub fn run_update(session: &Session, args: UpdateArgs, output: &Output) -> Result<()> {
    let patch = build_patch(session, &args)?;
    if patch.is_empty() {
        output.warn("Nothing to update");
        return Ok(());
    }

    let mut store = session.open_store()?;
    if store.get(args.id)?.is_none() {
        return Err(CatalogError::NotFound { id: args.id }.into());
    }

    let movie = store.update(args.id, &patch)?;
    session.sync_mirror(&*store)?;
    info!(id = movie.id, fields = ?patch.changed_fields(), "Updated movie");

    if output.is_json() {
        output.data(&movie);
    } else {
        output.success(format!("Updated {}: {}", movie.id, patch.changed_fields().join(", ")));
        output.table(&render::movie_detail(&movie));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_session;
    use movie_catalog_models::Status;

    fn session() -> Session {
        test_session(std::path::Path::new("movieshelf-test"))
    }

    #[test]
    fn test_no_flags_is_empty_patch() {
        let args = UpdateArgs { id: 1, ..Default::default() };
        assert!(build_patch(&session(), &args).unwrap().is_empty());
    }

    #[test]
    fn test_values_are_validated() {
        let args = UpdateArgs {
            id: 1,
            status: Some("c".to_string()),
            rating: Some("12".to_string()),
            watched_date: Some("2024-3".to_string()),
            genres: Some("drama, war".to_string()),
            ..Default::default()
        };
        let patch = build_patch(&session(), &args).unwrap();
        assert_eq!(patch.status, Some(Status::Completed));
        assert_eq!(patch.rating, Some(Some(10)));
        assert_eq!(patch.watched_date, Some(Some("2024-03".to_string())));
        assert_eq!(patch.genres.as_ref().map(|g| g.len()), Some(2));
        assert_eq!(patch.changed_fields(), vec!["status", "genres", "rating", "watched_date"]);
    }

    #[test]
    fn test_clear_flags() {
        let args = UpdateArgs {
            id: 1,
            clear_country: true,
            clear_note: true,
            note: None,
            ..Default::default()
        };
        let patch = build_patch(&session(), &args).unwrap();
        assert_eq!(patch.country, Some(None));
        assert_eq!(patch.note, Some(None));
        assert_eq!(patch.year, None);
    }

    #[test]
    fn test_invalid_values_fail() {
        let bad_year = UpdateArgs {
            id: 1,
            year: Some("1850".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_patch(&session(), &bad_year),
            Err(CatalogError::OutOfRange { .. })
        ));

        let bad_date = UpdateArgs {
            id: 1,
            watched_date: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_patch(&session(), &bad_date),
            Err(CatalogError::MalformedDate { .. })
        ));

        let blank_name = UpdateArgs {
            id: 1,
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(build_patch(&session(), &blank_name).is_err());
    }
}
