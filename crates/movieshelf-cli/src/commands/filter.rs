use super::Session;
use crate::output::Output;
use crate::render;
use clap::{ArgAction, Args};
use color_eyre::Result;
use movie_catalog_core::{genre, sort_by_column, summarize, validate, Column, FilterConfig, SortDirection};
use serde_json::json;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Part of the name (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Release year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Status or its initial
    #[arg(short, long)]
    pub status: Option<String>,

    /// Type or its initial
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub movie_type: Option<String>,

    /// Country or its initial
    #[arg(short, long)]
    pub country: Option<String>,

    /// Comma-separated genres, all of which must be present
    #[arg(short, long)]
    pub genres: Option<String>,

    /// Rating, pulled into 1-10
    #[arg(short, long, value_parser = parse_rating_arg)]
    pub rating: Option<u8>,

    /// Year (or year-month) the movie was watched in
    #[arg(short, long, value_name = "YEAR")]
    pub watched_year: Option<String>,

    /// Text the note must contain (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub note_contains: Option<String>,

    /// Sort by this column (name or initial)
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "asc")]
    pub desc: bool,

    /// Sort ascending
    #[arg(long, action = ArgAction::SetTrue)]
    pub asc: bool,

    /// Print per-column counts for the result
    #[arg(long, action = ArgAction::SetTrue)]
    pub stats: bool,

    /// Include the note column
    #[arg(long, action = ArgAction::SetTrue)]
    pub note: bool,
}

fn parse_rating_arg(input: &str) -> Result<u8, String> {
    match validate::parse_rating(input) {
        Ok(Some(rating)) => Ok(rating),
        Ok(None) => Err("rating must not be empty".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

impl FilterArgs {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            name: self.name.clone(),
            year: self.year,
            status: self.status.clone(),
            media_type: self.movie_type.clone(),
            country: self.country.clone(),
            genres: self.genres.as_deref().map(genre::parse_ordered),
            rating: self.rating,
            watched_year: self.watched_year.clone(),
            note_contains: self.note_contains.clone(),
        }
    }

    /// Explicit flags win over the column's natural direction
    fn direction(&self, column: Column) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else if self.asc {
            SortDirection::Ascending
        } else {
            column.default_direction()
        }
    }

    /// Column and direction to sort by, if `--sort` was given
    pub fn sort_order(&self) -> Result<Option<(Column, SortDirection)>> {
        let Some(input) = self.sort.as_deref() else {
            return Ok(None);
        };
        let column = Column::resolve(input)?;
        Ok(Some((column, self.direction(column))))
    }
}

pub fn run_filter(session: &Session, args: FilterArgs, output: &Output) -> Result<()> {
    let config = args.filter_config();
    let sort_order = args.sort_order()?;

    let store = session.open_store()?;
    let collection = store.load()?;

    let mut movies = session.engine().apply(&collection, &config);
    if let Some((column, direction)) = sort_order {
        movies = sort_by_column(movies, column, direction);
    }
    info!(matched = movies.len(), total = collection.len(), "Filtered collection");

    let stats = args
        .stats
        .then(|| summarize(&movies, &config.pinned_columns()));

    if output.is_json() {
        output.data(&json!({
            "total": movies.len(),
            "movies": movies,
            "stats": stats,
        }));
        return Ok(());
    }

    if movies.is_empty() {
        output.info("No data.");
        return Ok(());
    }

    output.table(&render::movie_table(&movies, args.note));
    output.line(format!("Total: {}", movies.len()));
    if let Some(stats) = stats {
        for line in render::stats_lines(&stats, false) {
            output.line(line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_config_from_args() {
        let args = FilterArgs {
            status: Some("c".to_string()),
            genres: Some("Drama, sci-fi,".to_string()),
            rating: Some(9),
            ..Default::default()
        };
        let config = args.filter_config();
        assert_eq!(config.status.as_deref(), Some("c"));
        assert_eq!(config.genres, Some(vec!["Drama".to_string(), "sci-fi".to_string()]));
        assert_eq!(config.rating, Some(9));
        assert!(config.is_active());
    }

    #[test]
    fn test_sort_order_uses_column_default() {
        let args = FilterArgs {
            sort: Some("r".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.sort_order().unwrap(),
            Some((Column::Rating, SortDirection::Descending))
        );

        let args = FilterArgs {
            sort: Some("rating".to_string()),
            asc: true,
            ..Default::default()
        };
        assert_eq!(
            args.sort_order().unwrap(),
            Some((Column::Rating, SortDirection::Ascending))
        );
    }

    #[test]
    fn test_unknown_sort_column() {
        let args = FilterArgs {
            sort: Some("budget".to_string()),
            ..Default::default()
        };
        assert!(args.sort_order().is_err());
    }

    #[test]
    fn test_rating_argument_is_clamped() {
        assert_eq!(parse_rating_arg("15"), Ok(10));
        assert_eq!(parse_rating_arg("0"), Ok(1));
        assert!(parse_rating_arg("").is_err());
        assert!(parse_rating_arg("nine").is_err());
    }
}
