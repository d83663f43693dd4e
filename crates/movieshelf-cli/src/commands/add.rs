use super::prompts::{prompt_parsed, prompt_string};
use super::Session;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use movie_catalog_core::{genre, validate};
use movie_catalog_models::NewMovie;
use tracing::info;

pub fn run_add(session: &Session, output: &Output) -> Result<()> {
    let movie = prompt_new_movie(session, output)?;

    let mut store = session.open_store()?;
    let id = store.create(movie)?;
    session.sync_mirror(&*store)?;
    info!(id, backend = store.backend_name(), "Added movie");

    match store.get(id)? {
        Some(movie) if output.is_json() => output.data(&movie),
        Some(movie) => {
            output.success(format!("Added '{}' with id {}", movie.name, id));
            output.table(&render::movie_detail(&movie));
        }
        None => output.success(format!("Added movie with id {}", id)),
    }
    Ok(())
}

fn prompt_new_movie(session: &Session, output: &Output) -> Result<NewMovie> {
    let name = prompt_parsed("Name", None, output, validate::parse_name)?;
    let year = prompt_parsed("Year (blank to skip)", None, output, validate::parse_year)?;
    let status = prompt_parsed("Status [waiting/completed/dropped]", Some("waiting"), output, |s| {
        session.parse_status(s)
    })?;
    let media_type = prompt_parsed("Type [movie/series]", None, output, |s| session.parse_type(s))?;

    let countries = session.config.choices.countries.join("/");
    let country = prompt_parsed(&format!("Country [{}] (blank to skip)", countries), None, output, |s| {
        session.parse_country(s)
    })?;

    let genres = genre::parse(&prompt_string("Genres, comma separated (blank to skip)", None)?);

    // only watched movies carry a rating and a watch date
    let (rating, watched_date) = if status.is_watched() {
        (
            prompt_parsed("Rating 1-10 (blank to skip)", None, output, validate::parse_rating)?,
            prompt_parsed(
                "Watched date YYYY[-MM[-DD]] (blank to skip)",
                None,
                output,
                validate::parse_watched_date,
            )?,
        )
    } else {
        (None, None)
    };

    let note = validate::optional_text(&prompt_string("Note (blank to skip)", None)?);

    Ok(NewMovie {
        year,
        country,
        genres,
        rating,
        watched_date,
        note,
        ..NewMovie::new(name, status, media_type)
    })
}
