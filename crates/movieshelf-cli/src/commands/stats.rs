use super::Session;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use movie_catalog_core::summarize;

pub fn run_stats(session: &Session, output: &Output) -> Result<()> {
    let store = session.open_store()?;
    let movies = store.load()?;
    let stats = summarize(&movies, &[]);

    if output.is_json() {
        output.data(&stats);
        return Ok(());
    }
    if movies.is_empty() {
        output.info("No data.");
        return Ok(());
    }
    for line in render::stats_lines(&stats, true) {
        output.line(line);
    }
    Ok(())
}
