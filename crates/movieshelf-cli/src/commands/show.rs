use super::Session;
use crate::output::Output;
use crate::render;
use color_eyre::Result;
use movie_catalog_core::CatalogError;

pub fn run_show(session: &Session, id: i64, output: &Output) -> Result<()> {
    let store = session.open_store()?;
    let movie = store.get(id)?.ok_or(CatalogError::NotFound { id })?;

    if output.is_json() {
        output.data(&movie);
    } else {
        output.table(&render::movie_detail(&movie));
    }
    Ok(())
}
