use super::prompts::prompt_yes_no;
use super::Session;
use crate::output::Output;
use color_eyre::Result;
use movie_catalog_core::CatalogError;
use tracing::info;

pub fn run_delete(session: &Session, id: i64, yes: bool, output: &Output) -> Result<()> {
    let mut store = session.open_store()?;
    let Some(movie) = store.get(id)? else {
        return Err(CatalogError::NotFound { id }.into());
    };

    if !yes && !prompt_yes_no(&format!("Delete '{}' ({})?", movie.name, id), Some(false))? {
        output.info("Cancelled");
        return Ok(());
    }

    let removed = store.delete(id)?;
    session.sync_mirror(&*store)?;
    info!(id, name = %removed.name, "Deleted movie");

    if output.is_json() {
        output.data(&removed);
    } else {
        output.success(format!("Deleted '{}' ({})", removed.name, id));
    }
    Ok(())
}
