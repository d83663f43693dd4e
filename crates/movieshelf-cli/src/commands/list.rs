use super::Session;
use crate::output::Output;
use clap::ValueEnum;
use color_eyre::Result;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListField {
    Genres,
    Countries,
}

impl ListField {
    fn as_str(self) -> &'static str {
        match self {
            ListField::Genres => "genres",
            ListField::Countries => "countries",
        }
    }
}

/// Distinct values of a field across the collection, sorted
pub fn run_list(session: &Session, field: ListField, output: &Output) -> Result<()> {
    let store = session.open_store()?;
    let values = match field {
        ListField::Genres => store.genres()?,
        ListField::Countries => store.countries()?,
    };

    if output.is_json() {
        output.data(&json!({ field.as_str(): values }));
        return Ok(());
    }
    if values.is_empty() {
        output.info(format!("No {} recorded", field.as_str()));
        return Ok(());
    }
    for value in &values {
        output.line(value);
    }
    Ok(())
}
