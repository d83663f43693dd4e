use super::Session;
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use movie_catalog_core::{ChoiceSet, MatchType, SortDirection};
use movie_catalog_store::script::list_scripts;
use movie_catalog_store::{resolve_script, run_script, QueryResult};
use serde_json::json;
use tracing::info;

pub fn run_list(session: &Session, output: &Output) -> Result<()> {
    let dir = session.config.sql_dir(&session.paths);
    let scripts = list_scripts(&dir)?;

    if output.is_json() {
        output.data(&json!({ "dir": dir, "scripts": scripts }));
        return Ok(());
    }
    if scripts.is_empty() {
        output.info(format!("No SQL scripts in {}", dir.display()));
        return Ok(());
    }
    for name in &scripts {
        output.line(name);
    }
    Ok(())
}

/// Index of the result column `input` names, by full name or initial
fn sort_column(result: &QueryResult, input: &str) -> Result<usize> {
    let set = ChoiceSet::new(result.columns.iter().cloned());
    let name = set.resolve_strict(input)?;
    result
        .column_index(name)
        .ok_or_else(|| eyre!("Column not in result: {}", name))
}

pub fn run_sql(session: &Session, name: &str, sort: Option<&str>, desc: bool, output: &Output) -> Result<()> {
    let dir = session.config.sql_dir(&session.paths);
    let script = resolve_script(&dir, name)?;
    if script.match_type != MatchType::Exact {
        output.info(format!("Running '{}' ({} match)", script.name, script.match_type));
    }

    let store = session.open_sqlite()?;
    let mut result = run_script(store.connection(), &script.path)?;
    if let Some(sort) = sort {
        let direction = if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        result.sort_by(sort_column(&result, sort)?, direction);
    }
    info!(script = %script.name, rows = result.rows.len(), "Ran SQL script");

    if output.is_json() {
        output.data(&json!({
            "script": script.name,
            "match": script.match_type.to_string(),
            "columns": result.columns,
            "rows": result.rows,
        }));
        return Ok(());
    }
    if result.rows.is_empty() {
        output.info("No data.");
        return Ok(());
    }
    output.table(&render::query_table(&result));
    output.line(format!("Rows: {}", result.rows.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_catalog_core::CellValue;

    fn result() -> QueryResult {
        QueryResult {
            columns: vec!["country".to_string(), "count".to_string(), "avg_rating".to_string()],
            rows: vec![vec![CellValue::Text("Japan".to_string()), CellValue::Int(3), CellValue::Null]],
        }
    }

    #[test]
    fn test_sort_column_by_name_or_initial() {
        let result = result();
        assert_eq!(sort_column(&result, "COUNT").unwrap(), 1);
        assert_eq!(sort_column(&result, "a").unwrap(), 2);
        // first registered column owns the initial
        assert_eq!(sort_column(&result, "c").unwrap(), 0);
        assert!(sort_column(&result, "genre").is_err());
    }
}
