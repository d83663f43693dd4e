//! Terminal tables for movies, query results and statistics.

use comfy_table::{presets, Attribute, Cell, Color, Table};
use movie_catalog_core::{CollectionStats, Column};
use movie_catalog_models::Movie;
use movie_catalog_store::QueryResult;

/// Columns of the movie table, in display order
const MOVIE_COLUMNS: [Column; 10] = Column::ALL;

fn header(names: impl IntoIterator<Item = impl ToString>) -> Vec<Cell> {
    names
        .into_iter()
        .map(|name| {
            Cell::new(name.to_string())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        })
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Display value of one movie field, empty when missing
pub fn cell_text(movie: &Movie, column: Column) -> String {
    column.cell(movie).to_string()
}

/// Columns that hold a value in at least one movie
///
/// `note` is left out unless `show_note` is set.
pub fn visible_columns(movies: &[Movie], show_note: bool) -> Vec<Column> {
    MOVIE_COLUMNS
        .into_iter()
        .filter(|&column| show_note || column != Column::Note)
        .filter(|&column| movies.iter().any(|m| !cell_text(m, column).is_empty()))
        .collect()
}

pub fn movie_table(movies: &[Movie], show_note: bool) -> Table {
    let columns = visible_columns(movies, show_note);
    let mut table = new_table();
    table.set_header(header(columns.iter().map(Column::as_str)));
    for movie in movies {
        table.add_row(columns.iter().map(|&column| cell_text(movie, column)));
    }
    table
}

/// Field/value table of a single movie
pub fn movie_detail(movie: &Movie) -> Table {
    let mut table = new_table();
    for column in MOVIE_COLUMNS {
        table.add_row(vec![
            Cell::new(column.as_str()).add_attribute(Attribute::Bold),
            Cell::new(cell_text(movie, column)),
        ]);
    }
    table
}

pub fn query_table(result: &QueryResult) -> Table {
    let mut table = new_table();
    table.set_header(header(&result.columns));
    for row in &result.rows {
        table.add_row(row.iter().map(ToString::to_string));
    }
    table
}

/// `Status` / ` - completed: 3` lines, the way the summary is printed
pub fn stats_lines(stats: &CollectionStats, with_total: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if with_total {
        lines.push(format!("Total: {}", stats.total));
    }
    for column in &stats.columns {
        let mut title = column.column.to_string();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        lines.push(title);
        lines.extend(column.counts.iter().map(|c| format!(" - {}: {}", c.value, c.count)));
    }
    lines
}
