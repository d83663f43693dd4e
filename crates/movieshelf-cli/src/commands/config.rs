use super::Session;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use movie_catalog_config::Config;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(session: &Session, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(session, output),
        ConfigCommands::Init { force } => init_config(&session.config_file, force, output),
        ConfigCommands::Path => {
            if output.is_json() {
                output.data(&json!({ "config_file": session.config_file }));
            } else {
                output.line(session.config_file.display().to_string());
            }
            Ok(())
        }
    }
}

fn section(title: &str, rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

fn flag(enabled: bool) -> String {
    if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn show_config(session: &Session, output: &Output) -> Result<()> {
    let config = &session.config;
    let paths = &session.paths;

    if output.is_json() {
        output.data(&json!({
            "config_file": session.config_file,
            "exists": session.config_file.exists(),
            "config": config,
            "resolved": {
                "database": config.database_path(paths),
                "csv": config.csv_path(paths),
                "backup_dir": config.backup_dir(paths),
                "sql_dir": config.sql_dir(paths),
                "log_file": config.log_file(paths),
            },
        }));
        return Ok(());
    }

    if !session.config_file.exists() {
        output.warn(format!(
            "No config file at {}, showing defaults (create one with 'movieshelf config init')",
            session.config_file.display()
        ));
    }
    output.line(format!("{} {}", "Config file:".bold(), session.config_file.display()));

    let storage = &config.storage;
    output.table(&section(
        "Storage",
        vec![
            ("Backend", storage.backend.to_string()),
            ("Database", config.database_path(paths).display().to_string()),
            ("CSV", config.csv_path(paths).display().to_string()),
            ("Mirror CSV", flag(storage.mirror_csv)),
            ("Backups", config.backup_dir(paths).display().to_string()),
            ("SQL scripts", config.sql_dir(paths).display().to_string()),
        ],
    ));
    output.table(&section(
        "Choices",
        vec![("Countries", config.choices.countries.join(", "))],
    ));
    output.table(&section(
        "Logging",
        vec![
            ("Level", config.logging.level.clone()),
            ("JSON", flag(config.logging.json)),
            (
                "File",
                config
                    .log_file(paths)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "stderr".to_string()),
            ),
        ],
    ));
    Ok(())
}

fn init_config(config_file: &Path, force: bool, output: &Output) -> Result<()> {
    if config_file.exists() && !force {
        return Err(eyre!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
    }

    Config::default()
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    if output.is_json() {
        output.data(&json!({ "config_file": config_file, "created": true }));
    } else {
        output.success(format!("Wrote default config to {}", config_file.display()));
    }
    Ok(())
}
