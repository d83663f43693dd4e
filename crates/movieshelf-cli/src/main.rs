use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use std::path::PathBuf;

use commands::{add, config, delete, filter, list, maintenance, migrate, show, sql, stats, update, Session};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "movieshelf")]
#[command(about = "MovieShelf - manage, filter, and analyze your movie collection")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter movies by attributes
    #[command(
        arg_required_else_help = true,
        long_about = "Filter the collection. Every option narrows the result further. Status, type and country accept their initials (e.g. -s c for completed). Genres are comma-separated; when no movie carries all of them exactly, partial tag matches are used instead."
    )]
    Filter(filter::FilterArgs),

    /// Add a new movie interactively
    #[command(long_about = "Prompt for every field of a new movie. Choices accept their initials, blank answers leave optional fields empty, and rating/watched date are skipped for movies still waiting to be watched.")]
    Add,

    /// Change fields of an existing movie
    #[command(long_about = "Update selected fields of a movie by id. Fields that are not given keep their value; use the --clear-* flags to empty optional fields.")]
    Update(update::UpdateArgs),

    /// Delete a movie
    Delete {
        /// Id of the movie
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// Show a single movie
    Show {
        /// Id of the movie
        id: i64,
    },

    /// Show statistics for the whole collection
    Stats,

    /// List the genres or countries in use
    List {
        #[arg(value_enum)]
        field: list::ListField,
    },

    /// Back up the active data file
    #[command(long_about = "Copy the data file of the configured backend into the backup directory under a timestamped name.")]
    Backup,

    /// Restore the active data file from a backup
    Restore {
        /// Backup file, as a path or a name inside the backup directory
        file: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// Compact the SQLite database
    Vacuum,

    /// Move the collection between CSV and SQLite
    Migrate {
        #[command(subcommand)]
        direction: MigrateCommands,

        /// Overwrite a non-empty target without asking
        #[arg(short, long, action = ArgAction::SetTrue, global = true)]
        yes: bool,
    },

    /// Run a saved SQL query by name
    #[command(long_about = "Run a query from the SQL directory. The name is matched exactly, then as a unique prefix, then by similarity.")]
    Sql {
        /// Script name (without .sql)
        #[arg(required_unless_present = "list")]
        name: Option<String>,

        /// Sort rows by this result column
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,

        /// Sort in descending order
        #[arg(long, action = ArgAction::SetTrue, requires = "sort")]
        desc: bool,

        /// List available scripts
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "name")]
        list: bool,
    },

    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum MigrateCommands {
    /// Replace the SQLite database with the CSV contents
    CsvToSqlite,
    /// Replace the CSV file with the SQLite contents
    SqliteToCsv,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let session = Session::load(cli.config.clone())?;
    logging::init_logging_with_config(cli.verbose, cli.quiet, &session.config.logging, session.log_file())
        .map_err(|e| eyre!("{}", e))?;
    session.warn_about_choices();

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Filter(args) => filter::run_filter(&session, args, &output),
        Commands::Add => add::run_add(&session, &output),
        Commands::Update(args) => update::run_update(&session, args, &output),
        Commands::Delete { id, yes } => delete::run_delete(&session, id, yes, &output),
        Commands::Show { id } => show::run_show(&session, id, &output),
        Commands::Stats => stats::run_stats(&session, &output),
        Commands::List { field } => list::run_list(&session, field, &output),
        Commands::Backup => maintenance::run_backup(&session, &output),
        Commands::Restore { file, yes } => maintenance::run_restore(&session, &file, yes, &output),
        Commands::Vacuum => maintenance::run_vacuum(&session, &output),
        Commands::Migrate { direction, yes } => migrate::run_migrate(&session, direction, yes, &output),
        Commands::Sql { name, sort, desc, list } => {
            if list {
                sql::run_list(&session, &output)
            } else {
                sql::run_sql(&session, name.as_deref().unwrap_or_default(), sort.as_deref(), desc, &output)
            }
        }
        Commands::Config { cmd } => config::run_config(&session, cmd, &output),
    }
}
