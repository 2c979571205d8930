//! Command-line front end for the derived-query compiler.
#![forbid(unsafe_code)]

mod config;
mod ui;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use derived_aql::query::{
    assembler,
    ast::{Direction, Order, PartTree, Sort},
    errors::CompileErrorWithCode,
    Argument, CompiledQuery, DerivedQueryCompiler,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::ui::{Theme, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "aqlc",
    version,
    about = "Compile derived repository queries into AQL",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "AQLC_CONFIG",
        value_name = "FILE",
        help = "Entity metadata file (TOML)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = ThemeArg::Auto,
        help = "Color theme for text output"
    )]
    theme: ThemeArg,

    #[arg(long, global = true, help = "Suppress decorations in text output")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a request file (`-` for stdin) into query text and bind variables.
    Compile {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        #[arg(long, help = "Entity to compile against (defaults to default_entity)")]
        entity: Option<String>,
    },
    /// Render a sort clause from `property[:asc|:desc]` keys.
    Sort {
        #[arg(value_name = "KEY")]
        keys: Vec<String>,
    },
    /// List entities defined in the config.
    Entities,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
    Plain,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Plain => Theme::Plain,
        }
    }
}

/// Request file accepted by `aqlc compile`.
#[derive(Debug, Deserialize)]
struct CompileRequest {
    tree: PartTree,
    #[serde(default)]
    arguments: Vec<Argument>,
    #[serde(default)]
    sort: Option<Sort>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AQLC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ui = Ui::new(cli.theme.into(), cli.quiet);

    match cli.command {
        Command::Compile { request, entity } => {
            let config = CliConfig::load(cli.config)?;
            if config.path().map_or(true, |path| !path.exists()) {
                ui.warn("no entity config found; pass --config or set AQLC_CONFIG");
            }
            let entity = config.resolve_entity(entity.as_deref())?;
            let request = read_request(&request)?;
            let metadata = config.metadata();
            let compiled = DerivedQueryCompiler::new(&metadata, entity.as_str(), request.arguments)
                .and_then(|compiler| compiler.compile(&request.tree, request.sort.as_ref()))
                .map_err(|err| CompileErrorWithCode(&err).to_string())?;
            emit(cli.format, &compiled, || print_compiled_text(&ui, &compiled))?;
        }
        Command::Sort { keys } => {
            let sort = parse_sort(&keys)?;
            let clause = assembler::sort_clause(Some(&sort));
            emit(cli.format, &clause, || ui.query(clause.trim_start()))?;
        }
        Command::Entities => {
            let config = CliConfig::load(cli.config)?;
            let rows: Vec<EntityRow> = config
                .entities()
                .map(|(name, collection, properties)| EntityRow {
                    name: name.to_string(),
                    collection: collection.to_string(),
                    properties,
                    default: config.default_entity() == Some(name),
                })
                .collect();
            emit(cli.format, &rows, || {
                for row in &rows {
                    ui.entity(&row.name, &row.collection, row.properties, row.default);
                }
            })?;
        }
    }

    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct EntityRow {
    name: String,
    collection: String,
    properties: usize,
    default: bool,
}

fn read_request(path: &Path) -> Result<CompileRequest, Box<dyn Error>> {
    let contents = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        fs::read_to_string(path)
            .map_err(|err| format!("failed to read request {}: {err}", path.display()))?
    };
    let request = serde_json::from_str(&contents)
        .map_err(|err| format!("invalid request {}: {err}", path.display()))?;
    Ok(request)
}

fn parse_sort(keys: &[String]) -> Result<Sort, Box<dyn Error>> {
    let mut sort = Sort::unsorted();
    for key in keys {
        let (property, direction) = match key.rsplit_once(':') {
            Some((property, dir)) => {
                let direction = match dir.to_ascii_lowercase().as_str() {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    other => return Err(format!("invalid sort direction '{other}'").into()),
                };
                (property, direction)
            }
            None => (key.as_str(), Direction::Asc),
        };
        sort = sort.and(Order {
            property: property.to_string(),
            direction,
        });
    }
    Ok(sort)
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: serde::Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}

fn print_compiled_text(ui: &Ui, compiled: &CompiledQuery) {
    ui.query(&compiled.query);
    ui.bind_vars(
        compiled
            .bind_vars
            .iter()
            .map(|(key, value)| (key, serde_json::to_string(value).unwrap_or_default())),
    );
}
