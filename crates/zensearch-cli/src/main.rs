//! Zensearch CLI
//!
//! Loads organizations, users and tickets from JSON files and answers
//! `<searchtype> <searchfield> <search value>` queries, either one-shot
//! (`zensearch search ...`) or from an interactive shell (the default).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zensearch_core::{EntityKind, SearchContext};
use zensearch_ingest_json::load_store;

mod config;
mod query;
mod render;
mod repl;

use config::{resolve_data_paths, DataOverrides, DEFAULT_CONFIG_FILE};
use query::SearchQuery;
use repl::ReplState;

#[derive(Parser)]
#[command(name = "zensearch")]
#[command(author, version, about = "Search organizations, users and tickets")]
struct Cli {
    #[command(flatten)]
    data: DataArgs,
    /// Render results as pretty JSON instead of the text report.
    #[arg(long, global = true)]
    json: bool,
    /// Disable ANSI colours.
    #[arg(long, global = true)]
    no_color: bool,
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DataArgs {
    /// Config file naming the three data files.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Organizations file (overrides the config).
    #[arg(long, global = true)]
    orgs: Option<PathBuf>,
    /// Users file (overrides the config).
    #[arg(long, global = true)]
    users: Option<PathBuf>,
    /// Tickets file (overrides the config).
    #[arg(long, global = true)]
    tickets: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search shell (the default when no subcommand is given).
    Repl {
        /// Run a non-interactive script (one line per query or command). Use `-` to read from stdin.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Run one REPL line (may be repeated).
        #[arg(long, value_name = "LINE")]
        cmd: Vec<String>,
        /// Keep going after a failing line (default is fail-fast).
        #[arg(long)]
        continue_on_error: bool,
        /// Do not echo lines while running a script / `--cmd`.
        #[arg(long)]
        quiet: bool,
    },

    /// Run a single query and exit.
    Search {
        /// org, user or ticket
        kind: String,
        /// Field name, e.g. `Name` or `ExternalID`
        field: String,
        /// Value to match; omit to find blank values
        value: Vec<String>,
    },

    /// List searchable fields and their types.
    Fields {
        /// org, user or ticket (all kinds when omitted)
        kind: Option<String>,
    },

    /// Print collection and index sizes.
    Stats,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_context(data: &DataArgs) -> Result<SearchContext> {
    let overrides = DataOverrides {
        organizations: data.orgs.clone(),
        users: data.users.clone(),
        tickets: data.tickets.clone(),
    };
    let paths = resolve_data_paths(&data.config, &overrides)?;
    tracing::debug!(?paths, "resolved data paths");
    let store = load_store(&paths).context("failed to load data")?;
    Ok(SearchContext::new(store))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Commands::Fields { kind }) => {
            let kinds = match kind {
                Some(token) => vec![token.to_lowercase().parse::<EntityKind>()?],
                None => EntityKind::ALL.to_vec(),
            };
            print!("{}", render::render_fields(&kinds));
        }
        Some(Commands::Stats) => {
            let ctx = load_context(&cli.data)?;
            print!("{}", render::render_stats(&ctx.stats()));
        }
        Some(Commands::Search { kind, field, value }) => {
            let state = ReplState::new(load_context(&cli.data)?, cli.json);
            let query = SearchQuery {
                kind: kind.to_lowercase(),
                field,
                value: value.join(" "),
            };
            state.run_query(&query, &mut io::stdout())?;
        }
        Some(Commands::Repl {
            script,
            cmd,
            continue_on_error,
            quiet,
        }) => {
            let state = ReplState::new(load_context(&cli.data)?, cli.json);
            if script.is_some() || !cmd.is_empty() {
                repl::cmd_repl_script(
                    &state,
                    script.as_deref(),
                    &cmd,
                    continue_on_error,
                    quiet,
                )?;
            } else {
                print_loaded(&state);
                repl::cmd_repl(&state)?;
            }
        }
        None => {
            let state = ReplState::new(load_context(&cli.data)?, cli.json);
            print_loaded(&state);
            repl::cmd_repl(&state)?;
        }
    }

    Ok(())
}

fn print_loaded(state: &ReplState) {
    let stats = state.context().stats();
    println!(
        "{} {} organizations, {} users, {} tickets",
        "Loaded".green(),
        stats.organizations,
        stats.users,
        stats.tickets
    );
}
