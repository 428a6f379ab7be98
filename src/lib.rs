//! geoclock library root.
//! Exposes the CLI parser, the high-level run() function and the attendance core.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Login { .. } => cli::commands::login::handle(&cli.command, cfg),
        Commands::Logout => cli::commands::logout::handle(cfg),
        Commands::Status => cli::commands::status::handle(cfg),
        Commands::Clock { .. } => cli::commands::clock::handle(&cli.command, cfg),
        Commands::History { .. } => cli::commands::history::handle(&cli.command, cfg),
        Commands::Geofence { .. } => cli::commands::geofence::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
    }
}

/// What the user can do about an error, when there is something to do.
pub fn hint_for(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Unauthenticated => Some("Log in with: geoclock login <USER>"),
        AppError::GeofenceViolation { .. } => {
            Some("Move inside the allowed area and run `geoclock clock` again.")
        }
        AppError::Location(_) => Some(
            "Pass your position with --at LAT,LNG or set geolocation.command in the config file.",
        ),
        AppError::StaleStatus { .. } => Some("Run `geoclock status` to see the current state."),
        AppError::Storage(_) => Some("Nothing was recorded; retry the action."),
        _ => None,
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1) parse CLI
    let cli = Cli::parse();

    // 2) load config once
    let mut cfg = Config::load()?;

    // 3) --db overrides the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4) hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
