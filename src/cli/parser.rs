use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for geoclock
/// CLI application to clock in and out from inside a geofence, backed by SQLite
#[derive(Parser)]
#[command(
    name = "geoclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in and out only from inside the configured geofence, with an auditable SQLite log",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Open a session for a user
    Login {
        /// User identifier
        user: String,
    },

    /// Close the active session
    Logout,

    /// Show the current attendance status of the logged-in user
    Status,

    /// Clock in or out (toggles the current status)
    Clock {
        /// Use this position instead of the configured location helper
        #[arg(
            long = "at",
            value_name = "LAT,LNG",
            allow_hyphen_values = true,
            help = "Current position as LAT,LNG (overrides geolocation.command)"
        )]
        at: Option<String>,
    },

    /// List the attendance events of the logged-in user
    History {
        #[arg(long, short, help = "Show only the newest N events")]
        limit: Option<usize>,
    },

    /// Manage the geofence that gates clock actions
    Geofence {
        /// Center of the new zone
        #[arg(
            long = "set",
            value_name = "LAT,LNG",
            allow_hyphen_values = true,
            requires = "radius",
            help = "Replace the active zone with one centered at LAT,LNG"
        )]
        set: Option<String>,

        #[arg(long = "radius", value_name = "METERS", help = "Zone radius in meters (with --set)")]
        radius: Option<f64>,

        #[arg(long = "label", help = "Optional name for the zone (with --set)")]
        label: Option<String>,

        #[arg(long = "show", help = "Show the active zone")]
        show: bool,

        #[arg(
            long = "disable",
            conflicts_with = "set",
            help = "Disable the active zone (every location is then accepted)"
        )]
        disable: bool,
    },

    /// Export the logged-in user's events for audit
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(
            long = "check",
            help = "Check database integrity and clock_in/clock_out alternation"
        )]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,
    },
}
