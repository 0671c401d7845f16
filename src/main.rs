// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use cloak_control::config::{APP_ID, Config};
use cloak_control::{Effect, Mode, SmartType};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "cloak-control")]
#[command(about = "Control surface for the invisibility cloak effects server")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(short, long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the server's current state
    Status,

    /// Start or stop the effect
    Toggle,

    /// Switch background mode (invisible, virtual, smart)
    Mode { mode: Mode },

    /// Switch smart background type (blur, virtual, solid)
    Smart {
        smart_type: SmartType,

        /// Blur kernel size for the blur type
        #[arg(short, long)]
        blur: Option<u32>,

        /// Solid fill color as #rrggbb
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Select a frame effect (none, pixelate, blur, cartoon)
    Effect { effect: Effect },

    /// Manage detection color ranges
    Ranges {
        #[command(subcommand)]
        action: Option<RangeAction>,
    },

    /// Sample the color at a point of the live frame
    Pick {
        /// Horizontal position, 0.0 (left) to 1.0 (right)
        #[arg(short, long)]
        x: f64,

        /// Vertical position, 0.0 (top) to 1.0 (bottom)
        #[arg(short, long)]
        y: f64,

        /// Range width around the sampled color (1-60)
        #[arg(short, long)]
        sensitivity: Option<u8>,
    },

    /// Manage saved presets
    Profiles {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// List built-in scenes or select one
    Scenes {
        /// Scene to select
        name: Option<String>,

        /// Apply to the smart background instead of the virtual background
        #[arg(long)]
        smart: bool,
    },

    /// Upload an image as background
    Upload {
        file: PathBuf,

        /// Apply to the smart background instead of the virtual background
        #[arg(long)]
        smart: bool,
    },

    /// Capture the empty scene used by cloak mode
    Capture,

    /// Print the server state periodically until Ctrl+C
    Watch {
        /// Seconds between updates
        #[arg(short, long, default_value = "2")]
        interval: u64,
    },

    /// Open the server's video page in the browser
    Open,
}

#[derive(Subcommand)]
enum RangeAction {
    /// List slots
    List,
    /// Add a slot with the full range
    Add,
    /// Make slot N active (1-based)
    Select { slot: usize },
    /// Remove slot N (1-based)
    Delete { slot: usize },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List presets
    List,
    /// Save the current state under NAME
    Save { name: String },
    /// Restore preset NAME
    Load { name: String },
    /// Remove preset NAME
    Delete { name: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let terminal_mode = cli.command.is_none();

    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=cloak_control=debug, RUST_LOG=info
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let log_file = terminal_mode.then(open_log_file).flatten();
    match log_file {
        // Terminal mode owns the screen; log to a file instead
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init(),
    }

    // --server applies to this run only and is never saved
    let mut config = Config::load();
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    match cli.command {
        None => cloak_control::terminal::run(config),
        Some(Commands::Status) => cli::status(&config),
        Some(Commands::Toggle) => cli::toggle(&config),
        Some(Commands::Mode { mode }) => cli::set_mode(&config, mode),
        Some(Commands::Smart {
            smart_type,
            blur,
            color,
        }) => cli::set_smart(&config, smart_type, blur, color),
        Some(Commands::Effect { effect }) => cli::set_effect(&config, effect),
        Some(Commands::Ranges { action }) => match action.unwrap_or(RangeAction::List) {
            RangeAction::List => cli::list_ranges(&config),
            RangeAction::Add => cli::add_range(&config),
            RangeAction::Select { slot } => cli::select_range(&config, slot),
            RangeAction::Delete { slot } => cli::delete_range(&config, slot),
        },
        Some(Commands::Pick { x, y, sensitivity }) => cli::pick(&config, x, y, sensitivity),
        Some(Commands::Profiles { action }) => match action.unwrap_or(ProfileAction::List) {
            ProfileAction::List => cli::list_profiles(&config),
            ProfileAction::Save { name } => cli::save_profile(&config, name),
            ProfileAction::Load { name } => cli::load_profile(&config, name),
            ProfileAction::Delete { name } => cli::delete_profile(&config, name),
        },
        Some(Commands::Scenes { name, smart }) => cli::scenes(&config, name, smart),
        Some(Commands::Upload { file, smart }) => cli::upload(&config, file, smart),
        Some(Commands::Capture) => cli::capture(&config),
        Some(Commands::Watch { interval }) => cli::watch(&config, interval),
        Some(Commands::Open) => cli::open_server(&config),
    }
}

/// `<cache_dir>/cloak-control/cloak-control.log`
fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join(APP_ID);
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", APP_ID)))
        .ok()
}
