//! roomgated - room filtering for the scheduling portal
//!
//! Wires together:
//! - Configuration loading
//! - Store initialization
//! - The room engine
//!
//! Portal data (user, rooms, equipment names, bookings) is read from a JSON
//! file fetched by the caller; results are written to stdout as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roomgate_api::{Booking, FilterReport, FilterRequest, Room, User};
use roomgate_config::load_config;
use roomgate_core::RoomEngine;
use roomgate_store::{OverrideStore, SqliteStore};
use roomgate_util::{default_config_path, suggested_window, RoomId, DATABASE_FILENAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// roomgated - Room access and conflict filtering
#[derive(Parser, Debug)]
#[command(name = "roomgated")]
#[command(about = "Room access and time-conflict filtering for the scheduling portal", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/roomgate/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set ROOMGATE_DATA_DIR env var)
    #[arg(short, long, env = "ROOMGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter rooms for a requested time window
    Filter {
        /// Portal data as JSON: user, rooms, equipment names, bookings
        input: PathBuf,

        /// Start of the window, HH:MM (default: now, rounded)
        #[arg(long)]
        start: Option<String>,

        /// End of the window, HH:MM; empty searches to the end of the day
        #[arg(long)]
        stop: Option<String>,

        /// Only rooms with a piano
        #[arg(long)]
        needs_piano: bool,
    },

    /// Record whether the user's role set may book a room
    SetAccess {
        /// Portal data as JSON; only the user is read
        input: PathBuf,

        #[arg(long)]
        room: i64,

        #[arg(long, conflicts_with = "deny", required_unless_present = "deny")]
        allow: bool,

        #[arg(long)]
        deny: bool,
    },

    /// List recorded access overrides
    ShowAccess,

    /// Show recent audit events
    Audit {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

/// Portal data handed over by the caller
#[derive(Debug, Deserialize)]
struct PortalInput {
    user: User,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    equipment: HashMap<String, String>,
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
struct FilterOutput {
    #[serde(flatten)]
    report: FilterReport,
    bookings: Vec<Booking>,
}

/// Main service state
struct Service {
    engine: RoomEngine,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let policy = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            groups = policy.acl.group_count(),
            rooms = policy.acl.room_count(),
            "Configuration loaded"
        );

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| policy.service.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(DATABASE_FILENAME);
        let store: Arc<dyn OverrideStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        if !store.is_healthy() {
            bail!("Store at {:?} is not healthy", db_path);
        }
        info!(db_path = %db_path.display(), "Store initialized");

        Ok(Self {
            engine: RoomEngine::new(policy, store),
        })
    }

    fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Filter {
                input,
                start,
                stop,
                needs_piano,
            } => {
                let request = build_request(start, stop, needs_piano)?;
                let output = self.filter(read_input(&input)?, &request);
                print_json(&output)
            }
            Command::SetAccess {
                input,
                room,
                allow,
                deny: _,
            } => {
                let input = read_input(&input)?;
                self.engine
                    .set_access(RoomId::new(room), &input.user, allow)
                    .context("Failed to record access override")?;
                println!("{}", if allow { "allowed" } else { "denied" });
                Ok(())
            }
            Command::ShowAccess => {
                let overrides = self.engine.overrides().context("Failed to list overrides")?;
                for (key, access) in overrides {
                    println!("{key}\t{access}");
                }
                Ok(())
            }
            Command::Audit { limit } => {
                let events = self
                    .engine
                    .recent_audits(limit)
                    .context("Failed to read audit log")?;
                print_json(&events)
            }
        }
    }

    fn filter(&self, input: PortalInput, request: &FilterRequest) -> FilterOutput {
        let PortalInput {
            user,
            rooms,
            equipment,
            mut bookings,
        } = input;

        debug!(rooms = rooms.len(), bookings = bookings.len(), "Portal data read");

        let report = self.engine.search(&user, rooms, request, &equipment);
        self.engine.decorate_bookings(&mut bookings);

        FilterOutput { report, bookings }
    }
}

/// Fill in missing window bounds from the current time.
///
/// The suggested stop is only used together with the suggested start; a
/// given start without a stop searches through the end of the day.
fn build_request(start: Option<String>, stop: Option<String>, needs_piano: bool) -> Result<FilterRequest> {
    let (default_start, default_stop) = suggested_window(&roomgate_util::now());

    let (start, stop) = match (start, stop) {
        (Some(start), stop) => (start, stop.unwrap_or_default()),
        (None, Some(stop)) => (default_start.to_string(), stop),
        (None, None) => (
            default_start.to_string(),
            default_stop.map(|s| s.to_string()).unwrap_or_default(),
        ),
    };

    FilterRequest::from_form(&start, &stop, needs_piano).context("Invalid time window")
}

fn read_input(path: &Path) -> Result<PortalInput> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portal data from {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse portal data in {:?}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "roomgated starting");

    let service = Service::new(&args)?;
    service.run(args.command)
}
