//! Binary entrypoint for the Pokebot CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and the built-in world as JSON
//! - `status` - print world content and store statistics
//! - `play --server <id> --user <id>` - line driver over stdin for local play
//!
//! See the library crate docs for module-level details: `pokebot::`.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use pokebot::adventure::{
    canonical_world, load_world, write_world_json, AdventureService, AdventureStore,
    AdventureStoreBuilder, Interaction, Reply, WorldCatalog,
};
use pokebot::config::Config;

#[derive(Parser)]
#[command(name = "pokebot")]
#[command(about = "Simulation core of a chat-hosted creature adventure")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and world seed
    Init,
    /// Show world and store statistics
    Status,
    /// Play from the terminal as one user of one server
    Play {
        /// Server (guild) id
        #[arg(short, long, default_value_t = 1)]
        server: u64,
        /// User id
        #[arg(short, long, default_value_t = 1)]
        user: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new pokebot configuration");
            let mut cfg = Config::default();
            let seed_path = Path::new(&cfg.game.data_dir).join("world.json");
            cfg.game.world_seed = Some(seed_path.to_string_lossy().into_owned());
            let serialized = toml::to_string_pretty(&cfg)?;
            tokio::fs::write(&cli.config, serialized).await?;
            info!("Configuration file created at {}", cli.config);

            tokio::fs::create_dir_all(&cfg.game.data_dir).await?;
            write_world_json(&seed_path, &canonical_world())?;
            info!("World seed written to {}", seed_path.display());
        }
        Commands::Status => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let (store, world) = open_game(&config)?;
            println!("pokebot v{}", env!("CARGO_PKG_VERSION"));
            println!("data dir:   {}", config.game.data_dir);
            println!("locations:  {}", world.locations.len());
            println!("species:    {} enabled", world.enabled_species_count());
            println!("gyms:       {}", world.gyms.len());
            println!("steps:      {}", world.tutorial_steps.len());
            println!("players:    {}", store.count_players());
            let recent = store.recent_logs(5)?;
            if !recent.is_empty() {
                println!("recent:");
                for line in recent {
                    println!("  {}", line);
                }
            }
        }
        Commands::Play { server, user } => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let (store, world) = open_game(&config)?;
            let (service, mut expired) =
                AdventureService::new(Arc::new(store), Arc::new(world), config.service_options());
            info!("Playing as user {} on server {}", user, server);
            println!("Type `help` for commands. Paste a component id (e.g. move_select:2:{}) to press a button.", user);

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        let Some(line) = line? else { break };
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                            break;
                        }
                        let interaction = if line.contains(':') {
                            Interaction::component(server, user, line)
                        } else {
                            Interaction::command(server, user, line)
                        };
                        print_reply(&service.handle_now(&interaction));
                    }
                    Some(notice) = expired.recv() => {
                        println!("[expired] your {} timed out", notice.flow);
                    }
                }
            }
        }
    }

    Ok(())
}

fn open_game(config: &Config) -> Result<(AdventureStore, WorldCatalog)> {
    let world = load_world(config.game.world_seed.as_deref().map(Path::new))?;
    if world.location_by_code(&config.game.initial_location).is_none() {
        warn!(
            target: "content",
            "initial location {} is not part of the world", config.game.initial_location
        );
    }
    let store = AdventureStoreBuilder::new(&config.game.data_dir).open()?;
    Ok((store, world))
}

fn print_reply(reply: &Reply) {
    let scope = if reply.ephemeral { "(only you)" } else { "(public)" };
    println!("{} {}", scope, reply.body);
    for button in &reply.buttons {
        println!("  [{}] {}", button.custom_id, button.label);
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    // CLI verbosity overrides config
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    let file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Interactive sessions also see records on the terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
