use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use staffdb::lens::utils::OutputFormat;
use staffdb::StaffdbConfig;
use tracing::Level;

mod commands;

use commands::config::ConfigArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.staffdb/staffdb.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format for listings: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and manage employees interactively (default).
    Session,

    /// Show configuration and database status.
    Config(ConfigArgs),
}

fn init_logging(config: &StaffdbConfig, debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    if config.log_to_file {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())
        {
            Ok(file) => tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init(),
            Err(e) => eprintln!(
                "WARNING: unable to open log file {}: {}",
                config.log_path(),
                e
            ),
        }
    } else if debug {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match StaffdbConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config, cli.debug);

    match cli.command {
        None | Some(Commands::Session) => commands::session::run(&config, cli.format),
        Some(Commands::Config(args)) => commands::config::run(&config, args, cli.format),
    }
}
