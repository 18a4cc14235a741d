//! HUMAN Security RTD CLI.
//!
//! This tool provides commands for:
//! - Validating configuration files and submodule params
//! - Previewing the script element injected into a page

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod error;
mod inject;

use error::CliError;

#[derive(Parser)]
#[command(name = "hmnsctl")]
#[command(about = "HUMAN Security RTD configuration and injection tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Initialise the submodule and print the page with the script injected
    Inject {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        file: PathBuf,

        /// HTML page to inject into
        #[arg(long)]
        page: PathBuf,

        /// Hostname reported to the vendor script
        #[arg(long, env = "HMNS_PAGE_HOSTNAME")]
        hostname: String,

        /// Name of the host library's global object
        #[arg(long, default_value = "pbjs")]
        global: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate settings and submodule params
    Validate {
        /// Path to the TOML configuration file
        #[arg(long, short)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Validate { file } => config::validate(file, cli.verbose),
        },
        Commands::Inject {
            file,
            page,
            hostname,
            global,
        } => {
            let html = inject::render(file, page, hostname, global)?;
            println!("{}", html);
            Ok(())
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();

    if let Err(e) = result {
        eprintln!("Failed to initialize logger: {}", e);
    }
}
