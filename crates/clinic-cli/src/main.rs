use std::io;

use anyhow::Result;
use clap::Parser;
use clinic_cli::cli::Cli;
use clinic_cli::config::loader::load_with_cli;
use clinic_cli::console::Console;
use clinic_cli::output::{print_error, print_success};
use clinic_cli::{env_file_warning, menu, observability, open_storage};
use clinic_storage::ClinicRepository;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    if let Some(warning) = env_file_warning(dotenvy::dotenv()) {
        print_error(&warning);
    }
    let cli = Cli::parse();

    let config = match load_with_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            observability::init_tracing();
            error!(error = %e, path = %cli.config, "Failed to load configuration");
            print_error(&e.to_string());
            print_error("Cannot start system without a valid configuration.");
            return Ok(());
        }
    };
    observability::init_tracing_with_level(&config.logging.level);

    let storage = match open_storage(&config.storage).await {
        Ok(storage) => storage,
        Err(e) => {
            error!(error = %e, "Storage startup failed");
            print_error(&format!("Database connection error: {e}"));
            print_error("Cannot start system without database connection.");
            return Ok(());
        }
    };
    print_success(&format!("Connected to {} storage", storage.backend_name()));

    let repo = ClinicRepository::new(storage);
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    menu::run(&mut console, &repo).await
}
