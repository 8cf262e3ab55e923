use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

use warden::app::WardenApp;
use warden::cli::{Cli, Commands, ValidateArgs};
use warden::config::TomlConfigProvider;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // RUST_LOG wins over -v
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(verbosity.log_level());
    }
    logger.init();

    if cli.no_color {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let mut config_provider = TomlConfigProvider::new();
    if let Some(path) = cli.config.clone() {
        config_provider = config_provider.with_config_file(path);
    }

    let app = WardenApp::new(config_provider).with_verbosity(verbosity);

    let code = match cli.command.unwrap_or(Commands::Validate(ValidateArgs::default())) {
        Commands::Validate(args) => {
            let path = args.path.clone();
            let outcome = app
                .validate(args)
                .await
                .with_context(|| format!("Failed to validate {}", path.display()))?;
            if outcome.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Status => {
            let status = app.status().context("Failed to read system status")?;
            if status.is_initialized {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Init(args) => {
            app.init(args).context("Failed to write default configuration")?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
