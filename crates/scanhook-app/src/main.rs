use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use scanhook_app::cli::Cli;
use scanhook_app::{logging, pipeline};
use scanhook_config::{Settings, Workspace};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let workspace = match startup(&cli) {
        Ok(workspace) => workspace,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_config {
        return dump_config(&workspace);
    }

    match pipeline::run(&workspace, pipeline::default_engine).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(&e),
    }
}

fn startup(cli: &Cli) -> Result<Workspace> {
    let workspace = cli.workspace()?;
    logging::init(&workspace, cli.verbose).context("Failed to initialize logging")?;
    tracing::debug!("Program directory: {}", workspace.root().display());
    Ok(workspace)
}

fn dump_config(workspace: &Workspace) -> ExitCode {
    let settings = match Settings::load(&workspace.settings_path()) {
        Ok(settings) => settings,
        Err(e) => {
            let err = scanhook_app::RunError::from(e);
            tracing::error!("{}", err);
            return ExitCode::from(&err);
        }
    };

    match serde_json::to_string_pretty(&settings) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
            ExitCode::FAILURE
        }
    }
}
