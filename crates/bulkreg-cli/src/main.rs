//! bulkreg - resumable bulk domain registration

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bulkreg_chain::{
    connect, AbiLoadError, ChainError, ChainSettings, ContractKind, Deployment, Registrar,
};
use bulkreg_core::{read_candidates, reconcile, InputError, RecordStore, StoreError};

mod config;
mod driver;
mod executor;
mod status;

use config::{Cli, Command, Config, ConfigError};
use driver::BatchDriver;
use executor::RegistrationExecutor;

/// Fatal errors. Per-domain failures never get here.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AbiLoad(#[from] AbiLoadError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,bulkreg=info")),
        )
        .with_target(true)
        .init();

    let result = match cli.command {
        Some(Command::Status) => show_status(&cli),
        Some(Command::Run) | None => run(&cli).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bulkreg failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    let config = Config::from_cli(cli)?;

    info!(
        network = %config.network,
        base_domain = %config.base_domain,
        input = %config.input_path.display(),
        progress_file = %config.progress_path.display(),
        "Starting bulkreg"
    );

    let registrar = Deployment::load(
        &config.deployments_dir,
        config.network,
        ContractKind::RegistrarController,
    )?;
    let resolver = Deployment::load(
        &config.deployments_dir,
        config.network,
        ContractKind::PublicResolver,
    )?;

    // Load tracking data and merge in new input rows
    let store = RecordStore::new(&config.progress_path);
    let mut records = store.load()?;
    let candidates = read_candidates(&config.input_path)?;
    info!(rows = candidates.len(), "CSV file successfully processed");

    let report = reconcile(&mut records, candidates);
    if report.changed() {
        store.save(&records)?;
        info!(added = report.added, total = records.len(), "Tracking new domains");
    }
    if !report.owner_conflicts.is_empty() {
        warn!(
            conflicts = report.owner_conflicts.len(),
            "Some tracked domains list a different owner in the input; tracked owners kept"
        );
    }

    let chain = connect(&ChainSettings {
        rpc_url: config.rpc_url.clone(),
        signers: config.signers.clone(),
        registrar: registrar.address,
        resolver: resolver.address,
    })
    .await?;

    let controller_owner = chain.registrar.owner().await?;
    info!(owner = %controller_owner, "RegistrarController owner");
    if controller_owner != chain.sender {
        warn!(
            owner = %controller_owner,
            sender = %chain.sender,
            "Sender is not the RegistrarController owner; ownerRegister is likely to revert"
        );
    }

    let executor = RegistrationExecutor::new(
        Arc::new(chain.registrar),
        Arc::new(chain.resolver),
        &config.base_domain,
    );
    let summary = BatchDriver::new(&executor, &store, config.retry)
        .run(&mut records)
        .await?;

    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            "Some domains failed; run again to retry them"
        );
    }
    Ok(())
}

fn show_status(cli: &Cli) -> Result<(), AppError> {
    let store = RecordStore::new(&cli.progress_file);
    match store.read()? {
        Some(records) => print!("{}", status::render(&records)),
        None => println!("No progress file at {}", store.path().display()),
    }
    Ok(())
}
