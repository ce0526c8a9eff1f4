//! `planka-archive-lists`: prints every list on the archive board with its ID.
//!
//! Used once while filling in the `[[mappings]]` section of the settings file.
//! Only credentials and the archive board need to be configured.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use cli::{observability, Settings, SETTINGS_FILE};
use planka::PlankaClient;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = observability::init(None) {
        eprintln!("{err:#}");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(SETTINGS_FILE))?;
    settings.check_credentials()?;
    let archive_board = settings.archive_board()?;

    let client = PlankaClient::connect(&settings.connection())
        .await
        .context("Authentication with Planka failed")?;

    let lists = client.board_lists(&archive_board).await;
    println!("Lists on the archive board:");
    for list in &lists {
        println!("  '{}' - ID: {}", list.name, list.id);
    }
    Ok(())
}
