use anyhow::Result;
use clap::Parser;

use gitlab_manifests::{init_telemetry, AppConfig, GitLabError, OperationError};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file_loaded = AppConfig::load_env_file()?;
    let app_config = AppConfig::load(cli.config.as_deref())?;
    init_telemetry(&app_config.observability)?;
    if env_file_loaded {
        tracing::info!("Loaded environment variables from .env file");
    }

    let result = tokio::runtime::Runtime::new()?.block_on(async {
        cli::commands::execute(cli, app_config).await
    });

    if let Some(hint) = result.as_ref().err().and_then(hint_for) {
        eprintln!("🔧 {hint}");
    }
    result
}

fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<GitLabError>()
        .or_else(|| err.downcast_ref::<OperationError>().map(|op| &op.source))
        .and_then(GitLabError::hint)
}
