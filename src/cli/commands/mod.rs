use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use tracing::Instrument;

use gitlab_manifests::telemetry::{create_operation_span, generate_correlation_id};
use gitlab_manifests::{AppConfig, GitLabServer};

use super::{Cli, Commands};

pub mod commit;
pub mod config;
pub mod file;
pub mod hook;
pub mod project;
pub mod tag;

/// Run the parsed command against the loaded configuration.
pub async fn execute(cli: Cli, app_config: AppConfig) -> Result<()> {
    let Cli {
        project: project_override,
        command,
        ..
    } = cli;
    let project_override = project_override.as_deref();

    match command {
        Commands::Config(cmd) => config::run(&app_config, cmd),
        Commands::Project(cmd) => {
            with_server(&app_config, project_override, "project", |server| async move {
                project::run(&server, cmd).await
            })
            .await
        }
        Commands::Hook(cmd) => {
            with_server(&app_config, project_override, "hook", |server| async move {
                hook::run(&server, cmd).await
            })
            .await
        }
        Commands::Commit(cmd) => {
            with_server(&app_config, project_override, "commit", |server| async move {
                commit::run(&server, cmd).await
            })
            .await
        }
        Commands::File(cmd) => {
            with_server(&app_config, project_override, "file", |server| async move {
                file::run(&server, cmd).await
            })
            .await
        }
        Commands::Tag(cmd) => {
            with_server(&app_config, project_override, "tag", |server| async move {
                tag::run(&server, cmd).await
            })
            .await
        }
    }
}

/// Build the session from configuration and run `f` inside an operation span.
pub async fn with_server<F, Fut>(
    app_config: &AppConfig,
    project_override: Option<&str>,
    operation: &str,
    f: F,
) -> Result<()>
where
    F: FnOnce(GitLabServer) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut server = GitLabServer::from_config(&app_config.gitlab)?;
    if let Some(project) = project_override {
        server = server.with_project_name(project);
    }

    let span = create_operation_span(operation, server.project_name(), &generate_correlation_id());
    f(server).instrument(span).await
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
