use anyhow::Result;

use gitlab_manifests::GitLabServer;

use super::print_json;
use crate::cli::ProjectCommand;

pub async fn run(server: &GitLabServer, cmd: ProjectCommand) -> Result<()> {
    match cmd {
        ProjectCommand::Create => {
            let message = server.create_project().await?;
            println!("✅ {message}");
        }
        ProjectCommand::List => {
            let projects = server.list_projects().await?;
            print_json(&projects)?;
        }
        ProjectCommand::Get { name } => {
            let name = name.as_deref().unwrap_or(server.project_name());
            let project = server.find_project(name).await?;
            print_json(&project)?;
        }
        ProjectCommand::Exists => {
            if server.project_exists().await? {
                println!("✅ project name {} already exists", server.project_name());
            } else {
                println!("❌ project {} not found in group {}", server.project_name(), server.group_name());
            }
        }
    }
    Ok(())
}
