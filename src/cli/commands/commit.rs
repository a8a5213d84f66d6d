use anyhow::Result;

use gitlab_manifests::GitLabServer;

use super::print_json;
use crate::cli::CommitCommand;

pub async fn run(server: &GitLabServer, cmd: CommitCommand) -> Result<()> {
    match cmd {
        CommitCommand::List { branch, full } => {
            if full {
                print_json(&server.list_project_commits(&branch).await?)?;
            } else {
                print_json(&server.list_project_commits_formatted(&branch).await?)?;
            }
        }
        CommitCommand::Revert { commit_id, branch } => {
            let message = server.rollback_project_commit(&branch, &commit_id).await?;
            println!("⏪ {message}");
        }
    }
    Ok(())
}
