use tracing::info;

use super::errors::{GitLabError, OperationError, WithMessage};
use super::server::GitLabServer;
use super::types::{Commit, CommitSummary, ProjectRef, RevertCommitOptions};

impl GitLabServer {
    pub async fn list_project_commits(&self, branch: &str) -> Result<Vec<Commit>, GitLabError> {
        let project_id = self.project_id().await?;
        self.api.list_commits(&ProjectRef::Id(project_id), branch).await
    }

    /// Commits on `branch` reduced to short id, title and author, newest first
    /// as returned by the server.
    pub async fn list_project_commits_formatted(&self, branch: &str) -> Result<Vec<CommitSummary>, GitLabError> {
        let commits = self.list_project_commits(branch).await?;
        Ok(commits.iter().map(CommitSummary::from).collect())
    }

    /// Revert `commit_id` on `branch` with a new commit.
    pub async fn rollback_project_commit(&self, branch: &str, commit_id: &str) -> Result<String, OperationError> {
        let project_id = self
            .project_id()
            .await
            .with_message(|_| "get project id error".to_string())?;

        let options = RevertCommitOptions {
            branch: branch.to_string(),
        };
        let revert = self
            .api
            .revert_commit(&ProjectRef::Id(project_id), commit_id, &options)
            .await
            .with_message(|_| format!("rollback commit {branch}/{commit_id} error"))?;

        info!(branch, commit_id, revert_id = %revert.short_id, "Reverted commit");
        Ok(format!("rollback commit {branch}/{commit_id} ok"))
    }
}
