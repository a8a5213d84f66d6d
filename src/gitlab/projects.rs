use tracing::{debug, info};

use super::errors::{GitLabError, OperationError, WithMessage};
use super::server::GitLabServer;
use super::types::{CreateProjectOptions, Project};

impl GitLabServer {
    /// Create the session's project inside the configured group.
    pub async fn create_project(&self) -> Result<String, OperationError> {
        let options = CreateProjectOptions::manifests_repository(&self.project_name, self.group_id);
        let project = self
            .api
            .create_project(&options)
            .await
            .with_message(|_| format!("create project: <{}> error", self.project_name))?;

        info!(project = %self.project_name, project_id = project.id, "Created GitLab project");
        Ok(format!(
            "create project: <{}> ok, project_id: {}",
            self.project_name, project.id
        ))
    }

    /// List the group's projects (simplified representation).
    pub async fn list_projects(&self) -> Result<Vec<Project>, GitLabError> {
        let group_id = self.group_id.ok_or(GitLabError::MissingGroup)?;
        let projects = self.api.list_group_projects(group_id, true).await?;
        debug!(group_id, count = projects.len(), "Listed group projects");
        Ok(projects)
    }

    /// Find a project of the group by exact name.
    pub async fn find_project(&self, name: &str) -> Result<Project, GitLabError> {
        self.list_projects()
            .await?
            .into_iter()
            .find(|project| project.name == name)
            .ok_or_else(|| GitLabError::NotFound(format!("project {name}")))
    }

    /// The session's own project.
    pub async fn get_project(&self) -> Result<Project, GitLabError> {
        self.find_project(&self.project_name).await
    }

    pub async fn project_id(&self) -> Result<u64, GitLabError> {
        Ok(self.get_project().await?.id)
    }

    pub async fn project_exists(&self) -> Result<bool, GitLabError> {
        let projects = self.list_projects().await?;
        Ok(projects.iter().any(|project| project.name == self.project_name))
    }
}
