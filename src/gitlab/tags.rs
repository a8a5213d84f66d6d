use tracing::info;

use super::errors::GitLabError;
use super::server::GitLabServer;
use super::types::{CreateTagOptions, ProjectRef, Tag};

impl GitLabServer {
    /// Tag the head of `branch` as `tag_name`.
    pub async fn create_tag(&self, branch: &str, tag_name: &str, message: &str) -> Result<Tag, GitLabError> {
        let project_id = self.project_id().await?;
        let options = CreateTagOptions {
            tag_name: tag_name.to_string(),
            git_ref: branch.to_string(),
            message: Some(message.to_string()),
        };

        let tag = self.api.create_tag(&ProjectRef::Id(project_id), &options).await?;
        info!(
            project = %self.project_name,
            tag = %tag.name,
            tag_target = tag.target.as_deref().unwrap_or_default(),
            "Created tag"
        );
        Ok(tag)
    }
}
