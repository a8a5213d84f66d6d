use std::sync::Arc;
use std::time::Duration;

use super::client::{GitLabApi, GitLabClient};
use super::errors::GitLabError;
use crate::config::GitLabConfig;

/// Session against one GitLab group/project.
///
/// Holds the API handle plus the group and project this session operates on.
/// Nothing fetched from the server is kept between calls: every operation that
/// needs the project id lists the group's projects again.
#[derive(Clone)]
pub struct GitLabServer {
    pub(crate) api: Arc<dyn GitLabApi>,
    pub(crate) group_id: Option<u64>,
    pub(crate) group_name: String,
    pub(crate) project_name: String,
}

impl GitLabServer {
    pub fn new(api: Arc<dyn GitLabApi>, group_name: &str, project_name: &str) -> Self {
        Self {
            api,
            group_id: None,
            group_name: group_name.to_string(),
            project_name: project_name.to_string(),
        }
    }

    /// Build a session with a fresh [`GitLabClient`].
    pub fn connect(token: &str, url: &str, group_name: &str, project_name: &str) -> Result<Self, GitLabError> {
        let client = GitLabClient::new(token, url)?;
        Ok(Self::new(Arc::new(client), group_name, project_name))
    }

    pub fn from_config(config: &GitLabConfig) -> Result<Self, GitLabError> {
        let token = config
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(GitLabError::MissingToken)?;
        let client = GitLabClient::with_timeout(token, &config.url, Duration::from_secs(config.timeout_seconds))?;

        let mut server = Self::new(Arc::new(client), &config.group_name, &config.project_name);
        server.group_id = config.group_id;
        Ok(server)
    }

    pub fn with_group_id(mut self, group_id: u64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_project_name(mut self, project_name: &str) -> Self {
        self.project_name = project_name.to_string();
        self
    }

    pub fn group_id(&self) -> Option<u64> {
        self.group_id
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// `group/project`, the address used by the repository file endpoints.
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.group_name, self.project_name)
    }

    pub fn api(&self) -> &dyn GitLabApi {
        self.api.as_ref()
    }
}

impl std::fmt::Debug for GitLabServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabServer")
            .field("group_id", &self.group_id)
            .field("group_name", &self.group_name)
            .field("project_name", &self.project_name)
            .finish_non_exhaustive()
    }
}
