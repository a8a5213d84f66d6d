use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::errors::GitLabError;
use super::types::{
    AddProjectHookOptions, Commit, CreateProjectOptions, CreateTagOptions, FileInfo, FileOptions,
    Project, ProjectHook, ProjectRef, RepositoryFile, RevertCommitOptions, Tag,
};

const API_VERSION_PATH: &str = "api/v4/";

/// Trait for GitLab REST endpoints, one method per call, to enable testing with mocks
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// `POST /projects`
    async fn create_project(&self, options: &CreateProjectOptions) -> Result<Project, GitLabError>;

    /// `GET /groups/:id/projects`
    async fn list_group_projects(&self, group_id: u64, simple: bool) -> Result<Vec<Project>, GitLabError>;

    /// `GET /projects/:id/hooks`
    async fn list_project_hooks(&self, project: &ProjectRef) -> Result<Vec<ProjectHook>, GitLabError>;

    /// `POST /projects/:id/hooks`
    async fn add_project_hook(
        &self,
        project: &ProjectRef,
        options: &AddProjectHookOptions,
    ) -> Result<ProjectHook, GitLabError>;

    /// `GET /projects/:id/repository/commits?ref_name=`
    async fn list_commits(&self, project: &ProjectRef, ref_name: &str) -> Result<Vec<Commit>, GitLabError>;

    /// `POST /projects/:id/repository/commits/:sha/revert`
    async fn revert_commit(
        &self,
        project: &ProjectRef,
        sha: &str,
        options: &RevertCommitOptions,
    ) -> Result<Commit, GitLabError>;

    /// `POST /projects/:id/repository/files/:file_path`
    async fn create_file(
        &self,
        project: &ProjectRef,
        file_path: &str,
        options: &FileOptions,
    ) -> Result<RepositoryFile, GitLabError>;

    /// `PUT /projects/:id/repository/files/:file_path`
    async fn update_file(
        &self,
        project: &ProjectRef,
        file_path: &str,
        options: &FileOptions,
    ) -> Result<RepositoryFile, GitLabError>;

    /// `GET /projects/:id/repository/files/:file_path/raw?ref=`
    async fn get_raw_file(&self, project: &ProjectRef, file_path: &str, git_ref: &str) -> Result<Vec<u8>, GitLabError>;

    /// `GET /projects/:id/repository/files/:file_path?ref=`
    async fn get_file(&self, project: &ProjectRef, file_path: &str, git_ref: &str) -> Result<FileInfo, GitLabError>;

    /// `POST /projects/:id/repository/tags`
    async fn create_tag(&self, project: &ProjectRef, options: &CreateTagOptions) -> Result<Tag, GitLabError>;
}

/// reqwest-backed GitLab REST v4 client authenticated with a bearer token.
#[derive(Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"********")
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client for `base_url` (e.g. `https://gitlab.example.com`).
    ///
    /// Fails when the URL cannot be parsed or is not an http(s) URL.
    pub fn new(token: &str, base_url: &str) -> Result<Self, GitLabError> {
        Self::with_timeout(token, base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(token: &str, base_url: &str, timeout: Duration) -> Result<Self, GitLabError> {
        let base_url = Self::normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    /// API root, always ending in `/api/v4/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, GitLabError> {
        let invalid = |reason: &str| GitLabError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        let mut path = url.path().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        if !path.ends_with(&format!("/{API_VERSION_PATH}")) {
            path.push_str(API_VERSION_PATH);
        }
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        Ok(url)
    }

    /// Join path segments onto the API root, percent-encoding each one
    /// (including `/`, so `group/project` becomes `group%2Fproject`).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitLabError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitLabError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, GitLabError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "GitLab API request failed");
        Err(GitLabError::from_status(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GitLabError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T, GitLabError> {
        debug!(method = "GET", url = %url, "GitLab API request");
        let response = self.execute(self.http.get(url).query(query)).await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, GitLabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method = %method, url = %url, "GitLab API request");
        let response = self.execute(self.http.request(method, url).json(body)).await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl GitLabApi for GitLabClient {
    async fn create_project(&self, options: &CreateProjectOptions) -> Result<Project, GitLabError> {
        let url = self.endpoint(&["projects"])?;
        self.send_json(Method::POST, url, options).await
    }

    async fn list_group_projects(&self, group_id: u64, simple: bool) -> Result<Vec<Project>, GitLabError> {
        let group = group_id.to_string();
        let url = self.endpoint(&["groups", &group, "projects"])?;
        let simple = if simple { "true" } else { "false" };
        self.get_json(url, &[("simple", simple)]).await
    }

    async fn list_project_hooks(&self, project: &ProjectRef) -> Result<Vec<ProjectHook>, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "hooks"])?;
        self.get_json(url, &[]).await
    }

    async fn add_project_hook(
        &self,
        project: &ProjectRef,
        options: &AddProjectHookOptions,
    ) -> Result<ProjectHook, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "hooks"])?;
        self.send_json(Method::POST, url, options).await
    }

    async fn list_commits(&self, project: &ProjectRef, ref_name: &str) -> Result<Vec<Commit>, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "commits"])?;
        self.get_json(url, &[("ref_name", ref_name)]).await
    }

    async fn revert_commit(
        &self,
        project: &ProjectRef,
        sha: &str,
        options: &RevertCommitOptions,
    ) -> Result<Commit, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "commits", sha, "revert"])?;
        self.send_json(Method::POST, url, options).await
    }

    async fn create_file(
        &self,
        project: &ProjectRef,
        file_path: &str,
        options: &FileOptions,
    ) -> Result<RepositoryFile, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "files", file_path])?;
        self.send_json(Method::POST, url, options).await
    }

    async fn update_file(
        &self,
        project: &ProjectRef,
        file_path: &str,
        options: &FileOptions,
    ) -> Result<RepositoryFile, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "files", file_path])?;
        self.send_json(Method::PUT, url, options).await
    }

    async fn get_raw_file(&self, project: &ProjectRef, file_path: &str, git_ref: &str) -> Result<Vec<u8>, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "files", file_path, "raw"])?;
        debug!(method = "GET", url = %url, "GitLab API request");
        let response = self.execute(self.http.get(url).query(&[("ref", git_ref)])).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_file(&self, project: &ProjectRef, file_path: &str, git_ref: &str) -> Result<FileInfo, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "files", file_path])?;
        self.get_json(url, &[("ref", git_ref)]).await
    }

    async fn create_tag(&self, project: &ProjectRef, options: &CreateTagOptions) -> Result<Tag, GitLabError> {
        let project = project.to_string();
        let url = self.endpoint(&["projects", &project, "repository", "tags"])?;
        self.send_json(Method::POST, url, options).await
    }
}
