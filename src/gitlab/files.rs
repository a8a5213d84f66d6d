use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::errors::{GitLabError, OperationError, WithMessage};
use super::server::GitLabServer;
use super::types::{FileOptions, ProjectRef};

/// Source of file content produced outside this crate (rendered manifests).
pub trait RenderContent {
    fn render(&self) -> anyhow::Result<Vec<u8>>;
}

impl RenderContent for str {
    fn render(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl RenderContent for String {
    fn render(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl RenderContent for Vec<u8> {
    fn render(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// Content read from a local file at render time.
#[derive(Debug, Clone)]
pub struct LocalFileContent {
    path: PathBuf,
}

impl LocalFileContent {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RenderContent for LocalFileContent {
    fn render(&self) -> anyhow::Result<Vec<u8>> {
        std::fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }
}

#[derive(Debug, Clone, Copy)]
enum FileWrite {
    Create,
    Update,
}

impl FileWrite {
    fn verb(self) -> &'static str {
        match self {
            FileWrite::Create => "create",
            FileWrite::Update => "update",
        }
    }
}

fn status_line(err: &GitLabError) -> String {
    err.status()
        .map(|status| status.to_string())
        .unwrap_or_else(|| "no response".to_string())
}

fn render_bytes<R: RenderContent + ?Sized>(
    mode: FileWrite,
    file_path: &str,
    renderer: &R,
) -> Result<Vec<u8>, OperationError> {
    renderer
        .render()
        .map_err(|err| GitLabError::Render(format!("{err:#}")))
        .with_message(|_| format!("{} file: <{file_path}> error, err: render failed", mode.verb()))
}

impl GitLabServer {
    fn project_ref(&self) -> ProjectRef {
        ProjectRef::Path(self.project_path())
    }

    async fn write_file(
        &self,
        mode: FileWrite,
        file_path: &str,
        options: FileOptions,
    ) -> Result<String, OperationError> {
        let project = self.project_ref();
        let result = match mode {
            FileWrite::Create => self.api.create_file(&project, file_path, &options).await,
            FileWrite::Update => self.api.update_file(&project, file_path, &options).await,
        };
        result.with_message(|err| format!("{} file: <{file_path}> error, err: {}", mode.verb(), status_line(err)))?;

        info!(
            project = %project,
            branch = %options.branch,
            file_path,
            encoding = options.encoding.as_deref().unwrap_or("text"),
            "{}d repository file",
            mode.verb()
        );
        Ok(format!("{} file: <{file_path}> ok", mode.verb()))
    }

    pub async fn create_file(
        &self,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<String, OperationError> {
        let options = FileOptions::text(branch, content, commit_message);
        self.write_file(FileWrite::Create, file_path, options).await
    }

    pub async fn update_file(
        &self,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<String, OperationError> {
        let options = FileOptions::text(branch, content, commit_message);
        self.write_file(FileWrite::Update, file_path, options).await
    }

    /// Create a file whose content comes from `renderer`; nothing is sent when
    /// rendering fails. Content that is not UTF-8 is sent base64-encoded.
    pub async fn create_file_rendered<R: RenderContent + ?Sized>(
        &self,
        branch: &str,
        file_path: &str,
        renderer: &R,
        commit_message: &str,
    ) -> Result<String, OperationError> {
        let content = render_bytes(FileWrite::Create, file_path, renderer)?;
        let options = FileOptions::from_bytes(branch, content, commit_message);
        self.write_file(FileWrite::Create, file_path, options).await
    }

    pub async fn update_file_rendered<R: RenderContent + ?Sized>(
        &self,
        branch: &str,
        file_path: &str,
        renderer: &R,
        commit_message: &str,
    ) -> Result<String, OperationError> {
        let content = render_bytes(FileWrite::Update, file_path, renderer)?;
        let options = FileOptions::from_bytes(branch, content, commit_message);
        self.write_file(FileWrite::Update, file_path, options).await
    }

    /// File content at `branch` as text (invalid UTF-8 is replaced).
    pub async fn get_raw_file(&self, branch: &str, file_path: &str) -> Result<String, OperationError> {
        let body = self
            .api
            .get_raw_file(&self.project_ref(), file_path, branch)
            .await
            .with_message(|err| format!("get file: <{file_path}> error, err: {}", status_line(err)))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Whether the file exists at `branch`.
    ///
    /// Any failure counts as "does not exist", including auth and network
    /// errors. Use [`GitLabServer::try_file_exists`] to tell them apart.
    pub async fn file_exists(&self, branch: &str, file_path: &str) -> bool {
        match self.api.get_file(&self.project_ref(), file_path, branch).await {
            Ok(_) => true,
            Err(err) => {
                debug!(file_path, branch, error = %err, "Treating file lookup failure as missing");
                false
            }
        }
    }

    /// Like [`GitLabServer::file_exists`] but only a 404 means "missing".
    pub async fn try_file_exists(&self, branch: &str, file_path: &str) -> Result<bool, GitLabError> {
        match self.api.get_file(&self.project_ref(), file_path, branch).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::gitlab::client::MockGitLabApi;
    use crate::gitlab::server::test_support::server;
    use crate::gitlab::types::{FileInfo, RepositoryFile};
    use reqwest::StatusCode;

    struct FailingRenderer;

    impl RenderContent for FailingRenderer {
        fn render(&self) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("template values missing `image`")
        }
    }

    fn written(file_path: &str, branch: &str) -> RepositoryFile {
        RepositoryFile {
            file_path: file_path.to_string(),
            branch: branch.to_string(),
        }
    }

    fn file_info() -> FileInfo {
        serde_json::from_value(serde_json::json!({
            "file_name": "web.yaml",
            "file_path": "apps/web.yaml",
            "size": 12,
            "ref": "main"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_file_uses_project_path() {
        let mut api = MockGitLabApi::new();
        api.expect_list_group_projects().never();
        api.expect_create_file()
            .withf(|project, file_path, options| {
                *project == ProjectRef::Path("team/manifests".to_string())
                    && file_path == "apps/web.yaml"
                    && options.branch == "main"
                    && options.content == "kind: Deployment\n"
                    && options.commit_message == "add web"
            })
            .times(1)
            .returning(|_, path, options| Ok(written(path, &options.branch)));

        let message = server(api, "manifests")
            .create_file("main", "apps/web.yaml", "kind: Deployment\n", "add web")
            .await
            .unwrap();
        assert_eq!(message, "create file: <apps/web.yaml> ok");
    }

    #[tokio::test]
    async fn test_update_file_error_reports_status() {
        let mut api = MockGitLabApi::new();
        api.expect_update_file().returning(|_, _, _| {
            Err(GitLabError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"A file with this name doesn't exist"}"#))
        });

        let err = server(api, "manifests")
            .update_file("main", "apps/web.yaml", "x", "update web")
            .await
            .unwrap_err();
        assert_eq!(err.message, "update file: <apps/web.yaml> error, err: 400 Bad Request");
    }

    #[tokio::test]
    async fn test_rendered_content_is_sent() {
        let mut api = MockGitLabApi::new();
        api.expect_update_file()
            .withf(|_, _, options| options.content == "replicas: 3\n" && options.encoding.is_none())
            .times(1)
            .returning(|_, path, options| Ok(written(path, &options.branch)));

        let rendered = String::from("replicas: 3\n");
        let message = server(api, "manifests")
            .update_file_rendered("main", "apps/web.yaml", &rendered, "scale web")
            .await
            .unwrap();
        assert_eq!(message, "update file: <apps/web.yaml> ok");
    }

    #[tokio::test]
    async fn test_render_failure_sends_nothing() {
        let mut api = MockGitLabApi::new();
        api.expect_create_file().never();

        let err = server(api, "manifests")
            .create_file_rendered("main", "apps/web.yaml", &FailingRenderer, "add web")
            .await
            .unwrap_err();
        assert!(matches!(err.source, GitLabError::Render(_)));
        assert_eq!(err.message, "create file: <apps/web.yaml> error, err: render failed");
        assert!(err.source.to_string().contains("template values missing `image`"));
    }

    #[tokio::test]
    async fn test_non_utf8_content_is_sent_base64() {
        let mut api = MockGitLabApi::new();
        api.expect_create_file()
            .withf(|_, file_path, options| {
                file_path == "x.txt"
                    && options.content == "YekK"
                    && options.encoding.as_deref() == Some("base64")
            })
            .times(1)
            .returning(|_, path, options| Ok(written(path, &options.branch)));

        let message = server(api, "manifests")
            .create_file_rendered("main", "x.txt", &vec![b'a', 0xE9, b'\n'], "add latin1")
            .await
            .unwrap();
        assert_eq!(message, "create file: <x.txt> ok");
    }

    #[tokio::test]
    async fn test_local_file_content_renders_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"apiVersion: v1\n").unwrap();

        let mut api = MockGitLabApi::new();
        api.expect_create_file()
            .withf(|_, _, options| options.content == "apiVersion: v1\n")
            .returning(|_, path, options| Ok(written(path, &options.branch)));

        server(api, "manifests")
            .create_file_rendered("main", "ns.yaml", &LocalFileContent::new(file.path()), "add ns")
            .await
            .unwrap();

        let missing = LocalFileContent::new("/definitely/not/here.yaml");
        assert!(missing.render().is_err());
    }

    #[tokio::test]
    async fn test_get_raw_file() {
        let mut api = MockGitLabApi::new();
        api.expect_get_raw_file()
            .withf(|_, file_path, git_ref| file_path == "apps/web.yaml" && git_ref == "release")
            .returning(|_, _, _| Ok(b"image: web:1.4\n".to_vec()));
        let content = server(api, "manifests").get_raw_file("release", "apps/web.yaml").await.unwrap();
        assert_eq!(content, "image: web:1.4\n");

        let mut api = MockGitLabApi::new();
        api.expect_get_raw_file()
            .returning(|_, _, _| Err(GitLabError::from_status(StatusCode::NOT_FOUND, r#"{"message":"404 File Not Found"}"#)));
        let err = server(api, "manifests").get_raw_file("release", "apps/web.yaml").await.unwrap_err();
        assert_eq!(err.message, "get file: <apps/web.yaml> error, err: 404 Not Found");
    }

    #[tokio::test]
    async fn test_file_exists_collapses_every_failure() {
        let mut api = MockGitLabApi::new();
        api.expect_get_file().times(1).returning(|_, _, _| Ok(file_info()));
        assert!(server(api, "manifests").file_exists("main", "apps/web.yaml").await);

        for status in [StatusCode::NOT_FOUND, StatusCode::UNAUTHORIZED, StatusCode::INTERNAL_SERVER_ERROR] {
            let mut api = MockGitLabApi::new();
            api.expect_get_file()
                .returning(move |_, _, _| Err(GitLabError::from_status(status, "{}")));
            assert!(!server(api, "manifests").file_exists("main", "apps/web.yaml").await, "{status}");
        }
    }

    #[tokio::test]
    async fn test_try_file_exists_only_hides_not_found() {
        let mut api = MockGitLabApi::new();
        api.expect_get_file()
            .returning(|_, _, _| Err(GitLabError::from_status(StatusCode::NOT_FOUND, "{}")));
        assert!(!server(api, "manifests").try_file_exists("main", "a.yaml").await.unwrap());

        let mut api = MockGitLabApi::new();
        api.expect_get_file()
            .returning(|_, _, _| Err(GitLabError::from_status(StatusCode::UNAUTHORIZED, "{}")));
        let err = server(api, "manifests").try_file_exists("main", "a.yaml").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
