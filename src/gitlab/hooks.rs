use tracing::{info, warn};

use super::errors::{GitLabError, OperationError, WithMessage};
use super::server::GitLabServer;
use super::types::{AddProjectHookOptions, ProjectHook, ProjectRef};

/// Exact, case-sensitive URL match.
fn contains_hook_url(hooks: &[ProjectHook], url: &str) -> bool {
    hooks.iter().any(|hook| hook.url == url)
}

impl GitLabServer {
    pub async fn list_project_hooks(&self) -> Result<Vec<ProjectHook>, GitLabError> {
        let project_id = self.project_id().await?;
        self.api.list_project_hooks(&ProjectRef::Id(project_id)).await
    }

    /// Whether a webhook with exactly this URL is registered on the project.
    pub async fn project_hook_exists(&self, url: &str) -> Result<bool, GitLabError> {
        let hooks = self.list_project_hooks().await?;
        Ok(contains_hook_url(&hooks, url))
    }

    /// Register a webhook fired on pushes to `branch`.
    pub async fn create_project_hook_by_push(
        &self,
        url: &str,
        branch: &str,
        push_events: bool,
        enable_ssl_verification: bool,
    ) -> Result<String, OperationError> {
        let options = AddProjectHookOptions::push(url, branch, push_events, enable_ssl_verification);
        self.create_project_hook(&options).await
    }

    /// Register a webhook fired on tag pushes.
    pub async fn create_project_hook_by_tag(
        &self,
        url: &str,
        branch: &str,
        tag_push_events: bool,
        enable_ssl_verification: bool,
    ) -> Result<String, OperationError> {
        let options = AddProjectHookOptions::tag_push(url, branch, tag_push_events, enable_ssl_verification);
        self.create_project_hook(&options).await
    }

    async fn create_project_hook(&self, options: &AddProjectHookOptions) -> Result<String, OperationError> {
        let project_id = self
            .project_id()
            .await
            .with_message(|_| "get project id error".to_string())?;
        let project = ProjectRef::Id(project_id);

        let hooks = self
            .api
            .list_project_hooks(&project)
            .await
            .with_message(|_| format!("list project hook: <{}> error", self.project_name))?;
        if contains_hook_url(&hooks, &options.url) {
            warn!(project = %self.project_name, url = %options.url, "Webhook already registered");
            return Err(OperationError::new(
                format!("add project hook: <{}> error", self.project_name),
                GitLabError::AlreadyExists(format!("url: {}", options.url)),
            ));
        }

        let hook = self
            .api
            .add_project_hook(&project, options)
            .await
            .with_message(|_| format!("add project hook: <{}> error", self.project_name))?;

        info!(project = %self.project_name, hook_id = hook.id, url = %hook.url, "Added project webhook");
        Ok(format!(
            "add project hook: <{}> ok, hook_id: {}",
            self.project_name, hook.id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::client::MockGitLabApi;
    use crate::gitlab::server::test_support::{expect_projects, server};

    fn hook(id: u64, url: &str) -> ProjectHook {
        serde_json::from_value(serde_json::json!({ "id": id, "url": url })).unwrap()
    }

    fn expect_hooks(api: &mut MockGitLabApi, urls: Vec<&'static str>) {
        api.expect_list_project_hooks()
            .withf(|project| *project == ProjectRef::Id(2))
            .times(1)
            .returning(move |_| Ok(urls.iter().enumerate().map(|(i, url)| hook(i as u64 + 1, url)).collect()));
    }

    #[tokio::test]
    async fn test_hook_exists_requires_exact_url() {
        let registered = "https://ci.example.com/hooks/deploy";
        for (candidate, expected) in [
            (registered, true),
            ("https://ci.example.com/hooks/Deploy", false),
            ("https://CI.example.com/hooks/deploy", false),
            ("https://ci.example.com/hooks/deploy/", false),
            ("https://ci.example.com/hooks", false),
        ] {
            let mut api = MockGitLabApi::new();
            expect_projects(&mut api, vec![(1, "other"), (2, "manifests")]);
            expect_hooks(&mut api, vec![registered]);

            let exists = server(api, "manifests").project_hook_exists(candidate).await.unwrap();
            assert_eq!(exists, expected, "{candidate}");
        }
    }

    #[tokio::test]
    async fn test_push_hook_with_existing_url_is_not_created() {
        let mut api = MockGitLabApi::new();
        expect_projects(&mut api, vec![(2, "manifests")]);
        expect_hooks(&mut api, vec!["https://ci.example.com/hook"]);
        api.expect_add_project_hook().never();

        let err = server(api, "manifests")
            .create_project_hook_by_push("https://ci.example.com/hook", "main", true, true)
            .await
            .unwrap_err();

        assert!(matches!(err.source, GitLabError::AlreadyExists(_)));
        assert_eq!(err.message, "add project hook: <manifests> error");
        assert_eq!(err.source.to_string(), "url: https://ci.example.com/hook already exists");
    }

    #[tokio::test]
    async fn test_push_hook_created_with_push_events() {
        let mut api = MockGitLabApi::new();
        expect_projects(&mut api, vec![(2, "manifests")]);
        expect_hooks(&mut api, vec!["https://ci.example.com/other"]);
        api.expect_add_project_hook()
            .withf(|project, options| {
                *project == ProjectRef::Id(2)
                    && options.url == "https://ci.example.com/hook"
                    && options.push_events_branch_filter.as_deref() == Some("release")
                    && options.push_events == Some(true)
                    && options.tag_push_events.is_none()
                    && options.enable_ssl_verification == Some(false)
            })
            .times(1)
            .returning(|_, options| Ok(hook(31, &options.url)));

        let message = server(api, "manifests")
            .create_project_hook_by_push("https://ci.example.com/hook", "release", true, false)
            .await
            .unwrap();
        assert_eq!(message, "add project hook: <manifests> ok, hook_id: 31");
    }

    #[tokio::test]
    async fn test_tag_hook_created_with_tag_push_events() {
        let mut api = MockGitLabApi::new();
        expect_projects(&mut api, vec![(2, "manifests")]);
        expect_hooks(&mut api, vec![]);
        api.expect_add_project_hook()
            .withf(|_, options| options.tag_push_events == Some(true) && options.push_events.is_none())
            .times(1)
            .returning(|_, options| Ok(hook(32, &options.url)));

        let message = server(api, "manifests")
            .create_project_hook_by_tag("https://ci.example.com/tags", "main", true, true)
            .await
            .unwrap();
        assert_eq!(message, "add project hook: <manifests> ok, hook_id: 32");
    }

    #[tokio::test]
    async fn test_hook_creation_failure_keeps_status_message() {
        let mut api = MockGitLabApi::new();
        expect_projects(&mut api, vec![(2, "manifests")]);
        expect_hooks(&mut api, vec![]);
        api.expect_add_project_hook().returning(|_, _| {
            Err(GitLabError::from_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Invalid url given"}"#))
        });

        let err = server(api, "manifests")
            .create_project_hook_by_push("not-a-url", "main", true, true)
            .await
            .unwrap_err();
        assert_eq!(err.message, "add project hook: <manifests> error");
    }

    #[tokio::test]
    async fn test_hook_creation_for_missing_project() {
        let mut api = MockGitLabApi::new();
        expect_projects(&mut api, vec![(1, "other")]);
        api.expect_list_project_hooks().never();
        api.expect_add_project_hook().never();

        let err = server(api, "manifests")
            .create_project_hook_by_push("https://ci.example.com/hook", "main", true, true)
            .await
            .unwrap_err();
        assert_eq!(err.message, "get project id error");
        assert!(err.source.is_not_found());
        assert_ne!(err.to_string(), err.source.to_string());
    }
}
