//! GitLab records and request options.
//!
//! Records keep the fields this crate reads as typed members and collect the
//! rest of the server payload in `extra`, so callers still see everything the
//! API returned.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description given to projects created by [`crate::GitLabServer::create_project`].
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "kubernetes runtime resource manifests";

/// Project as returned by the group project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHook {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub push_events: bool,
    #[serde(default)]
    pub tag_push_events: bool,
    #[serde(default)]
    pub enable_ssl_verification: bool,
    #[serde(default)]
    pub push_events_branch_filter: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Commit reduced to short id, title and author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub commit_id: String,
    pub commit_message: String,
    pub commit_author: String,
}

impl From<&Commit> for CommitSummary {
    fn from(commit: &Commit) -> Self {
        Self {
            commit_id: commit.short_id.clone(),
            commit_message: commit.title.clone(),
            commit_author: commit.author_name.clone(),
        }
    }
}

/// Response of the file create/update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFile {
    pub file_path: String,
    pub branch: String,
}

/// File metadata from `GET /projects/:id/repository/files/:path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_name: String,
    pub file_path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub last_commit_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Project address accepted by the `:id` path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectRef {
    Id(u64),
    /// Full `group/project` path; encoded as a single path segment.
    Path(String),
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{id}"),
            ProjectRef::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for ProjectRef {
    fn from(id: u64) -> Self {
        ProjectRef::Id(id)
    }
}

impl From<&str> for ProjectRef {
    fn from(path: &str) -> Self {
        ProjectRef::Path(path.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(path: String) -> Self {
        ProjectRef::Path(path)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Internal,
    Public,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateProjectOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl CreateProjectOptions {
    /// Private manifests repository with merge requests and snippets enabled.
    pub fn manifests_repository(name: &str, namespace_id: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            namespace_id,
            description: Some(DEFAULT_PROJECT_DESCRIPTION.to_string()),
            merge_requests_enabled: Some(true),
            snippets_enabled: Some(true),
            visibility: Some(Visibility::Private),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddProjectHookOptions {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_events_branch_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_push_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ssl_verification: Option<bool>,
}

impl AddProjectHookOptions {
    pub fn push(url: &str, branch: &str, push_events: bool, enable_ssl_verification: bool) -> Self {
        Self {
            url: url.to_string(),
            push_events_branch_filter: Some(branch.to_string()),
            push_events: Some(push_events),
            tag_push_events: None,
            enable_ssl_verification: Some(enable_ssl_verification),
        }
    }

    // push_events stays unset so the server default applies
    pub fn tag_push(
        url: &str,
        branch: &str,
        tag_push_events: bool,
        enable_ssl_verification: bool,
    ) -> Self {
        Self {
            url: url.to_string(),
            push_events_branch_filter: Some(branch.to_string()),
            push_events: None,
            tag_push_events: Some(tag_push_events),
            enable_ssl_verification: Some(enable_ssl_verification),
        }
    }
}

/// Body shared by the file create and update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOptions {
    pub branch: String,
    pub content: String,
    pub commit_message: String,
    /// `base64` when `content` is encoded; unset means plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl FileOptions {
    pub fn text(branch: &str, content: &str, commit_message: &str) -> Self {
        Self {
            branch: branch.to_string(),
            content: content.to_string(),
            commit_message: commit_message.to_string(),
            encoding: None,
        }
    }

    /// UTF-8 content goes out as text, anything else base64-encoded.
    pub fn from_bytes(branch: &str, content: Vec<u8>, commit_message: &str) -> Self {
        let (content, encoding) = match String::from_utf8(content) {
            Ok(text) => (text, None),
            Err(err) => (BASE64.encode(err.as_bytes()), Some("base64".to_string())),
        };
        Self {
            branch: branch.to_string(),
            content,
            commit_message: commit_message.to_string(),
            encoding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevertCommitOptions {
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTagOptions {
    pub tag_name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
