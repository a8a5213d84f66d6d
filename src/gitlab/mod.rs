//! GitLab project, webhook, commit, repository file and tag operations.
//!
//! [`GitLabServer`] is the session callers use; [`GitLabApi`] is the REST seam
//! behind it, implemented over reqwest by [`GitLabClient`].

pub mod client;
pub mod commits;
pub mod errors;
pub mod files;
pub mod hooks;
pub mod projects;
pub mod server;
pub mod tags;
pub mod types;

pub use client::{GitLabApi, GitLabClient};
#[cfg(any(test, feature = "testing"))]
pub use client::MockGitLabApi;
pub use errors::{GitLabError, OperationError};
pub use files::{LocalFileContent, RenderContent};
pub use server::GitLabServer;
pub use types::{
    Commit, CommitSummary, FileInfo, Project, ProjectHook, ProjectRef, RepositoryFile, Tag, Visibility,
};
