// gitlab-manifests library - GitLab project, webhook, commit, file and tag operations
// This exposes the session, the REST client seam and the ambient config/telemetry setup

pub mod config;
pub mod gitlab;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{AppConfig, GitLabConfig, ObservabilityConfig};
pub use gitlab::{
    Commit, CommitSummary, FileInfo, GitLabApi, GitLabClient, GitLabError, GitLabServer, LocalFileContent,
    OperationError, Project, ProjectHook, ProjectRef, RenderContent, RepositoryFile, Tag, Visibility,
};
pub use telemetry::{create_operation_span, generate_correlation_id, init_telemetry};
