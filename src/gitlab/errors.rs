use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the GitLab REST API.
#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("invalid GitLab base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("GitLab access token is not configured")]
    MissingToken,

    #[error("group id is not configured")]
    MissingGroup,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitLab API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("failed to decode GitLab response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("render content: {0}")]
    Render(String),
}

impl GitLabError {
    /// Build an API error from a non-success response.
    ///
    /// GitLab reports failures as `{"message": ...}` (a string, or an object of
    /// field errors) or `{"error": "..."}`; anything else is kept verbatim.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match (value.get("message"), value.get("error")) {
                (Some(serde_json::Value::String(msg)), _) => msg.clone(),
                (Some(other), _) => other.to_string(),
                (None, Some(serde_json::Value::String(err))) => err.clone(),
                _ => body.to_string(),
            },
            Err(_) => body.to_string(),
        };
        let message = if message.is_empty() {
            status.canonical_reason().unwrap_or("no response body").to_string()
        } else {
            message
        };

        Self::Api { status, message }
    }

    /// HTTP status of the failed response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Short remediation hint for the CLI.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingToken => Some("export GITLAB_TOKEN=<personal access token>"),
            Self::MissingGroup => Some("set gitlab.group_id or GITLAB_MANIFESTS_GITLAB__GROUP_ID"),
            Self::InvalidBaseUrl { .. } => Some("use a full URL such as https://gitlab.example.com"),
            Self::Api { status, .. } => match status.as_u16() {
                401 => Some("token is invalid or expired"),
                403 => Some("token lacks the `api` scope or project access"),
                404 => Some("check group, project and file path settings"),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A failed operation: the human-readable status line plus the underlying error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OperationError {
    pub message: String,
    #[source]
    pub source: GitLabError,
}

impl OperationError {
    pub fn new(message: impl Into<String>, source: GitLabError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// Attach a status line to a failed API call.
pub trait WithMessage<T> {
    fn with_message<F>(self, message: F) -> Result<T, OperationError>
    where
        F: FnOnce(&GitLabError) -> String;
}

impl<T> WithMessage<T> for Result<T, GitLabError> {
    fn with_message<F>(self, message: F) -> Result<T, OperationError>
    where
        F: FnOnce(&GitLabError) -> String,
    {
        self.map_err(|err| OperationError::new(message(&err), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_message() {
        let err = GitLabError::from_status(StatusCode::NOT_FOUND, r#"{"message":"404 Project Not Found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "GitLab API error (404 Not Found): 404 Project Not Found");
    }

    #[test]
    fn test_from_status_field_errors_and_plain_bodies() {
        let err = GitLabError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":{"name":["has already been taken"]}}"#,
        );
        match err {
            GitLabError::Api { message, .. } => assert!(message.contains("has already been taken")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = GitLabError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"invalid_token"}"#);
        assert_eq!(err.hint(), Some("token is invalid or expired"));

        let err = GitLabError::from_status(StatusCode::BAD_GATEWAY, "");
        match err {
            GitLabError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_message_keeps_source() {
        let result: Result<(), GitLabError> = Err(GitLabError::NotFound("project x".to_string()));
        let err = result.with_message(|_| "create project: <x> error".to_string()).unwrap_err();
        assert_eq!(err.message, "create project: <x> error");
        assert!(err.source.is_not_found());
    }
}
