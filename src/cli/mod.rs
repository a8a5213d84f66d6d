use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "gitlab-manifests")]
#[command(about = "Manage a GitLab manifests project: projects, webhooks, commits, files and tags")]
#[command(long_about = "gitlab-manifests drives the GitLab REST API for one group/project pair taken from \
                       gitlab-manifests.toml or GITLAB_MANIFESTS_* environment variables. Start with \
                       'gitlab-manifests config show' to check what it will talk to.")]
pub struct Cli {
    /// Configuration file layered over gitlab-manifests.toml
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Override the configured project name
    #[arg(long, global = true, help = "Project to operate on instead of gitlab.project_name")]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, list and look up projects of the configured group
    #[command(subcommand)]
    Project(ProjectCommand),
    /// List and register project webhooks
    #[command(subcommand)]
    Hook(HookCommand),
    /// List and revert commits
    #[command(subcommand)]
    Commit(CommitCommand),
    /// Create, update and read repository files
    #[command(subcommand)]
    File(FileCommand),
    /// Create tags
    #[command(subcommand)]
    Tag(TagCommand),
    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create the configured project as a private manifests repository
    Create,
    /// List all projects of the group as JSON
    List,
    /// Show one project of the group (defaults to the configured project)
    Get {
        #[arg(help = "Project name to look up")]
        name: Option<String>,
    },
    /// Check whether the configured project exists
    Exists,
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// List the project's webhooks as JSON
    List,
    /// Check whether a webhook with exactly this URL is registered
    Exists {
        url: String,
    },
    /// Register a webhook triggered by pushes
    AddPush(HookArgs),
    /// Register a webhook triggered by tag pushes
    AddTag(HookArgs),
}

#[derive(Args)]
pub struct HookArgs {
    /// Webhook target URL
    pub url: String,
    /// Branch filter for push events
    #[arg(long, default_value = "main")]
    pub branch: String,
    /// Disable TLS certificate verification for deliveries
    #[arg(long, help = "Do not verify the webhook target's TLS certificate")]
    pub insecure: bool,
}

#[derive(Subcommand)]
pub enum CommitCommand {
    /// List commits of a branch
    List {
        #[arg(long, default_value = "main")]
        branch: String,
        /// Print complete commit records instead of id/title/author
        #[arg(long, help = "Print the full commit records")]
        full: bool,
    },
    /// Revert a commit on a branch
    Revert {
        commit_id: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },
}

#[derive(Subcommand)]
pub enum FileCommand {
    /// Create a repository file
    Create(FileWriteArgs),
    /// Update a repository file
    Update(FileWriteArgs),
    /// Print a repository file
    Get {
        path: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },
    /// Check whether a repository file exists
    Exists {
        path: String,
        #[arg(long, default_value = "main")]
        branch: String,
        /// Fail on errors other than "not found" instead of reporting "missing"
        #[arg(long, help = "Only treat 404 as missing; report other failures")]
        strict: bool,
    },
}

#[derive(Args)]
pub struct FileWriteArgs {
    /// Path of the file inside the repository
    pub path: String,
    #[arg(long, default_value = "main")]
    pub branch: String,
    /// Literal file content
    #[arg(long, conflicts_with = "from_file", required_unless_present = "from_file")]
    pub content: Option<String>,
    /// Read the content from a local file
    #[arg(long)]
    pub from_file: Option<PathBuf>,
    /// Commit message
    #[arg(long, short = 'm')]
    pub message: String,
}

#[derive(Subcommand)]
pub enum TagCommand {
    /// Tag the head of a branch
    Create {
        name: String,
        #[arg(long, default_value = "main")]
        branch: String,
        #[arg(long, short = 'm')]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration with the token masked
    Show,
}
