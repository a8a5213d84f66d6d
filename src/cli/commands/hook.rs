use anyhow::Result;

use gitlab_manifests::GitLabServer;

use super::print_json;
use crate::cli::HookCommand;

pub async fn run(server: &GitLabServer, cmd: HookCommand) -> Result<()> {
    match cmd {
        HookCommand::List => {
            let hooks = server.list_project_hooks().await?;
            print_json(&hooks)?;
        }
        HookCommand::Exists { url } => {
            if server.project_hook_exists(&url).await? {
                println!("✅ project {} hook already exists", server.project_name());
            } else {
                println!("❌ no webhook with url {url}");
            }
        }
        HookCommand::AddPush(args) => {
            let message = server
                .create_project_hook_by_push(&args.url, &args.branch, true, !args.insecure)
                .await?;
            println!("🔗 {message}");
        }
        HookCommand::AddTag(args) => {
            let message = server
                .create_project_hook_by_tag(&args.url, &args.branch, true, !args.insecure)
                .await?;
            println!("🔗 {message}");
        }
    }
    Ok(())
}
