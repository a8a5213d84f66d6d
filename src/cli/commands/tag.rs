use anyhow::Result;

use gitlab_manifests::GitLabServer;

use crate::cli::TagCommand;

pub async fn run(server: &GitLabServer, cmd: TagCommand) -> Result<()> {
    match cmd {
        TagCommand::Create { name, branch, message } => {
            let tag = server.create_tag(&branch, &name, &message).await?;
            match tag.target.as_deref() {
                Some(target) => println!("🏷️  created tag {} at {target}", tag.name),
                None => println!("🏷️  created tag {}", tag.name),
            }
        }
    }
    Ok(())
}
