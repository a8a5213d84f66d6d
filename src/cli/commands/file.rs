use anyhow::Result;

use gitlab_manifests::{GitLabServer, LocalFileContent};

use crate::cli::{FileCommand, FileWriteArgs};

#[derive(Clone, Copy)]
enum Mode {
    Create,
    Update,
}

async fn write(server: &GitLabServer, mode: Mode, args: FileWriteArgs) -> Result<String> {
    let FileWriteArgs {
        path,
        branch,
        content,
        from_file,
        message,
    } = args;

    let status = match (mode, from_file) {
        (Mode::Create, Some(local)) => {
            server
                .create_file_rendered(&branch, &path, &LocalFileContent::new(local), &message)
                .await?
        }
        (Mode::Update, Some(local)) => {
            server
                .update_file_rendered(&branch, &path, &LocalFileContent::new(local), &message)
                .await?
        }
        (Mode::Create, None) => {
            server
                .create_file(&branch, &path, content.as_deref().unwrap_or_default(), &message)
                .await?
        }
        (Mode::Update, None) => {
            server
                .update_file(&branch, &path, content.as_deref().unwrap_or_default(), &message)
                .await?
        }
    };
    Ok(status)
}

pub async fn run(server: &GitLabServer, cmd: FileCommand) -> Result<()> {
    match cmd {
        FileCommand::Create(args) => println!("📄 {}", write(server, Mode::Create, args).await?),
        FileCommand::Update(args) => println!("📄 {}", write(server, Mode::Update, args).await?),
        FileCommand::Get { path, branch } => {
            let content = server.get_raw_file(&branch, &path).await?;
            print!("{content}");
        }
        FileCommand::Exists { path, branch, strict } => {
            let exists = if strict {
                server.try_file_exists(&branch, &path).await?
            } else {
                server.file_exists(&branch, &path).await
            };
            if exists {
                println!("✅ {path} exists on {branch}");
            } else {
                println!("❌ {path} does not exist on {branch}");
            }
        }
    }
    Ok(())
}
