use anyhow::Result;

use gitlab_manifests::AppConfig;

use crate::cli::ConfigCommand;

pub fn run(app_config: &AppConfig, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            print!("{}", app_config.redacted().to_toml()?);
            if app_config.gitlab.token.is_none() {
                println!();
                println!("⚠️  No token configured: export GITLAB_TOKEN or set gitlab.token");
            }
        }
    }
    Ok(())
}
