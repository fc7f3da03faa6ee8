use grant_config::GrantConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &GrantConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Init => commands::init::handle(config, flags).await,
        Commands::Import(args) => commands::import::handle(&args, config, flags).await,
        Commands::CheckFiles => commands::check_files::handle(config, flags).await,
    }
}
