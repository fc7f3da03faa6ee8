use grant_config::GrantConfig;
use grant_server::maintenance;

use crate::bootstrap;
use crate::cli::{GlobalFlags, ImportArgs};
use crate::output::output;

/// Handle `grant-tracker import <file>`.
pub async fn handle(
    args: &ImportArgs,
    config: &GrantConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = bootstrap::open_service(config).await?;
    let summary = maintenance::import_file(&service, &args.file).await?;
    output(&summary, flags.format)
}
