use grant_config::GrantConfig;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitReport {
    database: String,
    grants: u64,
}

/// Handle `grant-tracker init`.
pub async fn handle(config: &GrantConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = bootstrap::open_service(config).await?;
    let grants = service.count_grants().await?;
    tracing::info!(grants, "database ready");

    output(
        &InitReport {
            database: service.db().path().display().to_string(),
            grants,
        },
        flags.format,
    )
}
