use std::sync::Arc;

use anyhow::Context;
use grant_config::GrantConfig;
use grant_db::service::GrantService;

/// Load `.env`, layered configuration, and reject unusable values.
pub fn load_config() -> anyhow::Result<GrantConfig> {
    let config = GrantConfig::load_with_dotenv().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::debug!(
        database = %config.database.path.display(),
        uploads = %config.uploads.dir.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Open the database named in `config`, running migrations.
pub async fn open_service(config: &GrantConfig) -> anyhow::Result<Arc<GrantService>> {
    let service = GrantService::from_config(&config.database)
        .await
        .with_context(|| {
            format!(
                "failed to open grant database at {}",
                config.database.path.display()
            )
        })?;
    Ok(Arc::new(service))
}
