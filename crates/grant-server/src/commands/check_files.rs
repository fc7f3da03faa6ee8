use grant_config::GrantConfig;
use grant_server::{UploadStore, maintenance};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `grant-tracker check-files`. Exits non-zero when rows and the
/// upload directory disagree.
pub async fn handle(config: &GrantConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = bootstrap::open_service(config).await?;
    let uploads = UploadStore::new(config.uploads.dir.clone());
    let report = maintenance::check_files(&service, &uploads).await?;
    output(&report, flags.format)?;

    if !report.is_consistent() {
        anyhow::bail!(
            "{} missing file(s), {} orphaned upload(s)",
            report.missing.len(),
            report.orphans.len()
        );
    }
    Ok(())
}
