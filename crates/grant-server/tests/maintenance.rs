use std::path::PathBuf;

use grant_core::entities::{ImportSummary, NewApplicationFile, NewGrant};
use grant_db::service::GrantService;
use grant_server::UploadStore;
use grant_server::maintenance::{MissingFile, check_files, import_file};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn setup() -> (TempDir, GrantService, UploadStore) {
    let dir = tempfile::tempdir().unwrap();
    let service = GrantService::new_local(dir.path().join("grants.db"))
        .await
        .unwrap();
    let uploads = UploadStore::new(dir.path().join("uploads"));
    (dir, service, uploads)
}

#[tokio::test]
async fn import_skips_existing_and_counts_failures() {
    let (dir, service, _) = setup().await;
    service.insert_grant(&NewGrant::named("Existing")).await.unwrap();

    let path = dir.path().join("grants.json");
    std::fs::write(
        &path,
        r#"[
            {"name": "Existing"},
            {"name": "Arts Council", "amount": 15000, "priority": "HIGH", "deadline": "Rolling"},
            {"name": "Lottery", "documents_needed": ["budget", "constitution"]},
            {"amount": "no name here"}
        ]"#,
    )
    .unwrap();

    let summary = import_file(&service, &path).await.unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            imported: 2,
            skipped: 1,
            failed: 1,
        }
    );

    let grants = service.list_grants().await.unwrap();
    let arts = grants.iter().find(|g| g.name == "Arts Council").unwrap();
    assert_eq!(arts.amount.as_deref(), Some("15000"));
    assert_eq!(arts.ease, Some(3));
    assert_eq!(arts.status.as_str(), "Not Started");

    // Running the same import again changes nothing.
    let again = import_file(&service, &path).await.unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 3);
}

#[tokio::test]
async fn import_rejects_non_array_documents() {
    let (dir, service, _) = setup().await;
    let path = dir.path().join("grants.json");
    std::fs::write(&path, r#"{"name": "Not a list"}"#).unwrap();

    let err = import_file(&service, &path).await.unwrap_err();
    assert!(err.to_string().contains("not a JSON array"));
    assert_eq!(service.count_grants().await.unwrap(), 0);
}

#[tokio::test]
async fn check_files_reports_missing_and_orphans() {
    let (_dir, service, uploads) = setup().await;
    let grant = service.insert_grant(&NewGrant::named("Trust")).await.unwrap();

    let kept = uploads.save("kept.pdf", b"kept").await.unwrap();
    let gone = uploads.save("gone.pdf", b"gone").await.unwrap();
    let orphan = uploads.save("orphan.pdf", b"orphan").await.unwrap();

    for path in [&kept, &gone] {
        service
            .insert_file(
                grant.id,
                &NewApplicationFile {
                    file_name: "x.pdf".into(),
                    file_path: path.to_string_lossy().into_owned(),
                    ..NewApplicationFile::default()
                },
            )
            .await
            .unwrap();
    }
    std::fs::remove_file(&gone).unwrap();

    let report = check_files(&service, &uploads).await.unwrap();
    assert!(!report.is_consistent());
    assert_eq!(report.rows_checked, 2);
    assert_eq!(report.files_on_disk, 2);
    assert_eq!(
        report.missing,
        vec![MissingFile {
            id: 2,
            file_path: gone.to_string_lossy().into_owned(),
        }]
    );
    assert_eq!(report.orphans, vec![orphan]);
}

#[tokio::test]
async fn empty_store_is_consistent() {
    let (_dir, service, uploads) = setup().await;
    let report = check_files(&service, &uploads).await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.orphans, Vec::<PathBuf>::new());
}
