mod common;

use common::{memory_store, RecordingApi};
use dengue_sentinel::ledger::PointsLedger;
use dengue_sentinel::verify::{submit_task, SubmitError};
use std::io::Write;

fn photo() -> Result<tempfile::NamedTempFile, std::io::Error> {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile()?;
    file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])?;
    Ok(file)
}

#[tokio::test]
async fn verified_gutter_task_credits_its_fixed_reward() -> Result<(), Box<dyn std::error::Error>> {
    let pool = memory_store().await?;
    let mut ledger = PointsLedger::load(pool).await?;
    assert_eq!(ledger.balance(), 0);

    let api = RecordingApi::default();
    let file = photo()?;
    let outcome = submit_task(&api, "user_123", "gutter", file.path()).await?;
    assert!(outcome.verified);

    // The server's points_earned is ignored in favour of the local table.
    let credited = ledger.credit_task("gutter").await?;
    assert_eq!(credited, 150);
    assert_eq!(ledger.balance(), 150);

    let sent = api.last_image.lock().map_err(|e| e.to_string())?.clone();
    assert!(sent.is_some_and(|image| image.starts_with("data:image/jpeg;base64,")));
    Ok(())
}

#[tokio::test]
async fn non_image_is_refused_before_upload() -> Result<(), Box<dyn std::error::Error>> {
    let api = RecordingApi::default();
    let file = tempfile::Builder::new().suffix(".txt").tempfile()?;

    let result = submit_task(&api, "user_123", "general", file.path()).await;

    assert!(matches!(result, Err(SubmitError::NotImage { .. })));
    assert_eq!(api.verify_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn rejected_photo_reports_not_verified() -> Result<(), Box<dyn std::error::Error>> {
    let api = RecordingApi {
        reject_verification: true,
        ..RecordingApi::default()
    };
    let file = photo()?;

    let outcome = submit_task(&api, "user_123", "flowerpot", file.path()).await?;

    assert!(!outcome.verified);
    assert_eq!(api.verify_calls(), 1);
    Ok(())
}
