use crate::api::{ApiError, SentinelApi};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sentinel_core::models::VerifyRequest;
use sentinel_core::VerifyOutcome;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not an image ({mime})")]
    NotImage { path: PathBuf, mime: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Read a photo and encode it as a `data:` URL.
pub async fn encode_photo(path: &Path) -> Result<String, SubmitError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(SubmitError::NotImage {
            path: path.to_path_buf(),
            mime: mime.essence_str().to_string(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SubmitError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        STANDARD.encode(bytes)
    ))
}

pub async fn submit_task(
    api: &dyn SentinelApi,
    user_id: &str,
    task_id: &str,
    photo: &Path,
) -> Result<VerifyOutcome, SubmitError> {
    let image = encode_photo(photo).await?;
    info!(task_id, photo = %photo.display(), bytes = image.len(), "submitting task evidence");

    let outcome = api
        .verify_task(&VerifyRequest {
            user_id: user_id.to_string(),
            task_id: task_id.to_string(),
            image,
        })
        .await?;
    Ok(outcome)
}

pub fn expand_path(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches('"').trim_matches('\'');
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use std::io::Write;

    #[tokio::test]
    async fn photo_becomes_data_url() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile()?;
        file.write_all(b"png-bytes")?;

        let url = encode_photo(file.path()).await?;
        assert_eq!(url, format!("data:image/png;base64,{}", STANDARD.encode(b"png-bytes")));
        Ok(())
    }

    #[tokio::test]
    async fn non_image_is_rejected_before_upload() -> Result<(), Box<dyn std::error::Error>> {
        let file = tempfile::Builder::new().suffix(".txt").tempfile()?;
        let api = FakeApi::default();

        let result = submit_task(&api, "user_123", "gutter", file.path()).await;
        assert!(matches!(result, Err(SubmitError::NotImage { .. })));
        assert_eq!(api.verify_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn upload_carries_task_and_user() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile()?;
        file.write_all(b"jpeg")?;
        let api = FakeApi::default();

        let outcome = submit_task(&api, "user_123", "flowerpot", file.path()).await?;
        assert!(outcome.verified);

        let sent = api.last_verify().ok_or("no request recorded")?;
        assert_eq!(sent.task_id, "flowerpot");
        assert_eq!(sent.user_id, "user_123");
        assert!(sent.image.starts_with("data:image/jpeg;base64,"));
        Ok(())
    }

    #[test]
    fn quotes_are_stripped() {
        assert_eq!(expand_path(" '/tmp/a.png' "), PathBuf::from("/tmp/a.png"));
    }
}
