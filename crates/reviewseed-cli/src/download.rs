//! Fetches the dataset splits from Hugging Face.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use reviewseed_core::{DatasetPaths, Error, Result};

const DATASET_BASE_URL: &str =
    "https://huggingface.co/datasets/SetFit/amazon_reviews_multi_ja/resolve/main";
const USER_AGENT: &str = "Mozilla/5.0";

/// Download URL of one split.
pub fn dataset_url(split: &str) -> String {
    format!("{}/{}.jsonl", DATASET_BASE_URL, split)
}

/// Stream `url` into `dest`. An existing file is kept unless `overwrite` is set.
///
/// The body is written to `dest.part` and renamed once complete. Returns
/// `true` if a download happened.
pub async fn download_file(client: &Client, url: &str, dest: &Path, overwrite: bool) -> Result<bool> {
    if dest.exists() && !overwrite {
        debug!("Keeping existing {}", dest.display());
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|e| Error::Download(format!("{}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let partial = dest.with_extension("jsonl.part");
    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("{}: {}", url, e)))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);
    tokio::fs::rename(&partial, dest).await?;

    info!("Downloaded {} ({} bytes) to {}", url, written, dest.display());
    Ok(true)
}

/// Make sure every split is present locally, downloading missing ones.
pub async fn ensure_dataset(paths: &DatasetPaths, force: bool) -> Result<()> {
    let client = Client::new();
    for (split, path) in &paths.splits {
        download_file(&client, &dataset_url(split), path, force).await?;
        info!("  - {}: {}", split, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_url() {
        assert_eq!(
            dataset_url("validation"),
            "https://huggingface.co/datasets/SetFit/amazon_reviews_multi_ja/resolve/main/validation.jsonl"
        );
    }

    #[tokio::test]
    async fn test_existing_files_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DatasetPaths::new(dir.path());
        for (_, path) in &paths.splits {
            std::fs::write(path, "{}\n").unwrap();
        }
        // no network access happens when every split is already present
        ensure_dataset(&paths, false).await.unwrap();
        for (_, path) in &paths.splits {
            assert_eq!(std::fs::read_to_string(path).unwrap(), "{}\n");
        }
    }
}
