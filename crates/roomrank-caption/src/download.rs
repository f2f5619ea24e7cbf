//! Fetches the numbered room photos (`1.jpg`..`N.jpg`) from the image bucket.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// `(file name, url)` for images `1..=count`.
pub fn image_urls(base_url: &str, count: usize) -> Vec<(String, String)> {
    (1..=count)
        .map(|i| {
            let name = format!("{i}.jpg");
            let url = format!("{base_url}{name}");
            (name, url)
        })
        .collect()
}

/// Download missing images into `out_dir`. Files already on disk are left
/// alone; a failed image is logged and skipped.
pub fn download_images(base_url: &str, out_dir: &Path, count: usize, timeout_secs: u64) -> Result<DownloadSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let pending: Vec<(String, String)> =
        image_urls(base_url, count).into_iter().filter(|(name, _)| !out_dir.join(name).exists()).collect();
    let mut summary = DownloadSummary { skipped: count - pending.len(), ..Default::default() };
    if pending.is_empty() {
        info!(dir = %out_dir.display(), skipped = summary.skipped, "all images already present");
        return Ok(summary);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .context("download http client")?;
    let fetched = store_all(&pending, out_dir, |url| fetch(&client, url));
    summary.downloaded = fetched.downloaded;
    summary.failed = fetched.failed;
    info!(downloaded = summary.downloaded, skipped = summary.skipped, failed = summary.failed, "images downloaded");
    Ok(summary)
}

/// Fetch and write each pending image. A failure on either step is logged
/// and counted; the remaining images are still attempted.
fn store_all<F>(pending: &[(String, String)], out_dir: &Path, mut fetch: F) -> DownloadSummary
where
    F: FnMut(&str) -> Result<Vec<u8>>,
{
    let mut summary = DownloadSummary::default();
    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    for (name, url) in pending {
        pb.set_message(name.clone());
        let dest = out_dir.join(name);
        let stored = fetch(url).and_then(|bytes| fs::write(&dest, bytes).with_context(|| format!("writing {}", dest.display())));
        match stored {
            Ok(()) => summary.downloaded += 1,
            Err(e) => {
                warn!(%url, error = %format!("{e:#}"), "download failed");
                summary.failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    summary
}

fn fetch(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().with_context(|| format!("GET {url}"))?;
    if !response.status().is_success() {
        bail!("GET {url}: HTTP {}", response.status());
    }
    Ok(response.bytes().context("reading body")?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_is_counted_and_the_rest_still_land() {
        let dir = tempfile::tempdir().unwrap();
        let pending = vec![
            ("no-such-dir/1.jpg".to_string(), "https://bucket/1.jpg".to_string()),
            ("2.jpg".to_string(), "https://bucket/2.jpg".to_string()),
        ];

        let summary = store_all(&pending, dir.path(), |_| Ok(vec![1, 2, 3]));

        assert_eq!(summary, DownloadSummary { downloaded: 1, skipped: 0, failed: 1 });
        assert_eq!(fs::read(dir.path().join("2.jpg")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn fetch_failure_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let pending = vec![("1.jpg".to_string(), "https://bucket/1.jpg".to_string())];

        let summary = store_all(&pending, dir.path(), |url| bail!("GET {url}: HTTP 404"));

        assert_eq!(summary.failed, 1);
        assert!(!dir.path().join("1.jpg").exists());
    }
}
