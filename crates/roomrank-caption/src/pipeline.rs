//! Image directory → captions → catalog CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use roomrank_core::catalog_io::write_records;
use roomrank_core::traits::Captioner;
use roomrank_core::types::{CaptionOutcome, CatalogRecord};

use crate::cached::CachedCaptioner;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Image files directly under `dir`. Numeric stems sort numerically
/// (`2.jpg` before `10.jpg`), everything else by name after them.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("image directory {} does not exist", dir.display());
    }
    let mut images: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    images.sort_by_key(|p| {
        let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        (stem.parse::<u64>().unwrap_or(u64::MAX), p.file_name().map(|n| n.to_os_string()))
    });
    Ok(images)
}

/// Caption every image; `image_url` is `base_url` plus the file name.
pub fn build_records<C: Captioner>(captioner: &mut CachedCaptioner<C>, images: &[PathBuf], base_url: &str) -> Vec<CatalogRecord> {
    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} captions {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let records = images
        .iter()
        .map(|path| {
            let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            pb.set_message(file_name.clone());
            let (caption, caption_error) = match captioner.describe(path) {
                CaptionOutcome::Described(text) => (text, None),
                CaptionOutcome::Failed(reason) => (String::new(), Some(reason)),
            };
            pb.inc(1);
            CatalogRecord {
                image_path: path.to_string_lossy().into_owned(),
                caption,
                image_url: format!("{base_url}{file_name}"),
                caption_error,
            }
        })
        .collect();
    pb.finish_and_clear();
    records
}

/// Caption the images in `image_dir` and write the catalog CSV to `out_csv`.
pub fn write_catalog<C: Captioner>(
    captioner: &mut CachedCaptioner<C>,
    image_dir: &Path,
    base_url: &str,
    out_csv: &Path,
) -> Result<Vec<CatalogRecord>> {
    let images = list_images(image_dir)?;
    let records = build_records(captioner, &images, base_url);
    write_records(out_csv, &records).with_context(|| format!("writing catalog {}", out_csv.display()))?;
    let failed = records.iter().filter(|r| r.is_failed()).count();
    info!(images = records.len(), failed, csv = %out_csv.display(), "catalog written");
    Ok(records)
}
