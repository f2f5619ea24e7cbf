use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;

use roomrank_caption::{download_images, image_urls, list_images, write_catalog, CachedCaptioner};
use roomrank_core::cache::MemoryCache;
use roomrank_core::catalog_io::read_records;
use roomrank_core::traits::Captioner;
use roomrank_core::types::CaptionOutcome;

/// Describes every image by file name, except names listed in `failing`.
struct StubCaptioner {
    failing: Vec<&'static str>,
    calls: RefCell<Vec<PathBuf>>,
}

impl StubCaptioner {
    fn new(failing: Vec<&'static str>) -> Self {
        Self { failing, calls: RefCell::new(Vec::new()) }
    }
}

impl Captioner for StubCaptioner {
    fn caption(&self, image: &Path) -> anyhow::Result<String> {
        self.calls.borrow_mut().push(image.to_path_buf());
        let name = image.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if self.failing.contains(&name) {
            bail!("vision model unavailable");
        }
        Ok(format!("**View:** sea\nmax_guest_capacity: 2 ({name})"))
    }
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"\xff\xd8\xff").unwrap();
    path
}

#[test]
fn successful_captions_are_cached() {
    let dir = tempfile::tempdir().unwrap();
    let image = touch(dir.path(), "1.jpg");
    let mut captioner = CachedCaptioner::new(StubCaptioner::new(vec![]), MemoryCache::new());

    let first = captioner.describe(&image);
    let second = captioner.describe(&image);

    assert_eq!(first, second);
    assert!(!first.is_failed());
    assert_eq!(captioner.inner().calls.borrow().len(), 1);
    assert_eq!(captioner.cache_stats().hits, 1);
}

#[test]
fn cache_is_keyed_by_image_path() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = touch(dir.path(), "1.jpg");
    let fresh = touch(dir.path(), "2.jpg");
    let mut cache: MemoryCache<PathBuf, CaptionOutcome> = MemoryCache::new();
    cache.set(seeded.clone(), CaptionOutcome::Described("view: garden".to_string()));
    let mut captioner = CachedCaptioner::new(StubCaptioner::new(vec![]), cache);

    assert_eq!(captioner.describe(&seeded), CaptionOutcome::Described("view: garden".to_string()));
    let described = captioner.describe(&fresh);
    assert_eq!(captioner.describe(&fresh), described);

    assert_eq!(*captioner.inner().calls.borrow(), vec![fresh]);
    assert_eq!(captioner.cache_stats().hits, 2);
}

#[test]
fn failures_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let image = touch(dir.path(), "7.jpg");
    let mut captioner = CachedCaptioner::new(StubCaptioner::new(vec!["7.jpg"]), MemoryCache::new());

    let first = captioner.describe(&image);
    let second = captioner.describe(&image);

    assert!(matches!(first, CaptionOutcome::Failed(ref reason) if reason.contains("vision model unavailable")));
    assert_eq!(first.description(), None);
    assert!(second.is_failed());
    assert_eq!(captioner.inner().calls.borrow().len(), 2);
}

#[test]
fn list_images_sorts_numerically_and_ignores_other_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["10.jpg", "2.jpg", "1.JPG", "lobby.png", "notes.txt"] {
        touch(dir.path(), name);
    }
    fs::create_dir(dir.path().join("nested")).unwrap();
    touch(&dir.path().join("nested"), "3.jpg");

    let names: Vec<String> = list_images(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["1.JPG", "2.jpg", "10.jpg", "lobby.png"]);
}

#[test]
fn missing_image_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(list_images(&dir.path().join("absent")).is_err());
}

#[test]
fn pipeline_writes_a_loadable_catalog_with_failures_marked() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("hotel_images");
    fs::create_dir(&images).unwrap();
    touch(&images, "1.jpg");
    touch(&images, "2.jpg");
    let csv = dir.path().join("out").join("captions.csv");
    let mut captioner = CachedCaptioner::new(StubCaptioner::new(vec!["2.jpg"]), MemoryCache::new());

    let records = write_catalog(&mut captioner, &images, "https://bucket/HotelImages/", &csv).unwrap();
    let reread = read_records(&csv).unwrap();

    assert_eq!(records, reread);
    assert_eq!(reread[0].image_url, "https://bucket/HotelImages/1.jpg");
    assert!(reread[0].caption.contains("max_guest_capacity: 2"));
    assert!(!reread[0].is_failed());
    assert!(reread[1].is_failed());
    assert!(reread[1].caption.is_empty());
}

#[test]
fn image_urls_are_numbered_from_one() {
    let urls = image_urls("https://bucket/", 3);
    assert_eq!(urls[0], ("1.jpg".to_string(), "https://bucket/1.jpg".to_string()));
    assert_eq!(urls[2].1, "https://bucket/3.jpg");
}

#[test]
fn download_skips_images_already_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "1.jpg");
    touch(dir.path(), "2.jpg");

    // every image is present, so no request is made
    let summary = download_images("http://127.0.0.1:9/", dir.path(), 2, 1).unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.downloaded, 0);
    assert_eq!(summary.failed, 0);
}
