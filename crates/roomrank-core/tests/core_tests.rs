use std::path::Path;
use tempfile::TempDir;

use roomrank_core::catalog_io::{read_records, read_records_from, write_records};
use roomrank_core::config::{expand_path, resolve_with_base, Config, RankingSettings};
use roomrank_core::error::Error;
use roomrank_core::types::CatalogRecord;

fn record(url: &str, caption: &str) -> CatalogRecord {
    CatalogRecord {
        image_path: format!("hotel_images/{}", url.rsplit('/').next().unwrap_or(url)),
        caption: caption.to_string(),
        image_url: url.to_string(),
        caption_error: None,
    }
}

#[test]
fn catalog_csv_survives_write_and_read() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/captions.csv");
    let mut failed = record("https://img/3.jpg", "");
    failed.caption_error = Some("timeout".to_string());
    let records = vec![
        record("https://img/1.jpg", "**bed_count:** 1xDouble\nview: sea, with \"quotes\""),
        record("https://img/2.jpg", "view: city"),
        failed,
    ];

    write_records(&path, &records).expect("write");
    let back = read_records(&path).expect("read");

    assert_eq!(back, records);
    assert!(!back[0].is_failed());
    assert!(back[2].is_failed());
}

#[test]
fn reading_accepts_the_minimal_two_column_layout() {
    let csv = "image_url,caption\nhttps://img/1.jpg,view: sea\n";
    let records = read_records_from(csv.as_bytes()).expect("read");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].caption, "view: sea");
    assert_eq!(records[0].image_path, "");
    assert_eq!(records[0].caption_error, None);
}

#[test]
fn missing_caption_column_is_an_invalid_catalog() {
    let csv = "image_path,image_url\na.jpg,https://img/1.jpg\n";
    let err = read_records_from(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::InvalidCatalog(ref m) if m.contains("caption")), "got {err}");
}

#[test]
fn missing_file_surfaces_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = read_records(&tmp.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!err.is_caller_error());
}

#[test]
fn config_defaults_apply_without_files() {
    figment::Jail::expect_with(|_jail| {
        let config = Config::load().map_err(|e| e.to_string())?;
        let ranking = config.ranking().map_err(|e| e.to_string())?;
        assert_eq!(ranking, RankingSettings::default());
        assert!((ranking.boost - 0.3).abs() < f32::EPSILON);
        assert!((ranking.threshold - 0.60).abs() < f32::EPSILON);
        let caption = config.caption().map_err(|e| e.to_string())?;
        assert_eq!(caption.image_count, 25);
        Ok(())
    });
}

#[test]
fn config_file_then_env_overrides() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [ranking]
            boost = 0.5
            threshold = 0.7

            [data]
            catalog_csv = "captions.csv"
            "#,
        )?;
        jail.set_env("APP_RANKING__THRESHOLD", "0.65");
        let config = Config::load().map_err(|e| e.to_string())?;
        let ranking = config.ranking().map_err(|e| e.to_string())?;
        assert!((ranking.boost - 0.5).abs() < f32::EPSILON);
        assert!((ranking.threshold - 0.65).abs() < f32::EPSILON);
        assert_eq!(ranking.top_k, 5, "unset keys keep defaults");
        let data = config.data().map_err(|e| e.to_string())?;
        assert_eq!(data.catalog_csv, "captions.csv");
        assert_eq!(data.image_dir, "hotel_images");
        Ok(())
    });
}

#[test]
fn config_rejects_negative_boost() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[ranking]\nboost = -1.0\n")?;
        assert!(Config::load().is_err());
        Ok(())
    });
}

#[test]
fn invalid_ranking_settings_are_caller_errors() {
    let zero_k = RankingSettings { top_k: 0, ..RankingSettings::default() };
    let err = zero_k.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("top_k")), "got {err}");
    assert!(err.is_caller_error());

    let nan_threshold = RankingSettings { threshold: f32::NAN, ..RankingSettings::default() };
    assert!(matches!(nan_threshold.validate(), Err(Error::InvalidConfig(_))));
    assert!(RankingSettings::default().validate().is_ok());
}

#[test]
fn path_helpers_expand_and_resolve() {
    std::env::set_var("ROOMRANK_TEST_DIR", "/srv/rooms");
    assert_eq!(expand_path("${ROOMRANK_TEST_DIR}/a.csv"), Path::new("/srv/rooms/a.csv"));
    assert_eq!(resolve_with_base(Path::new("/base"), "b.csv"), Path::new("/base/b.csv"));
    assert_eq!(resolve_with_base(Path::new("/base"), "/abs/c.csv"), Path::new("/abs/c.csv"));
}
