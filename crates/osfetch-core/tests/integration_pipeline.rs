//! Integration tests: local HTTP server standing in for the hosting service,
//! real downloads, tarball extraction and freshness comparison.

mod common;

use common::osf_server::{self, Route};
use flate2::write::GzEncoder;
use flate2::Compression;
use osfetch_core::config::OsfConfig;
use osfetch_core::extract;
use osfetch_core::fetch::fetch_to_path;
use osfetch_core::freshness::{DateZone, Side};
use osfetch_core::metadata::fetch_updated_date;
use osfetch_core::pipeline::{Pipeline, Request};
use osfetch_core::progress::Progress;
use osfetch_core::OsfError;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

/// 2024-01-12T00:00:00Z
const JAN_12: u64 = 1_705_017_600;

fn metadata_json(dates: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<String> = dates
        .iter()
        .map(|(date, kind)| format!(r#"{{"date": "{}", "dateType": "{}"}}"#, date, kind))
        .collect();
    format!(r#"{{"dates": [{}]}}"#, entries.join(", ")).into_bytes()
}

fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

fn config_for(base: &str, files: &[(&str, &str)]) -> OsfConfig {
    OsfConfig {
        base_url: base.to_string(),
        date_zone: DateZone::Utc,
        files: files
            .iter()
            .map(|(n, k)| (n.to_string(), k.to_string()))
            .collect::<BTreeMap<_, _>>(),
        ..OsfConfig::default()
    }
}

/// Gzipped tarball of `src`, stored under `prefix/` inside the archive.
fn tar_gz_of(src: &Path, prefix: &str) -> Vec<u8> {
    let enc = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(enc);
    builder.append_dir_all(prefix, src).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn fetch_writes_all_blocks_and_reports_progress() {
    let payload = body(3 * 1024 * 1024 + 17);
    let mut routes = HashMap::new();
    routes.insert("/abcde/download".to_string(), Route::ok(payload.clone()));
    let base = osf_server::start(routes);

    let dir = tempdir().unwrap();
    let dest = dir.path().join("data.bin");
    let mut seen: Vec<Progress> = Vec::new();
    let outcome = fetch_to_path(
        &format!("{}/abcde/download", base),
        &dest,
        1024 * 1024,
        &mut |p| seen.push(p),
    )
    .expect("fetch");

    assert_eq!(outcome.bytes_written, payload.len() as u64);
    assert_eq!(outcome.declared_len, payload.len() as u64);
    assert_eq!(fs::read(&dest).unwrap(), payload);

    // Three full blocks, then the final report.
    let counts: Vec<u64> = seen.iter().map(|p| p.bytes_written).collect();
    assert_eq!(
        counts,
        vec![1 << 20, 2 << 20, 3 << 20, payload.len() as u64]
    );
    assert!(seen.iter().all(|p| p.total == Some(payload.len() as u64)));
}

#[test]
fn fetch_follows_redirect_and_uses_final_length() {
    let payload = body(4096);
    let mut routes = HashMap::new();
    routes.insert("/k1/download".to_string(), Route::redirect("/storage/k1"));
    routes.insert("/storage/k1".to_string(), Route::ok(payload.clone()));
    let base = osf_server::start(routes);

    let dir = tempdir().unwrap();
    let dest = dir.path().join("k1");
    let outcome = fetch_to_path(&format!("{}/k1/download", base), &dest, 1024, &mut |_| {})
        .expect("fetch");
    assert_eq!(outcome.declared_len, 4096);
    assert_eq!(fs::read(&dest).unwrap(), payload);
}

#[test]
fn fetch_truncated_body_is_download_incomplete() {
    let mut routes = HashMap::new();
    routes.insert(
        "/short/download".to_string(),
        Route::truncated(body(1000), 2000),
    );
    let base = osf_server::start(routes);

    let dir = tempdir().unwrap();
    let dest = dir.path().join("short.bin");
    let err = fetch_to_path(&format!("{}/short/download", base), &dest, 256, &mut |_| {})
        .unwrap_err();
    match err {
        OsfError::DownloadIncomplete {
            declared, written, ..
        } => {
            assert_eq!(declared, 2000);
            assert_eq!(written, 1000);
        }
        other => panic!("expected DownloadIncomplete, got {:?}", other),
    }
    // Partial file is left in place.
    assert_eq!(fs::metadata(&dest).unwrap().len(), 1000);
}

#[test]
fn fetch_without_content_length_succeeds() {
    let payload = body(5000);
    let mut routes = HashMap::new();
    routes.insert("/nolen/download".to_string(), Route::r#unsized(payload.clone()));
    let base = osf_server::start(routes);

    let dir = tempdir().unwrap();
    let dest = dir.path().join("nolen.bin");
    let mut last = None;
    let outcome = fetch_to_path(&format!("{}/nolen/download", base), &dest, 1024, &mut |p| {
        last = Some(p)
    })
    .expect("fetch");
    assert_eq!(outcome.declared_len, 0);
    assert_eq!(outcome.bytes_written, 5000);
    assert_eq!(
        last,
        Some(Progress {
            bytes_written: 5000,
            total: None
        })
    );
}

#[test]
fn fetch_http_error_is_reported() {
    let base = osf_server::start(HashMap::new());
    let dir = tempdir().unwrap();
    let err = fetch_to_path(
        &format!("{}/missing/download", base),
        &dir.path().join("x"),
        1024,
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, OsfError::Http { status: 404, .. }), "{err:?}");
}

#[test]
fn metadata_endpoint_returns_updated_date() {
    let mut routes = HashMap::new();
    routes.insert(
        "/j65tw/metadata?format=datacite-json".to_string(),
        Route::ok(metadata_json(&[
            ("2020-06-01", "Created"),
            ("2024-01-10", "Updated"),
        ])),
    );
    let base = osf_server::start(routes);
    let date = fetch_updated_date(&format!("{}/j65tw/metadata?format=datacite-json", base))
        .expect("metadata");
    assert_eq!(date, "2024-01-10");
}

#[test]
fn extraction_round_trips_a_directory() {
    let src = tempdir().unwrap();
    fs::create_dir_all(src.path().join("nested/deeper")).unwrap();
    fs::write(src.path().join("top.txt"), b"top level").unwrap();
    fs::write(src.path().join("nested/mid.bin"), body(70_000)).unwrap();
    fs::write(src.path().join("nested/deeper/leaf.dat"), b"").unwrap();

    let work = tempdir().unwrap();
    let archive = work.path().join("bundle.tar.gz");
    fs::write(&archive, tar_gz_of(src.path(), "bundle")).unwrap();

    let out = extract::extract_archive(&archive).expect("extract");
    assert!(!archive.exists(), "archive must be removed");
    assert_eq!(out.extracted_dir, work.path().join("bundle"));

    for rel in ["top.txt", "nested/mid.bin", "nested/deeper/leaf.dat"] {
        assert_eq!(
            fs::read(work.path().join("bundle").join(rel)).unwrap(),
            fs::read(src.path().join(rel)).unwrap(),
            "{rel} differs"
        );
    }
}

#[test]
fn pipeline_downloads_extracts_and_reports_local_newer() {
    let src = tempdir().unwrap();
    let stamp = UNIX_EPOCH + Duration::from_secs(JAN_12);
    for (name, data) in [("einstein.png", body(2048)), ("goldhill.png", body(999))] {
        let path = src.path().join(name);
        fs::write(&path, &data).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(stamp - Duration::from_secs(86_400))
            .unwrap();
    }
    File::options()
        .write(true)
        .open(src.path().join("goldhill.png"))
        .unwrap()
        .set_modified(stamp)
        .unwrap();

    let mut routes = HashMap::new();
    routes.insert(
        "/j65tw/download".to_string(),
        Route::ok(tar_gz_of(src.path(), "ssim_images")),
    );
    routes.insert(
        "/j65tw/metadata?format=datacite-json".to_string(),
        Route::ok(metadata_json(&[("2024-01-10", "Updated")])),
    );
    let base = osf_server::start(routes);

    let work = tempdir().unwrap();
    let pipeline = Pipeline::new(config_for(&base, &[("ssim_images.tar.gz", "j65tw")]));
    let request = Request {
        target: "ssim_images.tar.gz".to_string(),
        output: Some(work.path().join("ssim_images.tar.gz")),
        extract: true,
    };
    let report = pipeline.run(&request, &mut |_| {}).expect("pipeline");

    assert_eq!(report.resource.key.as_str(), "j65tw");
    assert!(!report.download_path.exists());
    let extracted = report.extracted.as_ref().expect("extracted");
    assert_eq!(extracted.extracted_dir, work.path().join("ssim_images"));
    assert_eq!(
        fs::read(work.path().join("ssim_images/einstein.png")).unwrap(),
        body(2048)
    );
    assert_eq!(report.remote_updated, "2024-01-10");
    assert_eq!(report.local_newest, stamp);
    assert_eq!(report.freshness.newer(), Side::Local);
    assert_eq!(report.freshness.magnitude_secs(), 172_800.0);
}

#[test]
fn pipeline_skips_extraction_for_plain_files() {
    let mut routes = HashMap::new();
    routes.insert("/ndtc7/download".to_string(), Route::ok(body(300)));
    routes.insert(
        "/ndtc7/metadata?format=datacite-json".to_string(),
        Route::ok(metadata_json(&[("2001-01-01", "Updated")])),
    );
    let base = osf_server::start(routes);

    let work = tempdir().unwrap();
    let pipeline = Pipeline::new(config_for(&base, &[("ssim_analysis.mat", "ndtc7")]));
    let request = Request {
        target: "ssim_analysis.mat".to_string(),
        output: Some(work.path().join("ssim_analysis.mat")),
        extract: true,
    };
    let report = pipeline.run(&request, &mut |_| {}).expect("pipeline");
    assert!(report.extracted.is_none());
    assert_eq!(report.local_path, work.path().join("ssim_analysis.mat"));
    assert!(report.local_path.exists());
    assert_eq!(report.freshness.newer(), Side::Local);
    assert!(report.local_newest > SystemTime::UNIX_EPOCH);
}

#[test]
fn pipeline_halts_on_ambiguous_metadata() {
    let mut routes = HashMap::new();
    routes.insert("/q9kn8/download".to_string(), Route::ok(body(10)));
    routes.insert(
        "/q9kn8/metadata?format=datacite-json".to_string(),
        Route::ok(metadata_json(&[
            ("2023-01-01", "Updated"),
            ("2024-01-01", "Updated"),
        ])),
    );
    let base = osf_server::start(routes);

    let work = tempdir().unwrap();
    let pipeline = Pipeline::new(config_for(&base, &[]));
    let request = Request {
        target: "q9kn8".to_string(),
        output: Some(work.path().join("q9kn8")),
        extract: true,
    };
    let err = pipeline.run(&request, &mut |_| {}).unwrap_err();
    assert!(
        matches!(err, OsfError::MetadataAmbiguous { found: 2, .. }),
        "{err:?}"
    );
    // Earlier stages' output is not cleaned up.
    assert!(work.path().join("q9kn8").exists());
}
