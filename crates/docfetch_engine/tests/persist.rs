use std::fs;

use docfetch_engine::{
    ensure_output_dir, hash_file, verify_download, PartialDownload, VerifyError,
};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("nested").join("downloads");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn file_in_place_of_output_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
}

#[tokio::test]
async fn finished_download_lands_at_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("20240301-UN-R155.pdf");

    let mut partial = PartialDownload::create_in(temp.path()).unwrap();
    partial.write_chunk(b"%PDF-").await.unwrap();
    assert_eq!(partial.write_chunk(b"1.7").await.unwrap(), 8);
    assert_eq!(partial.written(), 8);
    let persisted = partial.finish(&target).await.unwrap();

    assert_eq!(persisted.bytes, 8);
    assert_eq!(persisted.sha256, sha256_hex(b"%PDF-1.7"));
    assert_eq!(fs::read(&target).unwrap(), b"%PDF-1.7");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn hash_of_existing_file_matches_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.pdf");
    fs::write(&target, b"%PDF-1.4 existing").unwrap();

    assert_eq!(hash_file(&target).unwrap(), sha256_hex(b"%PDF-1.4 existing"));
    assert!(hash_file(&temp.path().join("missing.pdf")).is_err());
}

#[tokio::test]
async fn abandoned_download_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();

    let mut partial = PartialDownload::create_in(temp.path()).unwrap();
    partial.write_chunk(b"truncated").await.unwrap();
    let temp_path = partial.temp_path().to_path_buf();
    assert!(temp_path.exists());
    drop(partial);

    assert!(!temp_path.exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn verify_accepts_non_empty_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.pdf");
    fs::write(&target, b"%PDF").unwrap();

    assert_eq!(verify_download(&target), Ok(4));
}

#[test]
fn verify_removes_empty_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.pdf");
    fs::write(&target, b"").unwrap();

    assert_eq!(verify_download(&target), Err(VerifyError::Empty(target.clone())));
    assert!(!target.exists());
}

#[test]
fn verify_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.pdf");

    assert_eq!(verify_download(&target), Err(VerifyError::Missing(target.clone())));
}
