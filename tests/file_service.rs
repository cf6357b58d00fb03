//! File Service Behavior Tests
//!
//! End-to-end properties of upload, listing and download links over both
//! the filesystem and the in-memory backends.

use std::collections::HashMap;

use filedrop::file_storage::{
    resolve_key, FileService, LinkIssuer, ListingMode, LocalBackend, MemoryBackend, ObjectStore,
    ObjectStoreAdapter, SignedUrl, SignedUrlGenerator, StorageError,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

const ENDPOINT: &str = "http://127.0.0.1:54321/act5/api/v1/object";

fn service_over<B: ObjectStore>(backend: B, mode: ListingMode) -> FileService<B> {
    let store = ObjectStoreAdapter::new(backend, mode);
    let links = LinkIssuer::new(SignedUrlGenerator::new(b"integration-secret", ENDPOINT));
    FileService::new(store, links)
}

fn local_service(mode: ListingMode) -> (FileService<LocalBackend>, TempDir) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let backend = LocalBackend::new(temp.path().join("bucket"));
    (service_over(backend, mode), temp)
}

/// Present a link's query parameters the way the object endpoint does
fn follow<B: ObjectStore>(
    service: &FileService<B>,
    link: &SignedUrl,
) -> Result<Vec<u8>, StorageError> {
    let url = url::Url::parse(&link.url).unwrap();
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let expires: i64 = query["expires"].parse().unwrap();

    let (owner, file_name) = link.key.as_str().split_once('/').unwrap();
    service.fetch(owner, file_name, expires, &query["signature"])
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_round_trip_local() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);
    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    service.upload("alice", "blob.bin", &content).unwrap();
    let link = service.download_link("alice", "blob.bin").unwrap();

    assert_eq!(follow(&service, &link).unwrap(), content);
}

#[test]
fn test_round_trip_name_with_spaces() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);

    service.upload("alice", "my notes.txt", b"spaced").unwrap();
    let link = service.download_link("alice", "my notes.txt").unwrap();

    assert!(link.url.contains("my%20notes.txt"));
    assert_eq!(follow(&service, &link).unwrap(), b"spaced");
}

#[test]
fn test_round_trip_empty_content() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);

    service.upload("alice", "empty", b"").unwrap();
    let link = service.download_link("alice", "empty").unwrap();

    assert!(follow(&service, &link).unwrap().is_empty());
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_alice_scenario() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);

    service.upload("alice", "a.txt", b"hi").unwrap();

    assert!(service.view("alice").unwrap().contains(&"a.txt".to_string()));
    let link = service.download_link("alice", "a.txt").unwrap();
    assert_eq!(follow(&service, &link).unwrap(), b"hi");
    assert!(matches!(
        service.download_link("alice", "missing.txt"),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_bob_without_uploads_not_found_without_signing() {
    let service = service_over(MemoryBackend::new(), ListingMode::FilterMarker);

    let err = service.download_link("bob", "x.txt").unwrap_err();
    assert_eq!(err, StorageError::NotFound("bob/x.txt".to_string()));
    assert_eq!(service.links().signer().issued_count(), 0);
}

#[test]
fn test_empty_owner_view() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);
    assert!(service.view("nobody").unwrap().is_empty());
}

#[test]
fn test_namespace_isolation() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);

    service.upload("alice", "f.txt", b"alice's").unwrap();
    service.upload("carol", "g.txt", b"carol's").unwrap();

    assert_eq!(service.view("carol").unwrap(), vec!["g.txt"]);
    assert!(matches!(
        service.download_link("carol", "f.txt"),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_prefix_sharing_owners_isolated() {
    let service = service_over(MemoryBackend::new(), ListingMode::FilterMarker);

    service.upload("al", "a.txt", b"1").unwrap();
    service.upload("alice", "b.txt", b"2").unwrap();

    assert_eq!(service.view("al").unwrap(), vec!["a.txt"]);
    assert_eq!(service.view("alice").unwrap(), vec!["b.txt"]);
}

#[test]
fn test_overwrite_replaces_content() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);

    service.upload("alice", "a.txt", b"first version").unwrap();
    service.upload("alice", "a.txt", b"v2").unwrap();

    let link = service.download_link("alice", "a.txt").unwrap();
    assert_eq!(follow(&service, &link).unwrap(), b"v2");
    assert_eq!(service.view("alice").unwrap(), vec!["a.txt"]);
}

#[test]
fn test_folder_marker_created_on_upload() {
    let service = service_over(MemoryBackend::new(), ListingMode::FilterMarker);

    service.upload("alice", "a.txt", b"hi").unwrap();

    let keys = service.store().backend().list_objects("alice/").unwrap();
    assert_eq!(keys, vec!["alice/", "alice/a.txt"]);
    assert!(service.store().backend().get_object("alice/").unwrap().is_empty());
}

// =============================================================================
// Listing modes
// =============================================================================

#[test]
fn test_legacy_listing_with_marker_matches_filtered() {
    let legacy = service_over(MemoryBackend::new(), ListingMode::LegacyDropFirst);
    let filtered = service_over(MemoryBackend::new(), ListingMode::FilterMarker);

    for service in [&legacy, &filtered] {
        service.upload("alice", "b.txt", b"b").unwrap();
        service.upload("alice", "a.txt", b"a").unwrap();
    }

    assert_eq!(legacy.view("alice").unwrap(), filtered.view("alice").unwrap());
    assert_eq!(legacy.view("alice").unwrap(), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_legacy_listing_drops_file_when_marker_missing() {
    let backend = MemoryBackend::new();
    // Written by another tool, so no folder marker
    backend.put_object("dave/report.pdf", b"%PDF").unwrap();
    let service = service_over(backend, ListingMode::LegacyDropFirst);

    assert!(service.view("dave").unwrap().is_empty());
    assert!(matches!(
        service.download_link("dave", "report.pdf"),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn test_filtered_listing_keeps_file_when_marker_missing() {
    let backend = MemoryBackend::new();
    backend.put_object("dave/report.pdf", b"%PDF").unwrap();
    let service = service_over(backend, ListingMode::FilterMarker);

    assert_eq!(service.view("dave").unwrap(), vec!["report.pdf"]);
    assert!(service.download_link("dave", "report.pdf").is_ok());
}

// =============================================================================
// Failure isolation
// =============================================================================

#[test]
fn test_outage_does_not_poison_later_requests() {
    let service = service_over(MemoryBackend::new(), ListingMode::FilterMarker);
    service.upload("alice", "a.txt", b"hi").unwrap();

    service.store().backend().set_offline(true);
    assert!(matches!(
        service.download_link("alice", "a.txt"),
        Err(StorageError::StoreUnavailable(_))
    ));

    service.store().backend().set_offline(false);
    let link = service.download_link("alice", "a.txt").unwrap();
    assert_eq!(follow(&service, &link).unwrap(), b"hi");
}

#[test]
fn test_link_from_other_secret_rejected() {
    let (service, _temp) = local_service(ListingMode::FilterMarker);
    service.upload("alice", "a.txt", b"hi").unwrap();

    let foreign = SignedUrlGenerator::new(b"someone-else", ENDPOINT)
        .presign_get(&resolve_key("alice", "a.txt"), 60)
        .unwrap();

    assert_eq!(follow(&service, &foreign), Err(StorageError::InvalidSignature));
}

#[test]
fn test_dot_segment_names_rejected_before_store() {
    let (service, temp) = local_service(ListingMode::FilterMarker);

    for name in [".", ".."] {
        assert!(matches!(
            service.upload("alice", name, b"hi"),
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            service.upload(name, "a.txt", b"hi"),
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            service.download_link("alice", name),
            Err(StorageError::InvalidName(_))
        ));
    }

    assert_eq!(service.metrics().snapshot().store_failures, 0);
    assert!(!temp.path().join("bucket").exists());
}
