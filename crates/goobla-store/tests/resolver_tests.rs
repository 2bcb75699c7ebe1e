//! Integration tests for path resolution against a real directory tree.
//!
//! Every test uses its own temporary models root so nothing depends on the
//! environment or the user's home directory.

use goobla_store::{
    BlobLocation, FixedRoot, ModelIdentity, PathResolver, StoreError, StoreRoot,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a resolver over a fresh temporary root.
fn create_test_store() -> (TempDir, PathResolver<FixedRoot>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let resolver = PathResolver::with_root(FixedRoot::new(temp_dir.path()));
    (temp_dir, resolver)
}

fn sha(hex_char: char) -> String {
    format!("sha256:{}", hex_char.to_string().repeat(64))
}

#[test]
fn test_empty_digest_is_blobs_root() {
    let (temp_dir, resolver) = create_test_store();

    let first = resolver.blob_path("").unwrap();
    assert!(first.ends_with("blobs"));
    assert_eq!(first, temp_dir.path().join("blobs"));
    assert!(first.is_dir());

    // Second call must not fail now that the directory exists.
    let second = resolver.blob_path("").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_valid_digest_is_sharded() {
    let (temp_dir, resolver) = create_test_store();
    let hex = "a".repeat(64);

    let path = resolver.blob_path(&sha('a')).unwrap();
    assert_eq!(
        path,
        temp_dir
            .path()
            .join("blobs")
            .join("aa")
            .join(format!("sha256-{hex}"))
    );
    assert!(path.parent().unwrap().is_dir());
    assert!(!path.exists());
}

#[test]
fn test_colon_and_dash_resolve_identically() {
    let (_temp_dir, resolver) = create_test_store();
    let hex = "0123456789abcdef".repeat(4);

    let colon = resolver.blob_path(&format!("sha256:{hex}")).unwrap();
    let dash = resolver.blob_path(&format!("sha256-{hex}")).unwrap();
    assert_eq!(colon, dash);
    assert!(colon.ends_with(Path::new("01").join(format!("sha256-{hex}"))));
}

#[test]
fn test_malformed_digests_rejected_without_side_effects() {
    let (temp_dir, resolver) = create_test_store();

    for digest in [
        format!("sha256:{}", "g".repeat(64)),
        format!("md5:{}", "a".repeat(32)),
        "latest".to_string(),
    ] {
        let err = resolver.blob_path(&digest).unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidDigestFormat { .. }),
            "unexpected error for {digest}: {err}"
        );
    }

    assert!(!temp_dir.path().join("blobs").exists());
}

#[test]
fn test_legacy_blob_wins() {
    let (temp_dir, resolver) = create_test_store();
    let hex = "b".repeat(64);
    let blobs = temp_dir.path().join("blobs");
    let legacy = blobs.join(format!("sha256-{hex}"));

    std::fs::create_dir_all(blobs.join("bb")).unwrap();
    std::fs::write(&legacy, b"legacy bytes").unwrap();

    assert_eq!(resolver.blob_path(&sha('b')).unwrap(), legacy);

    // Even with a sharded copy present the legacy path stays authoritative.
    std::fs::write(blobs.join("bb").join(format!("sha256-{hex}")), b"new").unwrap();
    assert_eq!(resolver.blob_path(&sha('b')).unwrap(), legacy);
}

#[test]
fn test_legacy_removal_switches_to_sharded() {
    let (temp_dir, resolver) = create_test_store();
    let hex = "c".repeat(64);
    let blobs = temp_dir.path().join("blobs");
    let legacy = blobs.join(format!("sha256-{hex}"));

    std::fs::create_dir_all(&blobs).unwrap();
    std::fs::write(&legacy, b"x").unwrap();
    assert!(resolver.blob_location(&sha('c')).unwrap().is_legacy());

    std::fs::remove_file(&legacy).unwrap();
    let location = resolver.blob_location(&sha('c')).unwrap();
    assert_eq!(
        location,
        BlobLocation::Sharded(blobs.join("cc").join(format!("sha256-{hex}")))
    );
}

#[test]
fn test_untraversable_blobs_dir_fails() {
    let (temp_dir, resolver) = create_test_store();
    std::fs::write(temp_dir.path().join("blobs"), b"a file, not a directory").unwrap();

    let err = resolver.blob_path(&sha('d')).unwrap_err();
    assert!(matches!(err, StoreError::DirectoryCreateFailed { .. }));
    assert!(err.to_string().contains("ensure path elements are traversable"));

    assert!(matches!(
        resolver.blob_path(""),
        Err(StoreError::DirectoryCreateFailed { .. })
    ));
}

#[test]
fn test_manifest_path_layout() {
    let (temp_dir, resolver) = create_test_store();

    let path = resolver
        .manifest_path(&ModelIdentity::parse("myregistry.example.com/research/llama:13b"))
        .unwrap();
    let expected: PathBuf = temp_dir
        .path()
        .join("manifests")
        .join("myregistry.example.com")
        .join("research")
        .join("llama")
        .join("13b");
    assert_eq!(path, expected);

    // Manifest writers create their own directories.
    assert!(!temp_dir.path().join("manifests").exists());
}

#[test]
fn test_invalid_identity_reports_not_found() {
    let (temp_dir, resolver) = create_test_store();

    for reference in ["", "a/b/c/d", "library/", "bad name:latest"] {
        let err = resolver
            .manifest_path(&ModelIdentity::parse(reference))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentity { .. }));
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_manifests_dir_created_idempotently() {
    let (temp_dir, resolver) = create_test_store();

    let dir = resolver.manifests_dir().unwrap();
    assert_eq!(dir, temp_dir.path().join("manifests"));
    assert!(dir.is_dir());
    assert_eq!(resolver.manifests_dir().unwrap(), dir);
}

#[test]
fn test_list_manifests_round_trips_identities() {
    let (_temp_dir, resolver) = create_test_store();
    let references = ["llama:7b", "research/llama:13b", "example.com/team/phi:mini"];

    for reference in references {
        let path = resolver
            .manifest_path(&ModelIdentity::parse(reference))
            .unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{}").unwrap();
    }

    // Stray file at the wrong depth is ignored.
    let manifests = resolver.manifests_dir().unwrap();
    std::fs::write(manifests.join("README"), b"").unwrap();

    let listed: Vec<String> = resolver
        .list_manifests()
        .unwrap()
        .iter()
        .map(|identity| identity.short_tag_name())
        .collect();
    assert_eq!(
        listed,
        vec![
            "example.com/team/phi:mini",
            "llama:7b",
            "research/llama:13b",
        ]
    );
}

#[test]
fn test_list_blobs_covers_both_layouts() {
    let (_temp_dir, resolver) = create_test_store();

    let sharded = resolver.blob_path(&sha('e')).unwrap();
    std::fs::write(&sharded, b"sharded").unwrap();

    let blobs_dir = resolver.blob_path("").unwrap();
    let legacy = blobs_dir.join(format!("sha256-{}", "f".repeat(64)));
    std::fs::write(&legacy, b"legacy").unwrap();

    let listed = resolver.list_blobs().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].1, BlobLocation::Sharded(sharded));
    assert_eq!(listed[1].1, BlobLocation::Legacy(legacy));
}

#[test]
fn test_concurrent_resolution_of_same_digest() {
    let (_temp_dir, resolver) = create_test_store();
    let resolver = std::sync::Arc::new(resolver);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.blob_path(&sha('9')))
        })
        .collect();

    let paths: Vec<PathBuf> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert!(paths.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_resolver_over_dyn_root() {
    let temp_dir = TempDir::new().unwrap();
    let root: Box<dyn StoreRoot> = Box::new(FixedRoot::new(temp_dir.path()));
    let resolver = PathResolver::with_root(root);
    assert!(resolver.blob_path("").unwrap().is_dir());
}
