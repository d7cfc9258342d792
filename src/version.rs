//! Content-hash version fingerprint, shown alongside output for traceability.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex characters kept from the combined digest.
const FINGERPRINT_LEN: usize = 10;

/// Fingerprint the given files.
///
/// Each existing file is hashed; the hex digests are concatenated in order
/// and hashed again. Missing or unreadable files are skipped.
pub fn fingerprint<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut combined = String::new();
    for path in paths {
        if let Ok(bytes) = std::fs::read(path.as_ref()) {
            combined.push_str(&hex::encode(Sha256::digest(&bytes)));
        }
    }
    let digest = hex::encode(Sha256::digest(combined.as_bytes()));
    digest[..FINGERPRINT_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stable_for_same_content() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.json");
        std::fs::write(&a, "[]").unwrap();
        let first = fingerprint(&[&a]);
        assert_eq!(first.len(), 10);
        assert_eq!(first, fingerprint(&[&a]));
    }

    #[test]
    fn test_changes_with_content() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.json");
        std::fs::write(&a, "[]").unwrap();
        let before = fingerprint(&[&a]);
        std::fs::write(&a, "[{}]").unwrap();
        assert_ne!(before, fingerprint(&[&a]));
    }

    #[test]
    fn test_missing_files_skipped() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.json");
        std::fs::write(&a, "x").unwrap();
        let missing = tmp.path().join("missing");
        assert_eq!(fingerprint(&[&a]), fingerprint(&[&a, &missing]));
    }
}
