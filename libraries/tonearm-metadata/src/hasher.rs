//! Streaming content digests for duplicate detection

use crate::MetadataError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming read size
const BUFFER_SIZE: usize = 8192;

/// Calculate the SHA-256 digest of a file's contents
///
/// Returns 64 lowercase hex characters, no prefix. An empty digest string is
/// never produced: on I/O failure the caller gets an error and should treat
/// the digest as absent (the file stays usable for the size and metadata
/// duplicate axes).
pub fn calculate_file_hash(path: &Path) -> crate::Result<String> {
    let mut file = File::open(path)
        .map_err(|e| MetadataError::HashingFailed(format!("{}: {e}", path.display())))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| MetadataError::HashingFailed(format!("{}: {e}", path.display())))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_file_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        let digest = calculate_file_hash(&path).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn known_content_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hello.bin");
        fs::write(&path, b"hello world").unwrap();

        let digest = calculate_file_hash(&path).unwrap();
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn identical_bytes_identical_digest() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.bin");
        let b = temp.path().join("sub");
        fs::create_dir(&b).unwrap();
        let b = b.join("b.bin");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        assert_eq!(
            calculate_file_hash(&a).unwrap(),
            calculate_file_hash(&b).unwrap()
        );
    }

    #[test]
    fn missing_file_is_a_hashing_failure() {
        let result = calculate_file_hash(Path::new("/nonexistent/file.bin"));
        assert!(matches!(result, Err(MetadataError::HashingFailed(_))));
    }
}
