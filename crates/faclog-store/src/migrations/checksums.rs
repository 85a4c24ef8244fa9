//! Checksum validation for migrations
//!
//! SHA256 of the migration SQL, recorded when the migration is applied

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("SELECT 1");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, compute_checksum("SELECT 1"));
        assert_ne!(checksum, compute_checksum("SELECT 2"));
    }
}
