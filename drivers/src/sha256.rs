/*++

Licensed under the Apache-2.0 license.

File Name:

    sha256.rs

Abstract:

    File contains API for SHA-256 digest operations.

--*/

use sha2::Digest;

/// SHA-256 digest size in bytes
pub const SHA256_DIGEST_SIZE: usize = 32;

pub struct Sha256;

impl Sha256 {
    /// Calculate the digest of the buffer
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to calculate the digest over
    pub fn digest(buf: &[u8]) -> [u8; SHA256_DIGEST_SIZE] {
        sha2::Sha256::digest(buf).into()
    }
}
