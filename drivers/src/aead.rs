/*++

Licensed under the Apache-2.0 license.

File Name:

    aead.rs

Abstract:

    File contains API for sealing small secrets at rest. Blobs are laid out
    `nonce || ciphertext || tag` with ChaCha20-Poly1305 and no associated
    data.

--*/

use chacha20poly1305::{AeadInPlace, ChaCha20Poly1305, KeyInit, Nonce, Tag};
use opalkey_error::{CtapError, CtapResult};

/// AEAD nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// AEAD authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Size of a sealed blob holding `n` payload bytes
pub const fn sealed_size(n: usize) -> usize {
    NONCE_SIZE + n + TAG_SIZE
}

/// Seals `plaintext` under `key` into `out`.
///
/// `nonce` must be fresh for every call. `out` must be exactly
/// `sealed_size(plaintext.len())` bytes.
pub fn seal(
    key: &[u8; 32],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
    out: &mut [u8],
) -> CtapResult<()> {
    if out.len() != sealed_size(plaintext.len()) {
        return Err(CtapError::ERR_INVALID_PARAMETER);
    }
    let cipher = ChaCha20Poly1305::new(key.into());
    let (nonce_out, rest) = out.split_at_mut(NONCE_SIZE);
    let (ct, tag_out) = rest.split_at_mut(plaintext.len());
    nonce_out.copy_from_slice(nonce);
    ct.copy_from_slice(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(nonce.into(), &[], ct)
        .map_err(|_| CtapError::ERR_INVALID_PARAMETER)?;
    tag_out.copy_from_slice(&tag);
    Ok(())
}

/// Opens a sealed blob into `out`.
///
/// `out` must be exactly `blob.len() - NONCE_SIZE - TAG_SIZE` bytes. On
/// authentication failure `out` is scrubbed and an error returned.
pub fn open(key: &[u8; 32], blob: &[u8], out: &mut [u8]) -> CtapResult<()> {
    if blob.len() < sealed_size(0) || out.len() != blob.len() - NONCE_SIZE - TAG_SIZE {
        return Err(CtapError::ERR_INVALID_PARAMETER);
    }
    let cipher = ChaCha20Poly1305::new(key.into());
    let (nonce, rest) = blob.split_at(NONCE_SIZE);
    let (ct, tag) = rest.split_at(rest.len() - TAG_SIZE);
    out.copy_from_slice(ct);
    if cipher
        .decrypt_in_place_detached(Nonce::from_slice(nonce), &[], out, Tag::from_slice(tag))
        .is_err()
    {
        out.fill(0);
        return Err(CtapError::ERR_INVALID_PARAMETER);
    }
    Ok(())
}
