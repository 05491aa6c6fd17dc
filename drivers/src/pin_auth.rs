/*++

Licensed under the Apache-2.0 license.

File Name:

    pin_auth.rs

Abstract:

    File contains the PIN/UV auth protocol drivers: the in-RAM
    pinUvAuthToken, HMAC-SHA-256 verification for protocol versions 1 and 2,
    and token invalidation.

--*/

use hmac::{Hmac, Mac};
use opalkey_error::{CtapError, CtapResult};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{SlotId, Trng, Vault};

/// pinUvAuthToken size in bytes
pub const PIN_TOKEN_SIZE: usize = 32;

bitflags::bitflags! {
    /// pinUvAuthToken permission bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permission: u8 {
        const MAKE_CREDENTIAL = 0x01;
        const GET_ASSERTION = 0x02;
        const CREDENTIAL_MANAGEMENT = 0x04;
        const BIO_ENROLLMENT = 0x08;
        const LARGE_BLOB_WRITE = 0x10;
        const AUTHENTICATOR_CONFIGURATION = 0x20;
    }
}

/// PIN/UV Auth Protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinUvAuthProtocol {
    One,
    Two,
}

impl PinUvAuthProtocol {
    /// Length of a wire MAC under this protocol version. Version 1 truncates
    /// the HMAC output to 16 bytes, version 2 uses all 32.
    pub fn mac_len(self) -> usize {
        match self {
            Self::One => 16,
            Self::Two => PIN_TOKEN_SIZE,
        }
    }
}

/// In-RAM pinUvAuthToken.
///
/// The secret rotates on every session begin and on invalidation; a MAC made
/// with an old secret stops verifying once the token rotates.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PinUvAuthToken {
    secret: [u8; PIN_TOKEN_SIZE],
    #[zeroize(skip)]
    pub permissions: Permission,
    #[zeroize(skip)]
    in_use: bool,
}

impl PinUvAuthToken {
    pub fn zeroed() -> Self {
        Self {
            secret: [0; PIN_TOKEN_SIZE],
            permissions: Permission::empty(),
            in_use: false,
        }
    }

    /// Starts a token session: fresh secret, caller-granted permissions.
    pub fn begin_session<T: Trng>(&mut self, trng: &mut T, permissions: Permission) {
        trng.fill_bytes(&mut self.secret);
        self.permissions = permissions;
        self.in_use = true;
    }

    /// Invalidates the token: the secret rotates, permissions clear, and the
    /// token leaves use until the next session begins.
    pub fn reset<T: Trng>(&mut self, trng: &mut T) {
        trng.fill_bytes(&mut self.secret);
        self.permissions = Permission::empty();
        self.in_use = false;
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Computes the full 32-byte HMAC tag over `parts` concatenated in order.
    /// The wire MAC under protocol `p` is the first `p.mac_len()` bytes.
    pub fn authenticate(&self, parts: &[&[u8]]) -> CtapResult<[u8; PIN_TOKEN_SIZE]> {
        hmac_sha256(&self.secret, parts)
    }

    /// Verifies a claimed wire MAC over `parts` concatenated in order.
    ///
    /// Fails closed with `ERR_PIN_AUTH_INVALID` on a token not in use, a MAC
    /// of the wrong length for the protocol version, or a tag mismatch. The
    /// comparison is constant time.
    pub fn verify(
        &self,
        protocol: PinUvAuthProtocol,
        parts: &[&[u8]],
        mac: &[u8],
    ) -> CtapResult<()> {
        if !self.in_use {
            return Err(CtapError::ERR_PIN_AUTH_INVALID);
        }
        if mac.len() != protocol.mac_len() {
            return Err(CtapError::ERR_PIN_AUTH_INVALID);
        }
        let mut tag = hmac_sha256(&self.secret, parts)?;
        let ok = bool::from(tag[..protocol.mac_len()].ct_eq(mac));
        tag.zeroize();
        if ok {
            Ok(())
        } else {
            Err(CtapError::ERR_PIN_AUTH_INVALID)
        }
    }
}

/// Rotates the persistent pinUvAuthToken seed stored in the vault. The write
/// is left for the caller's checkpoint.
pub fn reset_persistent_token<V: Vault, T: Trng>(vault: &mut V, trng: &mut T) -> CtapResult<()> {
    let mut seed = [0u8; PIN_TOKEN_SIZE];
    trng.fill_bytes(&mut seed);
    let result = vault.put(SlotId::PersistentAuthToken, &seed);
    seed.zeroize();
    result
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> CtapResult<[u8; PIN_TOKEN_SIZE]> {
    let mut mac =
        Hmac::<sha2::Sha256>::new_from_slice(key).map_err(|_| CtapError::ERR_OTHER)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}
