/*++

Licensed under the Apache-2.0 license.

File Name:

    session.rs

Abstract:

    File contains the secure-session driver. The transport layer deposits a
    negotiated session key here; the config processor uses it to unwrap
    caller-supplied wrapping keys and to hold a decrypted device key for a
    bounded window.

--*/

use opalkey_error::{CtapError, CtapResult};
use zeroize::Zeroizing;

use crate::{aead, Trng};

/// Session key size in bytes
pub const SESSION_KEY_SIZE: usize = 32;

/// Device key size in bytes
pub const DEVICE_KEY_SIZE: usize = 32;

/// Size of a wrapped 32-byte key blob
pub const WRAPPED_KEY_SIZE: usize = aead::sealed_size(SESSION_KEY_SIZE);

pub struct SecureSession {
    key: Zeroizing<[u8; SESSION_KEY_SIZE]>,
    established: bool,
    device_key: Option<Zeroizing<[u8; DEVICE_KEY_SIZE]>>,
}

impl SecureSession {
    pub fn new() -> Self {
        Self {
            key: Zeroizing::new([0; SESSION_KEY_SIZE]),
            established: false,
            device_key: None,
        }
    }

    /// Installs a negotiated session key.
    pub fn establish(&mut self, key: &[u8; SESSION_KEY_SIZE]) {
        self.key.copy_from_slice(key);
        self.established = true;
    }

    /// Tears the session down and scrubs all key material.
    pub fn close(&mut self) {
        self.key.fill(0);
        self.established = false;
        self.device_key = None;
    }

    pub fn established(&self) -> bool {
        self.established
    }

    /// Unwraps a caller-supplied `nonce || ciphertext || tag` blob under the
    /// session key, yielding a 32-byte wrapping key.
    pub fn unwrap_key(&self, wrapped: &[u8]) -> CtapResult<Zeroizing<[u8; SESSION_KEY_SIZE]>> {
        if !self.established {
            return Err(CtapError::ERR_NOT_ALLOWED);
        }
        if wrapped.len() != WRAPPED_KEY_SIZE {
            return Err(CtapError::ERR_INVALID_PARAMETER);
        }
        let mut out = Zeroizing::new([0u8; SESSION_KEY_SIZE]);
        aead::open(&self.key, wrapped, out.as_mut())?;
        Ok(out)
    }

    /// Wraps a 32-byte key under the session key. Host-side counterpart of
    /// `unwrap_key`, used by provisioning flows and the test suites.
    pub fn wrap_key<T: Trng>(
        &self,
        trng: &mut T,
        key: &[u8; SESSION_KEY_SIZE],
    ) -> CtapResult<[u8; WRAPPED_KEY_SIZE]> {
        if !self.established {
            return Err(CtapError::ERR_NOT_ALLOWED);
        }
        let mut nonce = [0u8; aead::NONCE_SIZE];
        trng.fill_bytes(&mut nonce);
        let mut blob = [0u8; WRAPPED_KEY_SIZE];
        aead::seal(&self.key, &nonce, key, &mut blob)?;
        Ok(blob)
    }

    /// Deposits a decrypted device key into the session window.
    pub fn deposit_device_key(&mut self, key: [u8; DEVICE_KEY_SIZE]) {
        self.device_key = Some(Zeroizing::new(key));
    }

    /// Takes the decrypted device key, consuming the window.
    pub fn take_device_key(&mut self) -> Option<Zeroizing<[u8; DEVICE_KEY_SIZE]>> {
        self.device_key.take()
    }

    pub fn has_device_key(&self) -> bool {
        self.device_key.is_some()
    }
}

impl Default for SecureSession {
    fn default() -> Self {
        Self::new()
    }
}
