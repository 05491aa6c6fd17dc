/*++

Licensed under the Apache-2.0 license.

File Name:

    device_key.rs

Abstract:

    File contains the device-key lifecycle operations. The device private key
    rests either plaintext or AEAD-encrypted under a session-supplied wrapping
    key; these operations move it between the two storage slots.

--*/

use opalkey_drivers::{aead, cprintln, SlotId, Trng, Vault, DEVICE_KEY_SIZE};
use opalkey_error::{CtapError, CtapResult};
use zeroize::Zeroizing;

use crate::Drivers;

/// Size of the encrypted device-key blob, `nonce || ciphertext || tag`
pub const DEVICE_KEY_BLOB_SIZE: usize = aead::sealed_size(DEVICE_KEY_SIZE);

pub struct DeviceKeyCmd;
impl DeviceKeyCmd {
    /// Moves the device key from encrypted to plaintext storage.
    ///
    /// Requires the encrypted slot to be populated and the decrypted key to
    /// have been deposited into the session window by an earlier
    /// key-establishment step. The window is consumed.
    pub(crate) fn disable<V: Vault, T: Trng>(drivers: &mut Drivers<V, T>) -> CtapResult<()> {
        if !drivers.vault.exists(SlotId::DeviceKeyEnc) {
            return Err(CtapError::ERR_NOT_ALLOWED);
        }
        let Some(key) = drivers.session.take_device_key() else {
            return Err(CtapError::ERR_PIN_AUTH_INVALID);
        };
        // The plaintext write must land before the encrypted slot is cleared
        // so an interruption never leaves both slots empty.
        drivers
            .vault
            .put(SlotId::DeviceKey, key.as_ref())
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        drop(key);
        drivers.vault.erase(SlotId::DeviceKeyEnc)?;
        drivers.vault.commit()?;
        cprintln!("[config] device key at-rest encryption disabled");
        Ok(())
    }

    /// Moves the device key from plaintext to encrypted storage.
    ///
    /// `wrapped_key` is the caller-supplied wrapping key, itself sealed under
    /// the session key. The stored blob is `nonce || ciphertext || tag` with
    /// a fresh random nonce and no associated data.
    pub(crate) fn enable<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        wrapped_key: Option<&[u8]>,
    ) -> CtapResult<()> {
        if !drivers.vault.exists(SlotId::DeviceKey) {
            return Err(CtapError::ERR_NOT_ALLOWED);
        }
        if !drivers.session.established() {
            return Err(CtapError::ERR_NOT_ALLOWED);
        }
        let wrapping_key = drivers.session.unwrap_key(wrapped_key.unwrap_or(&[]))?;

        if drivers.vault.size(SlotId::DeviceKey) != DEVICE_KEY_SIZE {
            return Err(CtapError::ERR_PROCESSING);
        }
        let mut plaintext = Zeroizing::new([0u8; DEVICE_KEY_SIZE]);
        plaintext.copy_from_slice(drivers.vault.data(SlotId::DeviceKey));

        let mut nonce = [0u8; aead::NONCE_SIZE];
        drivers.trng.fill_bytes(&mut nonce);
        let mut blob = Zeroizing::new([0u8; DEVICE_KEY_BLOB_SIZE]);
        aead::seal(&wrapping_key, &nonce, plaintext.as_slice(), blob.as_mut())?;

        drivers
            .vault
            .put(SlotId::DeviceKeyEnc, blob.as_ref())
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        drivers.vault.erase(SlotId::DeviceKey)?;
        drivers.vault.commit()?;
        cprintln!("[config] device key at-rest encryption enabled");
        Ok(())
    }
}
