/*++

Licensed under the Apache-2.0 license.

File Name:

    pin_file.rs

Abstract:

    File contains the persistent PIN record. The record is written by the
    clientPIN command set; the config processor only consults it to learn
    whether a PIN is set and how many code points it has.

--*/

use opalkey_error::{CtapError, CtapResult};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
use zeroize::Zeroize;

use crate::{SlotId, Vault};

/// Size of the stored PIN hash in bytes (left half of SHA-256)
pub const PIN_HASH_SIZE: usize = 16;

/// Retry count programmed when a PIN is first set
pub const DEFAULT_PIN_RETRIES: u8 = 8;

/// Persistent PIN record
#[derive(Clone, FromBytes, Immutable, IntoBytes, KnownLayout, Zeroize)]
#[repr(C)]
pub struct PinFileRecord {
    pub retries: u8,
    pub code_point_length: u8,
    pub hash: [u8; PIN_HASH_SIZE],
}

impl PinFileRecord {
    pub fn load<V: Vault>(vault: &V) -> Option<Self> {
        Self::read_from_bytes(vault.data(SlotId::Pin)).ok()
    }

    pub fn save<V: Vault>(&self, vault: &mut V) -> CtapResult<()> {
        vault
            .put(SlotId::Pin, self.as_bytes())
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        vault.commit()
    }

    /// Returns true if a client PIN has been set.
    pub fn pin_is_set<V: Vault>(vault: &V) -> bool {
        Self::load(vault).is_some_and(|record| record.code_point_length > 0)
    }

    /// Code-point length of the stored PIN, if one is set.
    pub fn stored_pin_length<V: Vault>(vault: &V) -> Option<u8> {
        Self::load(vault).and_then(|record| {
            if record.code_point_length > 0 {
                Some(record.code_point_length)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RamVault;

    #[test]
    fn test_record_size() {
        assert_eq!(core::mem::size_of::<PinFileRecord>(), 18);
    }

    #[test]
    fn test_no_pin_set() {
        let vault = RamVault::new();
        assert!(!PinFileRecord::pin_is_set(&vault));
        assert_eq!(PinFileRecord::stored_pin_length(&vault), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut vault = RamVault::new();
        let record = PinFileRecord {
            retries: DEFAULT_PIN_RETRIES,
            code_point_length: 6,
            hash: [0xA5; PIN_HASH_SIZE],
        };
        record.save(&mut vault).unwrap();

        assert!(PinFileRecord::pin_is_set(&vault));
        assert_eq!(PinFileRecord::stored_pin_length(&vault), Some(6));
        let reloaded = PinFileRecord::load(&vault).unwrap();
        assert_eq!(reloaded.retries, DEFAULT_PIN_RETRIES);
        assert_eq!(reloaded.hash, [0xA5; PIN_HASH_SIZE]);
    }

    #[test]
    fn test_zero_length_pin_not_set() {
        let mut vault = RamVault::new();
        let record = PinFileRecord {
            retries: DEFAULT_PIN_RETRIES,
            code_point_length: 0,
            hash: [0; PIN_HASH_SIZE],
        };
        record.save(&mut vault).unwrap();
        assert!(!PinFileRecord::pin_is_set(&vault));
        assert_eq!(PinFileRecord::stored_pin_length(&vault), None);
    }
}
