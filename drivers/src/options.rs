/*++

Licensed under the Apache-2.0 license.

File Name:

    options.rs

Abstract:

    File contains the persistent authenticator option bits surfaced in the
    authenticatorGetInfo options map.

--*/

use bitflags::bitflags;
use opalkey_error::{CtapError, CtapResult};

use crate::{SlotId, Vault};

bitflags! {
    /// Persistent authenticator option bits
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Fido2Options: u16 {
        /// Enterprise attestation enabled (`ep` option)
        const ENTERPRISE_ATTESTATION = 0x0001;
    }
}

impl Fido2Options {
    /// Loads the option word from the vault. Missing or short records yield
    /// the empty set; unknown bits are retained so a firmware downgrade does
    /// not silently drop them.
    pub fn load<V: Vault>(vault: &V) -> Self {
        let data = vault.data(SlotId::Options);
        if data.len() < 2 {
            return Fido2Options::empty();
        }
        Fido2Options::from_bits_retain(u16::from_le_bytes([data[0], data[1]]))
    }

    /// Writes the option word back and commits.
    pub fn store<V: Vault>(&self, vault: &mut V) -> CtapResult<()> {
        vault
            .put(SlotId::Options, &self.bits().to_le_bytes())
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        vault.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RamVault;

    #[test]
    fn test_load_missing_record() {
        let vault = RamVault::new();
        assert_eq!(Fido2Options::load(&vault), Fido2Options::empty());
    }

    #[test]
    fn test_store_load_round_trip() {
        let mut vault = RamVault::new();
        let mut options = Fido2Options::load(&vault);
        options.insert(Fido2Options::ENTERPRISE_ATTESTATION);
        options.store(&mut vault).unwrap();

        let reloaded = Fido2Options::load(&vault);
        assert!(reloaded.contains(Fido2Options::ENTERPRISE_ATTESTATION));
        assert_eq!(vault.commit_count(), 1);
    }

    #[test]
    fn test_unknown_bits_retained() {
        let mut vault = RamVault::new();
        vault.put(SlotId::Options, &0x8001u16.to_le_bytes()).unwrap();

        let options = Fido2Options::load(&vault);
        assert!(options.contains(Fido2Options::ENTERPRISE_ATTESTATION));
        assert_eq!(options.bits(), 0x8001);
    }
}
