/*++

Licensed under the Apache-2.0 license.

File Name:

    vault.rs

Abstract:

    File contains API for the persistent slot vault.

--*/

use opalkey_error::{CtapError, CtapResult};

/// Slot Identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    /// Device/attestation private key, plaintext at rest
    DeviceKey = 0,
    /// Device/attestation private key, sealed at rest
    DeviceKeyEnc = 1,
    /// Minimum PIN length policy record
    MinPinPolicy = 2,
    /// Enterprise attestation payload
    EnterpriseAttestation = 3,
    /// Physical/board configuration record
    PhyConfig = 4,
    /// FIDO2 feature option word
    Options = 5,
    /// Client PIN record, owned by the client-PIN subsystem
    Pin = 6,
    /// Persistent PIN/UV auth token seed
    PersistentAuthToken = 7,
}

impl From<SlotId> for usize {
    fn from(slot: SlotId) -> Self {
        slot as Self
    }
}

/// Number of vault slots
pub const SLOT_COUNT: usize = 8;

/// Maximum payload of a single slot
pub const SLOT_CAPACITY: usize = 1024;

/// Persistent key-value storage.
///
/// Writes become durable only after `commit`. A slot with no data reads back
/// as an empty slice.
pub trait Vault {
    /// Returns true if the slot holds data.
    fn exists(&self, slot: SlotId) -> bool;

    /// Returns the length of the slot payload, 0 when empty.
    fn size(&self, slot: SlotId) -> usize;

    /// Returns the slot payload, empty when the slot holds nothing.
    fn data(&self, slot: SlotId) -> &[u8];

    /// Replaces the slot payload.
    fn put(&mut self, slot: SlotId, data: &[u8]) -> CtapResult<()>;

    /// Scrubs the slot: the stored bytes are overwritten with zeros before
    /// the slot is truncated to empty.
    fn erase(&mut self, slot: SlotId) -> CtapResult<()>;

    /// Checkpoints pending writes to durable storage.
    fn commit(&mut self) -> CtapResult<()>;
}

/// In-memory vault used by the test suites and the emulation build.
pub struct RamVault {
    slots: [heapless::Vec<u8, SLOT_CAPACITY>; SLOT_COUNT],
    commits: u32,
}

impl RamVault {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| heapless::Vec::new()),
            commits: 0,
        }
    }

    /// Number of checkpoints requested so far.
    pub fn commit_count(&self) -> u32 {
        self.commits
    }
}

impl Default for RamVault {
    fn default() -> Self {
        Self::new()
    }
}

impl Vault for RamVault {
    fn exists(&self, slot: SlotId) -> bool {
        !self.slots[usize::from(slot)].is_empty()
    }

    fn size(&self, slot: SlotId) -> usize {
        self.slots[usize::from(slot)].len()
    }

    fn data(&self, slot: SlotId) -> &[u8] {
        self.slots[usize::from(slot)].as_slice()
    }

    fn put(&mut self, slot: SlotId, data: &[u8]) -> CtapResult<()> {
        let buf = &mut self.slots[usize::from(slot)];
        buf.clear();
        buf.extend_from_slice(data)
            .map_err(|_| CtapError::ERR_PROCESSING)
    }

    fn erase(&mut self, slot: SlotId) -> CtapResult<()> {
        let buf = &mut self.slots[usize::from(slot)];
        buf.as_mut_slice().fill(0);
        buf.clear();
        Ok(())
    }

    fn commit(&mut self) -> CtapResult<()> {
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_read_back() {
        let mut vault = RamVault::new();
        assert!(!vault.exists(SlotId::DeviceKey));
        assert_eq!(vault.data(SlotId::DeviceKey), &[]);

        vault.put(SlotId::DeviceKey, &[1, 2, 3]).unwrap();
        assert!(vault.exists(SlotId::DeviceKey));
        assert_eq!(vault.size(SlotId::DeviceKey), 3);
        assert_eq!(vault.data(SlotId::DeviceKey), &[1, 2, 3]);

        vault.put(SlotId::DeviceKey, &[9]).unwrap();
        assert_eq!(vault.data(SlotId::DeviceKey), &[9]);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut vault = RamVault::new();
        vault.put(SlotId::DeviceKey, &[1]).unwrap();
        vault.put(SlotId::DeviceKeyEnc, &[2]).unwrap();
        assert_eq!(vault.data(SlotId::DeviceKey), &[1]);
        assert_eq!(vault.data(SlotId::DeviceKeyEnc), &[2]);
    }

    #[test]
    fn test_erase_empties_slot() {
        let mut vault = RamVault::new();
        vault.put(SlotId::MinPinPolicy, &[4, 0]).unwrap();
        vault.erase(SlotId::MinPinPolicy).unwrap();
        assert!(!vault.exists(SlotId::MinPinPolicy));
        assert_eq!(vault.size(SlotId::MinPinPolicy), 0);
        assert_eq!(vault.data(SlotId::MinPinPolicy), &[]);
    }

    #[test]
    fn test_oversized_put_is_rejected() {
        let mut vault = RamVault::new();
        let big = [0u8; SLOT_CAPACITY + 1];
        assert_eq!(
            vault.put(SlotId::EnterpriseAttestation, &big),
            Err(CtapError::ERR_PROCESSING)
        );
    }

    #[test]
    fn test_commit_counter() {
        let mut vault = RamVault::new();
        assert_eq!(vault.commit_count(), 0);
        vault.commit().unwrap();
        vault.commit().unwrap();
        assert_eq!(vault.commit_count(), 2);
    }
}
