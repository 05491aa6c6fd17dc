/*++

Licensed under the Apache-2.0 license.

File Name:

    phy.rs

Abstract:

    File contains the persistent USB PHY configuration record. The record is
    stored verbatim in the vault; fields are little-endian on all supported
    targets.

--*/

use opalkey_error::{CtapError, CtapResult};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{SlotId, Vault};

/// VID/PID pair has been programmed
pub const PHY_PRESENT_VID_PID: u8 = 0x01;

/// LED GPIO line has been programmed
pub const PHY_PRESENT_LED_GPIO: u8 = 0x02;

/// LED brightness has been programmed
pub const PHY_PRESENT_LED_BRIGHTNESS: u8 = 0x04;

/// USB PHY configuration record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout)]
#[repr(C)]
pub struct PhyConfigRecord {
    pub vid: u16,
    pub pid: u16,
    pub opts: u16,
    pub present: u8,
    pub led_gpio: u8,
    pub led_brightness: u8,
    pub reserved: u8,
}

impl PhyConfigRecord {
    /// Loads the record from the vault. A missing or short record yields the
    /// all-zero default with no presence bits set.
    pub fn load<V: Vault>(vault: &V) -> Self {
        Self::read_from_bytes(vault.data(SlotId::PhyConfig)).unwrap_or_default()
    }

    /// Writes the record back and commits.
    pub fn save<V: Vault>(&self, vault: &mut V) -> CtapResult<()> {
        vault
            .put(SlotId::PhyConfig, self.as_bytes())
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        vault.commit()
    }

    pub fn set_vid_pid(&mut self, vid: u16, pid: u16) {
        self.vid = vid;
        self.pid = pid;
        self.present |= PHY_PRESENT_VID_PID;
    }

    pub fn set_led_gpio(&mut self, gpio: u8) {
        self.led_gpio = gpio;
        self.present |= PHY_PRESENT_LED_GPIO;
    }

    pub fn set_led_brightness(&mut self, level: u8) {
        self.led_brightness = level;
        self.present |= PHY_PRESENT_LED_BRIGHTNESS;
    }

    pub fn set_opts(&mut self, opts: u16) {
        self.opts = opts;
    }

    pub fn vid_pid(&self) -> Option<(u16, u16)> {
        if self.present & PHY_PRESENT_VID_PID != 0 {
            Some((self.vid, self.pid))
        } else {
            None
        }
    }

    pub fn led_gpio(&self) -> Option<u8> {
        if self.present & PHY_PRESENT_LED_GPIO != 0 {
            Some(self.led_gpio)
        } else {
            None
        }
    }

    pub fn led_brightness(&self) -> Option<u8> {
        if self.present & PHY_PRESENT_LED_BRIGHTNESS != 0 {
            Some(self.led_brightness)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RamVault;

    #[test]
    fn test_record_size() {
        assert_eq!(core::mem::size_of::<PhyConfigRecord>(), 10);
    }

    #[test]
    fn test_load_missing_record() {
        let vault = RamVault::new();
        let record = PhyConfigRecord::load(&vault);
        assert_eq!(record, PhyConfigRecord::default());
        assert_eq!(record.vid_pid(), None);
        assert_eq!(record.led_gpio(), None);
        assert_eq!(record.led_brightness(), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut vault = RamVault::new();
        let mut record = PhyConfigRecord::load(&vault);
        record.set_vid_pid(0x32AC, 0x0009);
        record.set_led_brightness(0x40);
        record.save(&mut vault).unwrap();

        let reloaded = PhyConfigRecord::load(&vault);
        assert_eq!(reloaded.vid_pid(), Some((0x32AC, 0x0009)));
        assert_eq!(reloaded.led_gpio(), None);
        assert_eq!(reloaded.led_brightness(), Some(0x40));
        assert_eq!(vault.commit_count(), 1);
    }

    #[test]
    fn test_short_record_yields_default() {
        let mut vault = RamVault::new();
        vault.put(SlotId::PhyConfig, &[1, 2, 3]).unwrap();
        assert_eq!(PhyConfigRecord::load(&vault), PhyConfigRecord::default());
    }
}
