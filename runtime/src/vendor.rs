/*++

Licensed under the Apache-2.0 license.

File Name:

    vendor.rs

Abstract:

    File contains the vendorPrototype subcommand router. Administrative
    operations (device-key toggles, enterprise-attestation upload, physical
    configuration) dispatch on the vendor command identifier.

--*/

use opalkey_drivers::{PhyConfigRecord, SlotId, Trng, Vault};
use opalkey_error::{CtapError, CtapResult};

use crate::{ConfigRequest, DeviceKeyCmd, Drivers, SubParams, VendorParams};

/// Disable device-key at-rest encryption
pub const VENDOR_CMD_KEY_DISABLE: u64 = 0x01;

/// Enable device-key at-rest encryption
pub const VENDOR_CMD_KEY_ENABLE: u64 = 0x02;

/// Upload an enterprise-attestation certificate blob
pub const VENDOR_CMD_EA_UPLOAD: u64 = 0x03;

/// Set the USB VID/PID pair, packed as `vid << 16 | pid`
pub const VENDOR_CMD_PHY_VID_PID: u64 = 0x10;

/// Set the status LED GPIO index
pub const VENDOR_CMD_PHY_LED_GPIO: u64 = 0x11;

/// Set the status LED brightness
pub const VENDOR_CMD_PHY_LED_BRIGHTNESS: u64 = 0x12;

/// Set the physical-configuration option bitmask
pub const VENDOR_CMD_PHY_OPTS: u64 = 0x13;

/// Identifier range reserved for physical-configuration commands. Unknown
/// identifiers inside this range report UnsupportedOption; identifiers
/// outside it report InvalidSubcommand. Clients branch on the difference.
const PHY_FAMILY: core::ops::RangeInclusive<u64> = 0x10..=0x1F;

pub struct VendorCmd;
impl VendorCmd {
    pub(crate) fn execute<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        request: &ConfigRequest,
    ) -> CtapResult<()> {
        let default = VendorParams::default();
        let params = match &request.sub_params {
            SubParams::Vendor(params) => params,
            _ => &default,
        };
        match params.command_id {
            VENDOR_CMD_KEY_DISABLE => DeviceKeyCmd::disable(drivers),
            VENDOR_CMD_KEY_ENABLE => DeviceKeyCmd::enable(drivers, params.param_bytes),
            VENDOR_CMD_EA_UPLOAD => {
                Self::upload_enterprise_attestation(drivers, params.param_bytes)
            }
            id if PHY_FAMILY.contains(&id) => Self::configure_phy(drivers, id, params.param_int),
            _ => Err(CtapError::ERR_INVALID_SUBCOMMAND),
        }
    }

    fn upload_enterprise_attestation<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        blob: Option<&[u8]>,
    ) -> CtapResult<()> {
        let Some(blob) = blob else {
            return Err(CtapError::ERR_MISSING_PARAMETER);
        };
        drivers
            .vault
            .put(SlotId::EnterpriseAttestation, blob)
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        drivers.vault.commit()
    }

    fn configure_phy<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        command_id: u64,
        value: u64,
    ) -> CtapResult<()> {
        let mut record = PhyConfigRecord::load(&drivers.vault);
        match command_id {
            VENDOR_CMD_PHY_VID_PID => {
                record.set_vid_pid(((value >> 16) & 0xFFFF) as u16, (value & 0xFFFF) as u16)
            }
            VENDOR_CMD_PHY_LED_GPIO => record.set_led_gpio(value as u8),
            VENDOR_CMD_PHY_LED_BRIGHTNESS => record.set_led_brightness(value as u8),
            VENDOR_CMD_PHY_OPTS => record.set_opts(value as u16),
            _ => return Err(CtapError::ERR_UNSUPPORTED_OPTION),
        }
        record.save(&mut drivers.vault)
    }
}
