/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the OpalKey runtime library and the
    authenticatorConfig command handling logic.

--*/
#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod device_key;
mod drivers;
mod pin_policy;
mod request;
mod vendor;

pub use config::{ConfigCmd, COMMAND_AUTHENTICATOR_CONFIG};
pub use device_key::{DeviceKeyCmd, DEVICE_KEY_BLOB_SIZE};
pub use drivers::Drivers;
pub use pin_policy::{MinPinPolicyCmd, DEFAULT_MIN_PIN_LENGTH, MAX_STORED_RP_IDS};
pub use request::{
    ConfigRequest, MinPinParams, SubParams, VendorParams, MAX_RP_IDS,
    SUBCMD_ENABLE_ENTERPRISE_ATTESTATION, SUBCMD_SET_MIN_PIN_LENGTH, SUBCMD_VENDOR,
};
pub use vendor::{
    VendorCmd, VENDOR_CMD_EA_UPLOAD, VENDOR_CMD_KEY_DISABLE, VENDOR_CMD_KEY_ENABLE,
    VENDOR_CMD_PHY_LED_BRIGHTNESS, VENDOR_CMD_PHY_LED_GPIO, VENDOR_CMD_PHY_OPTS,
    VENDOR_CMD_PHY_VID_PID,
};
