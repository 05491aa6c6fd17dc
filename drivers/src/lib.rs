/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the OpalKey driver library.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod options;
mod phy;
mod pin_auth;
mod pin_file;
mod session;
mod sha256;
mod trng;
mod vault;

pub mod aead;
pub mod printer;

pub use options::Fido2Options;
pub use phy::{
    PhyConfigRecord, PHY_PRESENT_LED_BRIGHTNESS, PHY_PRESENT_LED_GPIO, PHY_PRESENT_VID_PID,
};
pub use pin_auth::{
    reset_persistent_token, Permission, PinUvAuthProtocol, PinUvAuthToken, PIN_TOKEN_SIZE,
};
pub use pin_file::{PinFileRecord, DEFAULT_PIN_RETRIES, PIN_HASH_SIZE};
pub use session::{SecureSession, DEVICE_KEY_SIZE, SESSION_KEY_SIZE, WRAPPED_KEY_SIZE};
pub use sha256::{Sha256, SHA256_DIGEST_SIZE};
pub use trng::Trng;
pub use vault::{RamVault, SlotId, Vault, SLOT_CAPACITY, SLOT_COUNT};
