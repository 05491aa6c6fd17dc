// Licensed under the Apache-2.0 license

use opalkey_drivers::{PinUvAuthToken, SecureSession, Trng, Vault};

/// Runtime driver state shared by all command handlers.
///
/// Generic over the vault and random source so the same handlers run against
/// flash-backed storage on hardware and RAM-backed storage in the test
/// harness.
pub struct Drivers<V: Vault, T: Trng> {
    pub vault: V,
    pub trng: T,

    /// Transient PIN/UV auth token issued by clientPIN
    pub pin_token: PinUvAuthToken,

    /// Secure channel established by the key-agreement command set
    pub session: SecureSession,
}

impl<V: Vault, T: Trng> Drivers<V, T> {
    pub fn new(vault: V, trng: T) -> Self {
        Self {
            vault,
            trng,
            pin_token: PinUvAuthToken::zeroed(),
            session: SecureSession::new(),
        }
    }
}
