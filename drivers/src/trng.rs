// Licensed under the Apache-2.0 license

//! Entropy seam for nonce and token generation.

/// Random source used wherever the firmware needs fresh secrets.
pub trait Trng {
    /// Fills `buf` with random bytes.
    fn fill_bytes(&mut self, buf: &mut [u8]);
}

/// Any cryptographically secure `rand_core` generator is a valid source, so
/// hosts and tests can plug in `OsRng` or a seeded `StdRng` directly.
impl<T: rand_core::RngCore + rand_core::CryptoRng> Trng for T {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        rand_core::RngCore::fill_bytes(self, buf)
    }
}
