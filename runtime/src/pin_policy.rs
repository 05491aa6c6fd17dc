/*++

Licensed under the Apache-2.0 license.

File Name:

    pin_policy.rs

Abstract:

    File contains the setMinPINLength subcommand. The handler enforces the
    monotonic minimum-PIN-length policy, resolves the forced-change decision,
    and persists the policy record with the hashed RPID allow-list.

--*/

use opalkey_drivers::{
    reset_persistent_token, PinFileRecord, Sha256, SlotId, Trng, Vault, SHA256_DIGEST_SIZE,
};
use opalkey_error::{CtapError, CtapResult};

use crate::{ConfigRequest, Drivers, MinPinParams, SubParams, MAX_RP_IDS};

/// Minimum PIN length in effect when no policy record exists
pub const DEFAULT_MIN_PIN_LENGTH: u8 = 4;

/// Most RPID digests a policy record can carry
pub const MAX_STORED_RP_IDS: usize = MAX_RP_IDS - 1;

/// `[minLength][forceFlag]` prefix ahead of the digest list
const POLICY_HEADER_SIZE: usize = 2;

const POLICY_RECORD_MAX: usize = POLICY_HEADER_SIZE + MAX_STORED_RP_IDS * SHA256_DIGEST_SIZE;

pub struct MinPinPolicyCmd;
impl MinPinPolicyCmd {
    pub(crate) fn execute<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        request: &ConfigRequest,
    ) -> CtapResult<()> {
        let default = MinPinParams::default();
        let params = match &request.sub_params {
            SubParams::MinPin(params) => params,
            _ => &default,
        };

        let current = Self::current_min_pin_length(&drivers.vault);
        let new_min = if params.new_min_pin_length == 0 {
            current as u64
        } else {
            params.new_min_pin_length
        };
        if new_min < current as u64 {
            return Err(CtapError::ERR_PIN_POLICY_VIOLATION);
        }
        if new_min > u8::MAX as u64 {
            return Err(CtapError::ERR_INVALID_PARAMETER);
        }

        let pin_set = PinFileRecord::pin_is_set(&drivers.vault);
        if params.force_change_pin == Some(true) && !pin_set {
            return Err(CtapError::ERR_PIN_NOT_SET);
        }
        let mut force = params.force_change_pin == Some(true);
        if let Some(stored_len) = PinFileRecord::stored_pin_length(&drivers.vault) {
            if (stored_len as u64) < new_min {
                force = true;
            }
        }
        if force {
            reset_persistent_token(&mut drivers.vault, &mut drivers.trng)?;
            drivers.pin_token.reset(&mut drivers.trng);
        }

        let mut record = [0u8; POLICY_RECORD_MAX];
        record[0] = new_min as u8;
        record[1] = force as u8;
        let mut len = POLICY_HEADER_SIZE;
        for rp_id in params.rp_ids.iter() {
            record[len..len + SHA256_DIGEST_SIZE]
                .copy_from_slice(&Sha256::digest(rp_id.as_bytes()));
            len += SHA256_DIGEST_SIZE;
        }
        drivers
            .vault
            .put(SlotId::MinPinPolicy, &record[..len])
            .map_err(|_| CtapError::ERR_PROCESSING)?;
        drivers.vault.commit()
    }

    /// Minimum PIN length currently in effect.
    pub fn current_min_pin_length<V: Vault>(vault: &V) -> u8 {
        let data = vault.data(SlotId::MinPinPolicy);
        if data.is_empty() {
            DEFAULT_MIN_PIN_LENGTH
        } else {
            data[0]
        }
    }

    /// True if the last accepted policy update requires the PIN to change
    /// before the next use.
    pub fn force_change_required<V: Vault>(vault: &V) -> bool {
        let data = vault.data(SlotId::MinPinPolicy);
        data.len() >= POLICY_HEADER_SIZE && data[1] != 0
    }
}
