/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the authenticatorConfig command handler. The handler decodes
    the request, verifies the PIN/UV auth MAC and the configuration permission,
    then dispatches to the subcommand implementations.

--*/

use opalkey_drivers::{cprintln, Fido2Options, Permission, PinUvAuthProtocol, Trng, Vault};
use opalkey_error::{CtapError, CtapResult};

use crate::{
    ConfigRequest, Drivers, MinPinPolicyCmd, VendorCmd, SUBCMD_ENABLE_ENTERPRISE_ATTESTATION,
    SUBCMD_SET_MIN_PIN_LENGTH, SUBCMD_VENDOR,
};

/// CTAP command byte for authenticatorConfig
pub const COMMAND_AUTHENTICATOR_CONFIG: u8 = 0x0D;

const MAC_PADDING: [u8; 32] = [0xFF; 32];

pub struct ConfigCmd;
impl ConfigCmd {
    /// Processes one authenticatorConfig request. `data` is the CBOR
    /// parameter map following the command byte.
    ///
    /// Decoding completes before authorization; authorization completes
    /// before any subcommand runs. No persistent state is touched on either
    /// failure path.
    pub fn execute<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
        data: &[u8],
    ) -> CtapResult<()> {
        let request = ConfigRequest::decode(data)?;
        Self::authorize(drivers, &request)?;
        match request.sub_command {
            SUBCMD_ENABLE_ENTERPRISE_ATTESTATION => Self::enable_enterprise_attestation(drivers),
            SUBCMD_SET_MIN_PIN_LENGTH => MinPinPolicyCmd::execute(drivers, &request),
            SUBCMD_VENDOR => VendorCmd::execute(drivers, &request),
            _ => Err(CtapError::ERR_UNSUPPORTED_OPTION),
        }
    }

    /// Verifies the request MAC over `0xFF * 32 || 0x0D || subcommand ||
    /// rawSubParams` and requires the ACFG permission on the current token.
    ///
    /// MAC failure and missing permission return the same code so a caller
    /// cannot tell which check rejected it.
    fn authorize<V: Vault, T: Trng>(
        drivers: &Drivers<V, T>,
        request: &ConfigRequest,
    ) -> CtapResult<()> {
        let Some(mac) = request.pin_uv_auth_param else {
            return Err(CtapError::ERR_PUAT_REQUIRED);
        };
        if request.pin_uv_auth_protocol == 0 {
            return Err(CtapError::ERR_MISSING_PARAMETER);
        }
        let protocol = match request.pin_uv_auth_protocol {
            1 => PinUvAuthProtocol::One,
            2 => PinUvAuthProtocol::Two,
            _ => return Err(CtapError::ERR_INVALID_PARAMETER),
        };
        drivers.pin_token.verify(
            protocol,
            &[
                &MAC_PADDING,
                &[COMMAND_AUTHENTICATOR_CONFIG, request.sub_command as u8],
                request.raw_sub_params,
            ],
            mac,
        )?;
        if !drivers
            .pin_token
            .permissions
            .contains(Permission::AUTHENTICATOR_CONFIGURATION)
        {
            return Err(CtapError::ERR_PIN_AUTH_INVALID);
        }
        Ok(())
    }

    fn enable_enterprise_attestation<V: Vault, T: Trng>(
        drivers: &mut Drivers<V, T>,
    ) -> CtapResult<()> {
        let mut options = Fido2Options::load(&drivers.vault);
        options.insert(Fido2Options::ENTERPRISE_ATTESTATION);
        options.store(&mut drivers.vault)?;
        cprintln!("[config] enterprise attestation enabled");
        Ok(())
    }
}
