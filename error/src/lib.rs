/*++

Licensed under the Apache-2.0 license.

File Name:

    error.rs

Abstract:

    File contains the CTAP status code registry used for error handling
    across the OpalKey firmware.

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU8, TryFromIntError};

/// CTAP status code
///
/// One byte on the wire; 0x00 is success and therefore not representable
/// here. Values follow the CTAP 2.1 error code assignments.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CtapError(pub NonZeroU8);

/// Macro to define status constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each status code.
#[macro_export]
macro_rules! define_status_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: CtapError = CtapError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined status constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u8)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl CtapError {
    /// Create a CTAP status; intended to only be used from const contexts, as we
    /// don't want runtime panics if val is zero. The preferred way to get a
    /// CtapError from a u8 is `CtapError::try_from()` from the `TryFrom` trait
    /// impl.
    const fn new_const(val: u8) -> Self {
        match NonZeroU8::new(val) {
            Some(val) => Self(val),
            None => panic!("CtapError cannot be 0"),
        }
    }

    // Use the macro to define all status constants
    define_status_constants![
        (ERR_INVALID_COMMAND, 0x01, "The command is not a valid CTAP command"),
        (ERR_INVALID_PARAMETER, 0x02, "The command included an invalid parameter"),
        (ERR_INVALID_LENGTH, 0x03, "Invalid message or item length"),
        (
            ERR_CBOR_UNEXPECTED_TYPE,
            0x11,
            "Invalid or unexpected CBOR type"
        ),
        (ERR_INVALID_CBOR, 0x12, "Error when parsing CBOR"),
        (ERR_MISSING_PARAMETER, 0x14, "Missing non-optional parameter"),
        (ERR_LIMIT_EXCEEDED, 0x15, "Limit for number of items exceeded"),
        (ERR_PROCESSING, 0x21, "Processing (lengthy operation is in progress)"),
        (
            ERR_UNSUPPORTED_ALGORITHM,
            0x26,
            "Requested an unsupported algorithm"
        ),
        (ERR_OPERATION_DENIED, 0x27, "The operation was denied"),
        (
            ERR_KEY_STORE_FULL,
            0x28,
            "Internal key storage is full"
        ),
        (ERR_UNSUPPORTED_OPTION, 0x2B, "Unsupported option"),
        (ERR_INVALID_OPTION, 0x2C, "Not a valid option for current operation"),
        (ERR_NO_CREDENTIALS, 0x2E, "No valid credentials provided"),
        (ERR_NOT_ALLOWED, 0x30, "Not allowed for this command or state"),
        (ERR_PIN_INVALID, 0x31, "PIN invalid"),
        (ERR_PIN_BLOCKED, 0x32, "PIN blocked"),
        (
            ERR_PIN_AUTH_INVALID,
            0x33,
            "PIN authentication (pinUvAuthParam) verification failed"
        ),
        (
            ERR_PIN_AUTH_BLOCKED,
            0x34,
            "PIN authentication blocked; requires power recycle"
        ),
        (ERR_PIN_NOT_SET, 0x35, "No PIN has been set"),
        (
            ERR_PUAT_REQUIRED,
            0x36,
            "A pinUvAuthToken is required for the selected operation"
        ),
        (
            ERR_PIN_POLICY_VIOLATION,
            0x37,
            "The provided PIN or policy update violates the PIN policy"
        ),
        (ERR_REQUEST_TOO_LARGE, 0x39, "The request is larger than supported"),
        (
            ERR_INVALID_SUBCOMMAND,
            0x3E,
            "The requested subcommand is either invalid or not implemented"
        ),
        (
            ERR_UNAUTHORIZED_PERMISSION,
            0x40,
            "The permissions parameter contains an unauthorized permission"
        ),
        (ERR_OTHER, 0x7F, "Other unspecified error"),
    ];
}

impl From<core::num::NonZeroU8> for crate::CtapError {
    fn from(val: core::num::NonZeroU8) -> Self {
        crate::CtapError(val)
    }
}

impl From<CtapError> for core::num::NonZeroU8 {
    fn from(val: CtapError) -> Self {
        val.0
    }
}

impl From<CtapError> for u8 {
    fn from(val: CtapError) -> Self {
        core::num::NonZeroU8::from(val).get()
    }
}

impl From<CtapError> for u32 {
    fn from(val: CtapError) -> Self {
        u8::from(val) as u32
    }
}

impl TryFrom<u8> for CtapError {
    type Error = TryFromIntError;
    fn try_from(val: u8) -> Result<Self, TryFromIntError> {
        match NonZeroU8::try_from(val) {
            Ok(val) => Ok(CtapError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type CtapResult<T> = Result<T, CtapError>;
