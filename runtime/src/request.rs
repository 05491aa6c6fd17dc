/*++

Licensed under the Apache-2.0 license.

File Name:

    request.rs

Abstract:

    File contains the authenticatorConfig request decoder. The decoder walks
    the CBOR parameter map in a single pass, enforces the strictly increasing
    key order, and captures the raw byte span of the sub-parameter structure
    for MAC verification.

--*/

use minicbor::data::Type;
use minicbor::Decoder;
use opalkey_error::{CtapError, CtapResult};

/// enableEnterpriseAttestation subcommand
pub const SUBCMD_ENABLE_ENTERPRISE_ATTESTATION: u64 = 0x01;

/// setMinPINLength subcommand
pub const SUBCMD_SET_MIN_PIN_LENGTH: u64 = 0x03;

/// vendorPrototype subcommand
pub const SUBCMD_VENDOR: u64 = 0xFF;

/// Decode capacity of the RPID allow-list. At most `MAX_RP_IDS - 1` entries
/// are accepted; the last slot exists only to detect overflow.
pub const MAX_RP_IDS: usize = 32;

/// Sub-parameters for the vendorPrototype subcommand
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VendorParams<'a> {
    pub command_id: u64,
    pub param_bytes: Option<&'a [u8]>,
    pub param_int: u64,
}

/// Sub-parameters for the setMinPINLength subcommand
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MinPinParams<'a> {
    pub new_min_pin_length: u64,
    pub rp_ids: heapless::Vec<&'a str, MAX_RP_IDS>,
    pub force_change_pin: Option<bool>,
}

/// Decoded sub-parameter structure, tagged by the subcommand discriminant.
/// `None` is used both when key 2 is absent and when the subcommand carries
/// no schema for it.
#[derive(Debug, PartialEq, Eq)]
pub enum SubParams<'a> {
    None,
    Vendor(VendorParams<'a>),
    MinPin(MinPinParams<'a>),
}

/// Decoded authenticatorConfig request
#[derive(Debug)]
pub struct ConfigRequest<'a> {
    pub sub_command: u64,
    pub sub_params: SubParams<'a>,

    /// Exact bytes of the sub-parameter structure as received. Used verbatim
    /// in the MAC message; never re-encoded.
    pub raw_sub_params: &'a [u8],

    pub pin_uv_auth_protocol: u64,
    pub pin_uv_auth_param: Option<&'a [u8]>,
}

impl<'a> ConfigRequest<'a> {
    /// Decodes the parameter map following the CTAP command byte.
    ///
    /// Top-level keys must be strictly increasing and drawn from {1, 2, 3, 4};
    /// key 1 (the subcommand) must come first. Nothing is decoded beyond the
    /// closing of the top-level map.
    pub fn decode(data: &'a [u8]) -> CtapResult<Self> {
        let mut d = Decoder::new(data);
        let mut request = ConfigRequest {
            sub_command: 0,
            sub_params: SubParams::None,
            raw_sub_params: &data[..0],
            pin_uv_auth_protocol: 0,
            pin_uv_auth_param: None,
        };

        let pairs = map_len(&mut d)?;
        let mut expected = 1u64;
        for i in 0..pairs {
            let key = uint(&mut d)?;
            if i == 0 && key != 1 {
                return Err(CtapError::ERR_MISSING_PARAMETER);
            }
            if key < expected {
                return Err(CtapError::ERR_INVALID_CBOR);
            }
            expected = key.checked_add(1).ok_or(CtapError::ERR_INVALID_CBOR)?;
            match key {
                0x01 => request.sub_command = uint(&mut d)?,
                0x02 => {
                    let start = d.position();
                    request.sub_params = Self::decode_sub_params(&mut d, request.sub_command)?;
                    request.raw_sub_params = &data[start..d.position()];
                }
                0x03 => request.pin_uv_auth_protocol = uint(&mut d)?,
                0x04 => request.pin_uv_auth_param = Some(bytes(&mut d)?),
                _ => return Err(CtapError::ERR_INVALID_CBOR),
            }
        }
        Ok(request)
    }

    fn decode_sub_params(d: &mut Decoder<'a>, sub_command: u64) -> CtapResult<SubParams<'a>> {
        match sub_command {
            SUBCMD_VENDOR => {
                let pairs = map_len(d)?;
                let mut params = VendorParams::default();
                for _ in 0..pairs {
                    match uint(d)? {
                        0x01 => params.command_id = uint(d)?,
                        0x02 => params.param_bytes = Some(bytes(d)?),
                        0x03 => params.param_int = uint(d)?,
                        _ => skip(d)?,
                    }
                }
                Ok(SubParams::Vendor(params))
            }
            SUBCMD_SET_MIN_PIN_LENGTH => {
                let pairs = map_len(d)?;
                let mut params = MinPinParams::default();
                for _ in 0..pairs {
                    match uint(d)? {
                        0x01 => params.new_min_pin_length = uint(d)?,
                        0x02 => {
                            let count = array_len(d)?;
                            for _ in 0..count {
                                let rp_id = text(d)?;
                                params
                                    .rp_ids
                                    .push(rp_id)
                                    .map_err(|_| CtapError::ERR_KEY_STORE_FULL)?;
                                if params.rp_ids.len() >= MAX_RP_IDS {
                                    return Err(CtapError::ERR_KEY_STORE_FULL);
                                }
                            }
                        }
                        0x03 => params.force_change_pin = Some(boolean(d)?),
                        _ => skip(d)?,
                    }
                }
                Ok(SubParams::MinPin(params))
            }
            _ => {
                // No schema for this discriminant. The value must still be a
                // map and is consumed wholesale so the raw span stays exact.
                match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
                    Type::Map => {}
                    Type::MapIndef => return Err(CtapError::ERR_INVALID_CBOR),
                    _ => return Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
                }
                skip(d)?;
                Ok(SubParams::None)
            }
        }
    }
}

fn map_len(d: &mut Decoder<'_>) -> CtapResult<u64> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::Map => match d.map().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
            Some(len) => Ok(len),
            None => Err(CtapError::ERR_INVALID_CBOR),
        },
        // Indefinite-length containers are banned by the CTAP2 canonical
        // encoding rules.
        Type::MapIndef => Err(CtapError::ERR_INVALID_CBOR),
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn array_len(d: &mut Decoder<'_>) -> CtapResult<u64> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::Array => match d.array().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
            Some(len) => Ok(len),
            None => Err(CtapError::ERR_INVALID_CBOR),
        },
        Type::ArrayIndef => Err(CtapError::ERR_INVALID_CBOR),
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn uint(d: &mut Decoder<'_>) -> CtapResult<u64> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => {
            d.u64().map_err(|_| CtapError::ERR_INVALID_CBOR)
        }
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn bytes<'b>(d: &mut Decoder<'b>) -> CtapResult<&'b [u8]> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::Bytes => d.bytes().map_err(|_| CtapError::ERR_INVALID_CBOR),
        Type::BytesIndef => Err(CtapError::ERR_INVALID_CBOR),
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn text<'b>(d: &mut Decoder<'b>) -> CtapResult<&'b str> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::String => d.str().map_err(|_| CtapError::ERR_INVALID_CBOR),
        Type::StringIndef => Err(CtapError::ERR_INVALID_CBOR),
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn boolean(d: &mut Decoder<'_>) -> CtapResult<bool> {
    match d.datatype().map_err(|_| CtapError::ERR_INVALID_CBOR)? {
        Type::Bool => d.bool().map_err(|_| CtapError::ERR_INVALID_CBOR),
        _ => Err(CtapError::ERR_CBOR_UNEXPECTED_TYPE),
    }
}

fn skip(d: &mut Decoder<'_>) -> CtapResult<()> {
    d.skip().map_err(|_| CtapError::ERR_INVALID_CBOR)
}
