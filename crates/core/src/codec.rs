//! IEEE-754 single-precision hex record codec.
//!
//! A hex record is one `f32` rendered as exactly eight lowercase hex digits.
//! Records travel through the HDL testbench unchanged, so the codec works on
//! raw bit patterns and round-trips every value, NaN payloads included.
//!
//! Decoding comes in two flavours:
//! - [`try_decode_f32`] rejects anything that is not eight hex digits and says why.
//! - [`decode_f32`] is the best-effort policy used for simulator output: every
//!   rejected record, including `x`/`z` unknown states, becomes `0.0`.

use serde::Deserialize;

use crate::common::CodecError;

/// Number of hex digits in one record.
pub const HEX_DIGITS: usize = 8;

/// Order in which the four IEEE-754 bytes appear in a hex record.
///
/// The encoder and decoder always take the same value, so files written by
/// the stimulus generator read back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HexByteOrder {
    /// Most significant byte first: `1.0` is `3f800000`.
    ///
    /// This is the IEEE-754 bit pattern read left to right, the layout
    /// `$readmemh` loads into a `[31:0]` register.
    #[default]
    #[serde(alias = "msb_first", alias = "BigEndian")]
    MsbFirst,
    /// Least significant byte first: `1.0` is `0000803f`.
    #[serde(alias = "lsb_first", alias = "LittleEndian")]
    LsbFirst,
}

impl HexByteOrder {
    /// Maps an IEEE-754 bit pattern to the integer whose hex text is the record.
    ///
    /// Byte swapping is an involution, so the same mapping serves both directions.
    #[inline]
    const fn arrange(self, bits: u32) -> u32 {
        match self {
            Self::MsbFirst => bits,
            Self::LsbFirst => bits.swap_bytes(),
        }
    }
}

/// Returns `true` if the record carries an HDL unknown (`x`) or high-impedance (`z`) digit.
///
/// # Examples
///
/// ```
/// use imgdiv_core::codec::is_unknown_state;
///
/// assert!(is_unknown_state("xxxxxxxx"));
/// assert!(is_unknown_state("3f8z0000"));
/// assert!(!is_unknown_state("3f800000"));
/// ```
pub fn is_unknown_state(record: &str) -> bool {
    record
        .bytes()
        .any(|b| matches!(b, b'x' | b'X' | b'z' | b'Z'))
}

/// Encodes `value` as an eight-digit lowercase hex record.
///
/// # Examples
///
/// ```
/// use imgdiv_core::codec::{encode_f32, HexByteOrder};
///
/// assert_eq!(encode_f32(1.0, HexByteOrder::MsbFirst), "3f800000");
/// assert_eq!(encode_f32(1.0, HexByteOrder::LsbFirst), "0000803f");
/// assert_eq!(encode_f32(0.0, HexByteOrder::MsbFirst), "00000000");
/// ```
pub fn encode_f32(value: f32, order: HexByteOrder) -> String {
    format!("{:08x}", order.arrange(value.to_bits()))
}

/// Decodes one hex record, reporting why it was rejected.
///
/// Leading and trailing whitespace (including a line terminator) is ignored.
/// Upper- and lowercase digits are both accepted.
///
/// # Arguments
///
/// * `record` - Record text, typically one line of a hex file.
/// * `order` - Byte order the record was written with.
///
/// # Errors
///
/// Returns a [`CodecError`] if the record is empty, holds an unknown state,
/// is not eight characters long, or contains a non-hex character.
pub fn try_decode_f32(record: &str, order: HexByteOrder) -> Result<f32, CodecError> {
    let token = record.trim();
    if token.is_empty() {
        return Err(CodecError::Empty);
    }
    if is_unknown_state(token) {
        return Err(CodecError::UnknownState(token.to_owned()));
    }
    if token.len() != HEX_DIGITS {
        return Err(CodecError::Length {
            token: token.to_owned(),
            len: token.len(),
        });
    }
    // from_str_radix alone would accept a leading '+'.
    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidDigit(token.to_owned()));
    }
    let raw = u32::from_str_radix(token, 16)
        .map_err(|_| CodecError::InvalidDigit(token.to_owned()))?;
    Ok(f32::from_bits(order.arrange(raw)))
}

/// Decodes one hex record, mapping every rejected record to `0.0`.
///
/// Simulation output legitimately contains undefined bits during bring-up;
/// those pixels read as black instead of aborting the comparison.
///
/// # Examples
///
/// ```
/// use imgdiv_core::codec::{decode_f32, HexByteOrder};
///
/// assert_eq!(decode_f32("3f800000\n", HexByteOrder::MsbFirst), 1.0);
/// assert_eq!(decode_f32("xxxxxxxx", HexByteOrder::MsbFirst), 0.0);
/// assert_eq!(decode_f32("", HexByteOrder::MsbFirst), 0.0);
/// ```
pub fn decode_f32(record: &str, order: HexByteOrder) -> f32 {
    try_decode_f32(record, order).unwrap_or(0.0)
}
