//! Fixed-width hexadecimal fraction literals.
//!
//! A literal is exactly 16 characters, `S.HHHHHHHHHHHHHH`: one decimal digit
//! `S` for the integer part, a `.`, then 14 hexadecimal fraction digits. The
//! value is the 15 digits `SHHHHHHHHHHHHHH` read as one hexadecimal integer,
//! divided by `2^56`. Every literal therefore denotes a dyadic rational in
//! `[0, 10)` and decodes without rounding.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Num, One, Signed};

use crate::error::{DecodeFailure, Error, Result};

/// Total width of a literal.
pub const LITERAL_LEN: usize = 16;

/// Number of hexadecimal digits after the point.
pub const FRACTION_DIGITS: usize = 14;

/// `2^SCALE_BITS` is the common denominator of every literal.
const SCALE_BITS: usize = 4 * FRACTION_DIGITS;

fn scale() -> BigInt {
    BigInt::one() << SCALE_BITS
}

/// Decode a literal into an exact rational.
pub fn decode(literal: &str) -> Result<BigRational> {
    let reject = |reason| Error::Decode {
        literal: literal.to_owned(),
        reason,
    };

    let bytes = literal.as_bytes();
    if bytes.len() != LITERAL_LEN {
        return Err(reject(DecodeFailure::Length(bytes.len())));
    }
    if bytes[1] != b'.' {
        return Err(reject(DecodeFailure::MissingPoint));
    }
    if !bytes[0].is_ascii_digit() {
        return Err(reject(DecodeFailure::IntegerDigit(char::from(bytes[0]))));
    }
    if !bytes[2..].iter().all(u8::is_ascii_hexdigit) {
        return Err(reject(DecodeFailure::FractionDigits));
    }

    let digits = format!("{}{}", &literal[..1], &literal[2..]);
    let numerator = BigInt::from_str_radix(&digits, 16)
        .map_err(|_| reject(DecodeFailure::FractionDigits))?;

    Ok(BigRational::new(numerator, scale()))
}

/// Encode a rational as a literal, if it is representable.
///
/// Returns `None` for negative values, values `>= 10`, and values whose
/// denominator does not divide `2^56`.
#[must_use]
pub fn encode(value: &BigRational) -> Option<String> {
    if value.is_negative() {
        return None;
    }

    let scaled = value * BigRational::from_integer(scale());
    if !scaled.is_integer() {
        return None;
    }

    let limit = BigInt::from(10) << SCALE_BITS;
    let numerator = scaled.to_integer();
    if numerator >= limit {
        return None;
    }

    let digits = format!("{numerator:0width$x}", width = FRACTION_DIGITS + 1);
    Some(format!("{}.{}", &digits[..1], &digits[1..]))
}
