//! Directive lines.
//!
//! ```text
//! v <coefficient> <b0> <b1> ... <b8>    verify the current box
//! a | b | c | d | e | f                 split the current box on that coordinate
//! ```

use num_rational::BigRational;

use crate::error::{Error, FormatFailure, Result};
use crate::hex_fraction::{self, LITERAL_LEN};
use crate::qxy_box::Coord;

/// Number of bound values in a verify payload.
pub const BOUND_COUNT: usize = 9;

/// Width of a verify line without its terminator: `v` then ten
/// space-prefixed literals.
pub const VERIFY_LINE_WIDTH: usize = 1 + (BOUND_COUNT + 1) * (LITERAL_LEN + 1);

/// Decoded payload of a verify directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyPayload {
    pub coefficient: BigRational,
    pub bounds: [BigRational; BOUND_COUNT],
}

/// One line of the directive stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Split(Coord),
    Verify(VerifyPayload),
}

impl Directive {
    /// Parse one line. A trailing `\n` or `\r\n` is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let body = line
            .strip_suffix('\n')
            .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest));

        if let Some(rest) = body.strip_prefix('v') {
            return parse_verify(body, rest).map(Self::Verify);
        }

        let mut chars = body.chars();
        if let (Some(letter), None) = (chars.next(), chars.next())
            && let Some(coord) = Coord::from_letter(letter)
        {
            return Ok(Self::Split(coord));
        }

        Err(Error::DirectiveFormat(FormatFailure::UnknownDirective(
            body.to_owned(),
        )))
    }
}

fn parse_verify(body: &str, rest: &str) -> Result<VerifyPayload> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() != BOUND_COUNT + 1 {
        return Err(Error::DirectiveFormat(FormatFailure::TokenCount(
            tokens.len(),
        )));
    }

    let coefficient = hex_fraction::decode(tokens[0])?;
    let bounds: [BigRational; BOUND_COUNT] = tokens[1..]
        .iter()
        .map(|token| hex_fraction::decode(token))
        .collect::<Result<Vec<_>>>()?
        .try_into()
        .map_err(|rest: Vec<_>| {
            Error::DirectiveFormat(FormatFailure::TokenCount(rest.len() + 1))
        })?;

    // Every token decoded, so only stray whitespace can make the width wrong.
    if body.len() != VERIFY_LINE_WIDTH {
        return Err(Error::DirectiveFormat(FormatFailure::LineWidth(body.len())));
    }

    Ok(VerifyPayload {
        coefficient,
        bounds,
    })
}
