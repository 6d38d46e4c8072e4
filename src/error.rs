//! Error taxonomy for the generator.
//!
//! Every error is fatal: the directive file is produced in lockstep with the
//! splitting logic, so any inconsistency means the whole run is invalid.

use std::path::PathBuf;

use num_rational::BigRational;
use thiserror::Error;

use crate::qxy_box::{BoundPhase, Coord, QxyBox};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a hex fraction literal was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("expected 16 characters, found {0}")]
    Length(usize),
    #[error("expected '.' at position 1")]
    MissingPoint,
    #[error("integer digit {0:?} is not in 0-9")]
    IntegerDigit(char),
    #[error("fraction digits are not all hexadecimal")]
    FractionDigits,
}

/// Why a directive line (or the directive stream as a whole) was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatFailure {
    #[error("unrecognized directive {0:?}")]
    UnknownDirective(String),
    #[error("verify directive has {0} tokens (need 10)")]
    TokenCount(usize),
    #[error("verify directive is {0} characters wide (need 171)")]
    LineWidth(usize),
    #[error("directive stream ended with {pending} box(es) still on the work stack")]
    UnexpectedEndOfStream { pending: usize },
    #[error("work stack is empty but directive {0:?} remains")]
    TrailingDirective(String),
}

/// Fatal errors raised while generating verification conditions.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed encoded rational literal.
    #[error("cannot decode {literal:?}: {reason}")]
    Decode {
        literal: String,
        reason: DecodeFailure,
    },

    /// Unrecognized line content or a stream/stack length mismatch.
    #[error("malformed directive stream: {0}")]
    DirectiveFormat(FormatFailure),

    /// A bound became empty or inverted.
    #[error("infeasible box {phase} at coordinate {coord}: lower {lower} >= upper {upper} or outside [0, 1] in {qxy_box}")]
    InfeasibleBox {
        phase: BoundPhase,
        coord: Coord,
        lower: BigRational,
        upper: BigRational,
        qxy_box: Box<QxyBox>,
    },

    /// A derived vertex coordinate fell outside its tightened bound.
    #[error("extreme point coordinate {coord} = {value} lies outside [{lower}, {upper}] (pinned {pinned_lower} low, {pinned_upper} high)")]
    ExtremePointViolation {
        coord: Coord,
        pinned_lower: Coord,
        pinned_upper: Coord,
        value: BigRational,
        lower: BigRational,
        upper: BigRational,
    },

    /// Failure to open one of the two scoped resources.
    #[error("{}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any of the above, tagged with the 1-based directive line it occurred on.
    #[error("directive line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Self>,
    },
}

impl Error {
    /// Attach a directive line number. Already-tagged errors are left alone.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::AtLine { .. } => self,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The error with any line tagging stripped.
    #[must_use]
    pub fn innermost(&self) -> &Self {
        match self {
            Self::AtLine { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Directive line the error occurred on, if known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}
