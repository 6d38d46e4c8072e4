//! # `simplex_vcgen`
//!
//! Generates machine-checkable verification conditions for a proof that
//! subdivides the product of two 2-simplices.
//!
//! ## What is this?
//!
//! A point of the search space is a pair `(Qx, Qy)` of probability vectors on
//! three outcomes. A precomputed decision tree recursively halves the
//! six-dimensional box `[0, 1]^6` containing them. For every leaf box this
//! crate emits one `verify[...]` expression carrying the leaf's inequality
//! data plus the exact extreme points of `Qx (x) Qy` over that box, for an
//! external symbolic verifier to check.
//!
//! ## Quick Start
//!
//! ```rust
//! use simplex_vcgen::{QxyBox, SimplexGroup};
//!
//! let mut unit = QxyBox::unit();
//! unit.refine()?;
//!
//! // The full triangle has its three corners as extreme points.
//! let corners = unit.extreme_points(SimplexGroup::Qx)?;
//! assert_eq!(corners.len(), 3);
//!
//! // Halving one coordinate cuts a corner off: a quadrilateral.
//! let (lower_half, _) = unit.split(simplex_vcgen::Coord::new(0).unwrap());
//! let quad = lower_half.refined()?.extreme_points(SimplexGroup::Qx)?;
//! assert_eq!(quad.len(), 4);
//! # Ok::<(), simplex_vcgen::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! directive line --parse--> Directive
//!                                |
//! work stack --pop--> QxyBox --refine--> split: push two halves
//!                                     \-> verify: extreme points -> VerifierWriter
//! ```
//!
//! All arithmetic is exact ([`num_rational::BigRational`]); every failure is
//! fatal and reported as an [`Error`].

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod directive;
mod error;
mod extreme_points;
pub mod hex_fraction;
mod interpreter;
mod qxy_box;
mod writer;

pub use config::{DEFAULT_INPUT, DEFAULT_OUTPUT, RunConfig};
pub use directive::{BOUND_COUNT, Directive, VERIFY_LINE_WIDTH, VerifyPayload};
pub use error::{DecodeFailure, Error, FormatFailure, Result};
pub use extreme_points::Point3;
pub use interpreter::{Interpreter, RunStats, interpret};
pub use qxy_box::{BoundPhase, Coord, DIM, GROUP_DIM, GroupBounds, QxyBox, SimplexGroup};
pub use writer::{FINISH_MARKER, Point9, VerificationRecord, VerifierWriter};

/// Re-export the exact arithmetic types used throughout the API.
pub mod num {
    pub use num_bigint::BigInt;
    pub use num_rational::BigRational;
}
