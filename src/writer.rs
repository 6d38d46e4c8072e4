//! Verification records and their text form.
//!
//! Each leaf box becomes one `verify[...]` expression for the downstream
//! symbolic verifier:
//!
//! ```text
//! verify[<coefficient>,
//! {{b0,b1,b2},
//! {b3,b4,b5},
//! {b6,b7,b8}},
//! {{<point0>},
//! {<point1>},
//! ...}];
//!
//! ```
//!
//! The run ends with a single `Print["finish"];` line. Rationals print as
//! `n` or `n/d`, which is what the verifier's expression grammar expects.

use std::array;
use std::io::Write;

use itertools::Itertools;
use num_rational::BigRational;

use crate::directive::{BOUND_COUNT, VerifyPayload};
use crate::error::Result;
use crate::extreme_points::Point3;
use crate::qxy_box::{GROUP_DIM, QxyBox, SimplexGroup};

/// Terminal line written once the directive stream is exhausted.
pub const FINISH_MARKER: &str = "Print[\"finish\"];";

/// A joint point of both groups: `q[i] = qx[i / 3] * qy[i % 3]`.
pub type Point9 = [BigRational; GROUP_DIM * GROUP_DIM];

/// Everything the verifier needs for one leaf box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRecord {
    pub coefficient: BigRational,
    pub bounds: [BigRational; BOUND_COUNT],
    pub qx_points: Vec<Point3>,
    pub qy_points: Vec<Point3>,
}

impl VerificationRecord {
    /// Build the record for a refined box.
    pub fn new(payload: VerifyPayload, refined: &QxyBox) -> Result<Self> {
        Ok(Self {
            coefficient: payload.coefficient,
            bounds: payload.bounds,
            qx_points: refined.extreme_points(SimplexGroup::Qx)?,
            qy_points: refined.extreme_points(SimplexGroup::Qy)?,
        })
    }

    /// Cartesian product of the two extreme point sets, `Qx` outermost.
    pub fn combined_points(&self) -> impl Iterator<Item = Point9> + '_ {
        self.qx_points
            .iter()
            .cartesian_product(&self.qy_points)
            .map(|(qx, qy)| array::from_fn(|i| &qx[i / GROUP_DIM] * &qy[i % GROUP_DIM]))
    }

    /// Number of combined points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.qx_points.len() * self.qy_points.len()
    }
}

/// Writes verification records in the verifier's syntax.
pub struct VerifierWriter<W: Write> {
    out: W,
    records: usize,
}

impl<W: Write> VerifierWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out, records: 0 }
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn records(&self) -> usize {
        self.records
    }

    pub fn write_record(&mut self, record: &VerificationRecord) -> Result<()> {
        let matrix = record
            .bounds
            .chunks(GROUP_DIM)
            .map(|row| row.iter().join(","))
            .join("},\n{");
        let points = record
            .combined_points()
            .map(|point| point.iter().join(","))
            .join("},\n{");

        write!(
            self.out,
            "verify[{},\n{{{{{matrix}}}}},\n{{{{{points}}}}}];\n\n",
            record.coefficient
        )?;
        self.records += 1;
        Ok(())
    }

    /// Write the terminal marker, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        writeln!(self.out, "{FINISH_MARKER}")?;
        self.out.flush()?;
        Ok(self.out)
    }
}
