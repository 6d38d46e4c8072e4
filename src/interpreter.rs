//! # Directive Interpreter
//!
//! Replays a precomputed decision tree over the unit box. The tree is
//! serialized depth-first, left branch first, one directive per node; the
//! interpreter keeps an explicit work stack and pairs the Nth pop with the
//! Nth directive line.
//!
//! ```text
//! stack = [unit box]
//! while let Some(box) = stack.pop():
//!     refine(box)
//!     match next line:
//!         split c  => push upper half, push lower half
//!         verify p => write record(p, box)
//! stream must now be exhausted
//! ```
//!
//! Any mismatch between the stack and the stream is fatal.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::directive::Directive;
use crate::error::{Error, FormatFailure, Result};
use crate::qxy_box::{BoundPhase, QxyBox};
use crate::writer::{VerificationRecord, VerifierWriter};

/// Counters for one complete run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub splits: usize,
    pub verifies: usize,
    /// Deepest split level reached; the unit box is depth 0.
    pub max_depth: usize,
    /// Largest number of boxes pending on the work stack.
    pub max_stack: usize,
}

/// A pending box and its depth in the split tree.
#[derive(Clone, Debug)]
struct WorkItem {
    qxy_box: QxyBox,
    depth: usize,
}

/// Drives one directive stream into one verifier output.
pub struct Interpreter<R: BufRead, W: Write> {
    directives: R,
    writer: VerifierWriter<W>,
    stack: Vec<WorkItem>,
    line: String,
    line_no: usize,
    stats: RunStats,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Start at the unit box.
    pub fn new(directives: R, out: W) -> Self {
        Self {
            directives,
            writer: VerifierWriter::new(out),
            stack: vec![WorkItem {
                qxy_box: QxyBox::unit(),
                depth: 0,
            }],
            line: String::new(),
            line_no: 0,
            stats: RunStats {
                max_stack: 1,
                ..RunStats::default()
            },
        }
    }

    /// Number of boxes still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    /// Process one box and its directive.
    ///
    /// Returns `Ok(false)` once the work stack is empty.
    pub fn step(&mut self) -> Result<bool> {
        let Some(item) = self.stack.pop() else {
            return Ok(false);
        };
        self.line_no += 1;
        let line_no = self.line_no;
        self.process(item).map_err(|e| e.at_line(line_no))?;
        Ok(true)
    }

    /// Run to completion, check that the stream is exhausted, and write the
    /// terminal marker.
    pub fn run(mut self) -> Result<(RunStats, W)> {
        while self.step()? {}

        if self.read_line()? {
            let trailing = self.line.trim_end_matches(['\n', '\r']).to_owned();
            return Err(
                Error::DirectiveFormat(FormatFailure::TrailingDirective(trailing))
                    .at_line(self.line_no + 1),
            );
        }

        let out = self.writer.finish()?;
        info!(
            splits = self.stats.splits,
            verifies = self.stats.verifies,
            max_depth = self.stats.max_depth,
            max_stack = self.stats.max_stack,
            "Directive stream complete"
        );
        Ok((self.stats, out))
    }

    fn process(&mut self, item: WorkItem) -> Result<()> {
        let WorkItem { mut qxy_box, depth } = item;
        qxy_box.check_bounds(BoundPhase::BeforeRefinement)?;
        qxy_box.refine()?;

        if !self.read_line()? {
            return Err(Error::DirectiveFormat(
                FormatFailure::UnexpectedEndOfStream {
                    pending: self.stack.len() + 1,
                },
            ));
        }

        match Directive::parse(&self.line)? {
            Directive::Split(coord) => {
                debug!(line = self.line_no, depth, %coord, "split");
                let (lower_half, upper_half) = qxy_box.split(coord);
                let depth = depth + 1;
                // Lower half on top: it is processed next.
                self.stack.push(WorkItem {
                    qxy_box: upper_half,
                    depth,
                });
                self.stack.push(WorkItem {
                    qxy_box: lower_half,
                    depth,
                });
                self.stats.splits += 1;
                self.stats.max_depth = self.stats.max_depth.max(depth);
                self.stats.max_stack = self.stats.max_stack.max(self.stack.len());
            }
            Directive::Verify(payload) => {
                let record = VerificationRecord::new(payload, &qxy_box)?;
                debug!(
                    line = self.line_no,
                    depth,
                    points = record.point_count(),
                    "verify"
                );
                self.writer.write_record(&record)?;
                self.stats.verifies += 1;
            }
        }
        Ok(())
    }

    /// Read the next line into `self.line`. Returns `false` at end of stream.
    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        Ok(self.directives.read_line(&mut self.line)? > 0)
    }
}

/// Interpret a whole directive stream, writing records to `out`.
pub fn interpret<R: BufRead, W: Write>(directives: R, out: W) -> Result<RunStats> {
    Interpreter::new(directives, out).run().map(|(stats, _)| stats)
}
