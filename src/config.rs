//! Run configuration: the two file paths a run reads and writes.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::interpreter::{Interpreter, RunStats};

/// Default directive stream, relative to the working directory.
pub const DEFAULT_INPUT: &str = "input.txt";

/// Default verifier script, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "input.wl";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Interpret the input file into the output file.
    ///
    /// Both files are closed on every exit path. On failure the partially
    /// written output is deleted so it cannot be mistaken for a valid script.
    pub fn run(&self) -> Result<RunStats> {
        let input = File::open(&self.input).map_err(|source| Error::Resource {
            path: self.input.clone(),
            source,
        })?;
        let output = File::create(&self.output).map_err(|source| Error::Resource {
            path: self.output.clone(),
            source,
        })?;
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            "Generating verification conditions"
        );

        let result = Interpreter::new(BufReader::new(input), BufWriter::new(output))
            .run()
            .and_then(|(stats, out)| {
                out.into_inner().map_err(|e| Error::Io(e.into_error()))?;
                Ok(stats)
            });

        if result.is_err()
            && let Err(e) = fs::remove_file(&self.output)
        {
            warn!(
                path = %self.output.display(),
                error = %e,
                "Could not remove incomplete output"
            );
        }
        result
    }
}
