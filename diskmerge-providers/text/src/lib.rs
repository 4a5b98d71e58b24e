//! Whitespace-separated `x y radius` disk input.
//!
//! Each line holding exactly three whitespace-separated tokens is a disk
//! record. The token count alone decides: a line with any other count is
//! skipped without complaint, and a three-token line that does not parse is
//! an error.
use std::io::BufRead;

use diskmerge_core::{Disk, DiskSet, DiskSetError, Point};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading disk records.
#[derive(Debug, Error)]
pub enum TextProviderError {
    /// Reading from the underlying source failed.
    #[error("failed to read disk input: {0}")]
    Io(#[from] std::io::Error),
    /// A three-token line held a value that is not a number.
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// The parsed records do not form a valid disk set.
    #[error(transparent)]
    InvalidDisk(#[from] DiskSetError),
}

/// Disk set parsed from line-oriented text.
#[derive(Clone, Debug)]
pub struct DiskTextSource {
    disks: DiskSet,
    skipped_lines: usize,
}

impl DiskTextSource {
    /// Parses every record from `reader`.
    ///
    /// # Errors
    /// Returns [`TextProviderError::Io`] when reading fails,
    /// [`TextProviderError::InvalidNumber`] when a record holds a token that
    /// does not parse as `f64`, and [`TextProviderError::InvalidDisk`] when a
    /// record is not a valid disk.
    ///
    /// # Examples
    /// ```
    /// use diskmerge_providers_text::DiskTextSource;
    ///
    /// let input = "0 0 1\n# note\n4 0 2\n";
    /// let source = DiskTextSource::try_from_reader("demo", input.as_bytes())?;
    /// assert_eq!(source.len(), 2);
    /// assert_eq!(source.skipped_lines(), 1);
    /// assert_eq!(source.disk_set()[1].radius(), 2.0);
    /// # Ok::<(), diskmerge_providers_text::TextProviderError>(())
    /// ```
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, TextProviderError> {
        let mut disks = Vec::new();
        let mut skipped_lines = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [x, y, radius] = tokens.as_slice() else {
                skipped_lines += 1;
                continue;
            };
            let number = index + 1;
            disks.push(Disk::new(
                Point::new(parse(number, x)?, parse(number, y)?),
                parse(number, radius)?,
            ));
        }
        let disks = DiskSet::new(name, disks)?;
        debug!(
            source = disks.name(),
            records = disks.len(),
            skipped_lines,
            "disk text parsed"
        );
        Ok(Self {
            disks,
            skipped_lines,
        })
    }

    /// Returns the parsed disks.
    #[must_use]
    pub fn disk_set(&self) -> &DiskSet {
        &self.disks
    }

    /// Consumes the source and returns its disks.
    #[must_use]
    pub fn into_disk_set(self) -> DiskSet {
        self.disks
    }

    /// Returns the source name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.disks.name()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Returns whether no record was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Returns how many lines were not records.
    #[must_use]
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

fn parse(line: usize, token: &str) -> Result<f64, TextProviderError> {
    token
        .parse()
        .map_err(|_| TextProviderError::InvalidNumber {
            line,
            token: token.to_owned(),
        })
}
