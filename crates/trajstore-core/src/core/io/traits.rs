use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for small, fixed-format text files read in one pass.
///
/// Trajectory logs themselves are too large for this interface and are streamed
/// through [`SnapshotScanner`](super::scanner::SnapshotScanner) instead. Implementors
/// cover the companion files (box parameters, `.xyz` geometries).
pub trait TextFormat {
    /// The value produced by parsing a complete file.
    type Output;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Parses a complete file from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Parses a complete file from a path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
