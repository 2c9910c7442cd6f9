// SPDX-License-Identifier: MIT
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::recording::format::{REQUIRED_COLUMNS, Recording, Sample};
use crate::{Error, Result};

/// Opens a capture file, validates its header, and reads every sample.
///
/// Called once per query so that rows appended by a live capture process
/// since the previous call are picked up. Row order is preserved.
///
/// # Errors
///
/// Returns [`Error::DataNotFound`] when the path does not resolve,
/// [`Error::InvalidFormat`] when the header is not exactly the required
/// column set, and [`Error::Csv`] when a row fails to parse.
pub fn load(path: &Path) -> Result<Recording> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::DataNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;

    let mut reader = csv::Reader::from_reader(file);
    validate_header(reader.headers()?)?;

    let mut samples = Vec::new();
    for row in reader.deserialize() {
        let sample: Sample = row?;
        samples.push(sample);
    }

    Ok(Recording::new(samples))
}

/// The header must contain exactly the four required columns, by name, in
/// any order. Anything else means the file came from an incompatible
/// capture pipeline.
fn validate_header(headers: &csv::StringRecord) -> Result<()> {
    if headers.len() != REQUIRED_COLUMNS.len() {
        return Err(Error::InvalidFormat);
    }
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::InvalidFormat);
        }
    }
    Ok(())
}
