use crate::core::io::traits::TextFormat;
use crate::core::models::trajectory::SimulationParameters;
use std::io::{self, BufRead};
use thiserror::Error;

/// Zero-based index of the line holding the box dimensions.
pub const BOX_LINE_INDEX: usize = 1;
/// Zero-based field positions of `box_x`, `box_y` and `box_z` on that line.
pub const BOX_FIELD_POSITIONS: [usize; 3] = [3, 4, 5];

#[derive(Debug, Error)]
pub enum BoxParamsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Box parameter file ends before line {line}")]
    MissingLine { line: usize },
    #[error("Box line has {found} fields, field {position} is required")]
    MissingField { position: usize, found: usize },
    #[error("Invalid float in field {position} (value: '{value}')")]
    InvalidFloat { position: usize, value: String },
}

/// Reader for the companion file holding the simulation box size.
///
/// Only the second line is interpreted; fields 3, 4 and 5 (zero-based) are the box
/// edge lengths. Every other line is ignored.
pub struct BoxParamsFile;

impl TextFormat for BoxParamsFile {
    type Output = SimulationParameters;
    type Error = BoxParamsError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let line = match reader.lines().nth(BOX_LINE_INDEX) {
            Some(line) => line?,
            None => {
                return Err(BoxParamsError::MissingLine {
                    line: BOX_LINE_INDEX + 1,
                });
            }
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let mut dims = [0.0f64; 3];
        for (dim, &position) in dims.iter_mut().zip(BOX_FIELD_POSITIONS.iter()) {
            let value = fields.get(position).ok_or(BoxParamsError::MissingField {
                position,
                found: fields.len(),
            })?;
            *dim = value.parse().map_err(|_| BoxParamsError::InvalidFloat {
                position,
                value: value.to_string(),
            })?;
        }

        Ok(SimulationParameters::new(dims[0], dims[1], dims[2]))
    }
}
