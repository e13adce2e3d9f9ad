use crate::core::io::traits::TextFormat;
use crate::core::utils::elements::{self, Element};
use crate::core::utils::geometry::{Pair, Triple};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing atom count line")]
    MissingAtomCount,
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Header declares {expected} atoms but {found} were read")]
    AtomCountMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Expected 'symbol x y z', found {0} fields")]
    TooFewFields(usize),
    #[error("Invalid float in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
}

/// One atom of an `.xyz` geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub symbol: String,
    pub position: Point3<f64>,
}

impl XyzAtom {
    /// Resolves the atom's symbol against the static element table.
    pub fn element(&self) -> Option<&'static Element> {
        elements::by_symbol(&self.symbol)
    }
}

/// A parsed `.xyz` file: an optional comment line and the atoms in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XyzFrame {
    pub header: Option<String>,
    pub atoms: Vec<XyzAtom>,
}

impl XyzFrame {
    /// Distance between atoms `i` and `j`, or `None` if either index is out of range.
    pub fn pair(&self, i: usize, j: usize) -> Option<Pair> {
        Some(Pair::new(
            self.atoms.get(i)?.position,
            self.atoms.get(j)?.position,
        ))
    }

    /// Distances and angles of atoms `a`, `b` and `c`.
    pub fn triple(&self, a: usize, b: usize, c: usize) -> Option<Triple> {
        Some(Triple::new(
            self.atoms.get(a)?.position,
            self.atoms.get(b)?.position,
            self.atoms.get(c)?.position,
        ))
    }

    /// Sum of the atomic weights of all atoms with a known element symbol.
    pub fn total_weight(&self) -> f64 {
        self.atoms
            .iter()
            .filter_map(|a| a.element())
            .map(|e| e.weight)
            .sum()
    }
}

/// Reader for the plain `.xyz` geometry format.
///
/// Line 1 holds the atom count, line 2 a free-form comment, and every following
/// non-blank line `symbol x y z`.
pub struct XyzFile;

impl TextFormat for XyzFile {
    type Output = XyzFrame;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().ok_or(XyzError::MissingAtomCount)??;
        let expected: usize = count_line
            .trim()
            .parse()
            .map_err(|_| XyzError::InvalidAtomCount(count_line.trim().to_string()))?;

        let header = match lines.next().transpose()? {
            Some(line) if !line.trim().is_empty() => {
                info!("XYZ header: {}", line.trim());
                Some(line.trim().to_string())
            }
            _ => None,
        };

        let mut atoms = Vec::with_capacity(expected);
        for (offset, line_res) in lines.enumerate() {
            let line = line_res?;
            let line_num = offset + 3;
            if line.trim().is_empty() {
                continue;
            }

            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::TooFewFields(columns.len()),
                });
            }

            let mut coords = [0.0f64; 3];
            for (i, coord) in coords.iter_mut().enumerate() {
                let value = columns[i + 1];
                *coord = value.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidFloat {
                        column: i + 2,
                        value: value.to_string(),
                    },
                })?;
            }

            atoms.push(XyzAtom {
                symbol: columns[0].to_string(),
                position: Point3::from(coords),
            });
        }

        if atoms.len() != expected {
            return Err(XyzError::AtomCountMismatch {
                expected,
                found: atoms.len(),
            });
        }

        let frame = XyzFrame { header, atoms };
        let unknown = frame.atoms.iter().filter(|a| a.element().is_none()).count();
        if unknown > 0 {
            warn!("{} atom(s) have symbols missing from the element table.", unknown);
        }
        debug!(
            "Read {} atoms, total weight {:.4} g/mol.",
            frame.atoms.len(),
            frame.total_weight()
        );
        Ok(frame)
    }
}
