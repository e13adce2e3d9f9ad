//! Conversion of raw snapshot blocks into atom records.
//!
//! Every line of a block carries at least three whitespace-separated fields:
//!
//! | field | content                                         |
//! |-------|-------------------------------------------------|
//! | 0     | atomic number (or element symbol)               |
//! | 1     | position component(s), comma-separated          |
//! | 2     | momentum component(s), comma-separated          |
//!
//! Two layouts are accepted. In the *component* layout, which is what trajectory logs
//! contain, each line holds a single scalar per column and an atom spans three
//! consecutive lines (x, y, z); the atomic number is taken from the first line of each
//! group. In the *composite* layout each token already holds `x,y,z` and every line is
//! one atom. A block must use one layout throughout.

use crate::core::io::scanner::RawSnapshot;
use crate::core::models::atom::AtomRecord;
use crate::core::utils::elements;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of scalar components of a position or momentum vector.
pub const VECTOR_COMPONENTS: usize = 3;
/// Minimum number of whitespace-separated fields on a snapshot line.
pub const MIN_FIELDS: usize = 3;

#[derive(Debug, Error)]
#[error("Malformed snapshot {index} ({line_count} raw lines): {kind}")]
pub struct BuildError {
    pub index: u64,
    pub line_count: usize,
    pub kind: BuildErrorKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum BuildErrorKind {
    #[error("line {line} has {found} fields, expected at least 3")]
    TooFewFields { line: usize, found: usize },

    #[error("line {line}: {column} token '{token}' has {found} components, expected 1 or 3")]
    InvalidTokenArity {
        line: usize,
        column: &'static str,
        token: String,
        found: usize,
    },

    #[error(
        "line {line}: {column} token has {found} components but the block layout uses {expected}"
    )]
    MixedLayout {
        line: usize,
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{line_count} lines do not group into whole atoms of {lines_per_atom} lines each")]
    IncompleteAtom {
        line_count: usize,
        lines_per_atom: usize,
    },

    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidFloat {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: '{value}' is neither an atomic number (0-255) nor an element symbol")]
    InvalidAtomicNumber { line: usize, value: String },
}

/// Line layout of a snapshot block, resolved from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLayout {
    /// One scalar per column per line, three lines per atom.
    Component,
    /// `x,y,z` per column per line, one line per atom.
    Composite,
}

impl BlockLayout {
    fn from_arity(components: usize) -> Option<Self> {
        match components {
            1 => Some(BlockLayout::Component),
            VECTOR_COMPONENTS => Some(BlockLayout::Composite),
            _ => None,
        }
    }

    pub fn components_per_token(self) -> usize {
        match self {
            BlockLayout::Component => 1,
            BlockLayout::Composite => VECTOR_COMPONENTS,
        }
    }

    pub fn lines_per_atom(self) -> usize {
        VECTOR_COMPONENTS / self.components_per_token()
    }
}

/// Stateless converter from [`RawSnapshot`] blocks to [`AtomRecord`]s.
pub struct SnapshotRecordBuilder;

impl SnapshotRecordBuilder {
    /// Builds the atom records of one snapshot, in the order atoms appear in the block.
    ///
    /// An empty block yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] carrying the snapshot index and raw line count if any
    /// line is malformed or the block does not divide into whole atoms. Atoms are
    /// never dropped or truncated.
    pub fn build(snapshot: &RawSnapshot) -> Result<Vec<AtomRecord>, BuildError> {
        let fail = |kind| BuildError {
            index: snapshot.index,
            line_count: snapshot.lines.len(),
            kind,
        };

        let line_count = snapshot.lines.len();
        let mut identifiers: Vec<(usize, &str)> = Vec::with_capacity(line_count);
        let mut positions: Vec<f64> = Vec::with_capacity(line_count * VECTOR_COMPONENTS);
        let mut momenta: Vec<f64> = Vec::with_capacity(line_count * VECTOR_COMPONENTS);
        let mut layout: Option<BlockLayout> = None;

        for (offset, line) in snapshot.lines.iter().enumerate() {
            let line_num = snapshot.first_line + offset;
            let mut fields = line.split_whitespace();
            let (Some(id), Some(pos), Some(mom)) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(fail(BuildErrorKind::TooFewFields {
                    line: line_num,
                    found: line.split_whitespace().count(),
                }));
            };

            for (column, token, target) in [
                ("pos", pos, &mut positions),
                ("momentum", mom, &mut momenta),
            ] {
                let found = token.split(',').count();
                let Some(token_layout) = BlockLayout::from_arity(found) else {
                    return Err(fail(BuildErrorKind::InvalidTokenArity {
                        line: line_num,
                        column,
                        token: token.to_string(),
                        found,
                    }));
                };
                match layout {
                    None => layout = Some(token_layout),
                    Some(expected) if expected != token_layout => {
                        return Err(fail(BuildErrorKind::MixedLayout {
                            line: line_num,
                            column,
                            expected: expected.components_per_token(),
                            found,
                        }));
                    }
                    Some(_) => {}
                }
                push_components(token, column, line_num, target).map_err(fail)?;
            }

            identifiers.push((line_num, id));
        }

        let Some(layout) = layout else {
            return Ok(Vec::new());
        };

        let lines_per_atom = layout.lines_per_atom();
        if line_count % lines_per_atom != 0 {
            return Err(fail(BuildErrorKind::IncompleteAtom {
                line_count,
                lines_per_atom,
            }));
        }

        let mut mismatched_atoms = 0usize;
        let mut first_mismatch: Option<usize> = None;
        let records = identifiers
            .chunks_exact(lines_per_atom)
            .zip(positions.chunks_exact(VECTOR_COMPONENTS))
            .zip(momenta.chunks_exact(VECTOR_COMPONENTS))
            .map(|((group, pos), mom)| -> Result<AtomRecord, BuildError> {
                let (line, token) = group[0];
                if let Some(&(other_line, other)) = group[1..].iter().find(|(_, t)| *t != token) {
                    debug!(
                        "Snapshot {}: identifier '{}' on line {} differs from '{}' on line {}; keeping the first.",
                        snapshot.index, other, other_line, token, line
                    );
                    mismatched_atoms += 1;
                    first_mismatch.get_or_insert(other_line);
                }
                let atomic_number = parse_atomic_number(token).ok_or_else(|| {
                    fail(BuildErrorKind::InvalidAtomicNumber {
                        line,
                        value: token.to_string(),
                    })
                })?;
                Ok(AtomRecord::from_arrays(
                    atomic_number,
                    [pos[0], pos[1], pos[2]],
                    [mom[0], mom[1], mom[2]],
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(line) = first_mismatch {
            warn!(
                "Snapshot {}: {} atom(s) carry differing identifiers within their line group (first at line {}); the first line's identifier was kept.",
                snapshot.index, mismatched_atoms, line
            );
        }
        Ok(records)
    }
}

fn push_components(
    token: &str,
    column: &'static str,
    line: usize,
    target: &mut Vec<f64>,
) -> Result<(), BuildErrorKind> {
    for component in token.split(',') {
        let value = component.parse().map_err(|_| BuildErrorKind::InvalidFloat {
            line,
            column,
            value: component.to_string(),
        })?;
        target.push(value);
    }
    Ok(())
}

/// Parses an identifier token as a decimal atomic number or an element symbol.
pub fn parse_atomic_number(token: &str) -> Option<u8> {
    token
        .parse::<u8>()
        .ok()
        .or_else(|| elements::atomic_number(token))
}
