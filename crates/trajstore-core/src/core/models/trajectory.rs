use super::atom::AtomRecord;
use nalgebra::Vector3;

/// Fixed parameters of a simulation run, written once per trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Box edge length along x.
    pub box_x: f64,
    /// Box edge length along y.
    pub box_y: f64,
    /// Box edge length along z.
    pub box_z: f64,
}

impl SimulationParameters {
    pub fn new(box_x: f64, box_y: f64, box_z: f64) -> Self {
        Self {
            box_x,
            box_y,
            box_z,
        }
    }

    /// Returns the box dimensions as a vector.
    pub fn box_dimensions(&self) -> Vector3<f64> {
        Vector3::new(self.box_x, self.box_y, self.box_z)
    }
}

/// An ordered set of atom records sharing one logical timestamp.
///
/// Indices are 1-based and assigned in stream order without gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub index: u64,
    pub atoms: Vec<AtomRecord>,
}

impl Snapshot {
    pub fn new(index: u64, atoms: Vec<AtomRecord>) -> Self {
        Self { index, atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}
