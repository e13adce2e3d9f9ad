use nalgebra::{Point3, Vector3};

/// The state of a single atom at a single instant of a simulation.
///
/// One `AtomRecord` becomes one row of a snapshot table. Values are stored exactly
/// as parsed; no physical plausibility checks are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    /// The atomic number (or the per-line identifier the source carries in its place).
    pub atomic_number: u8,
    /// The Cartesian position of the atom.
    pub position: Point3<f64>,
    /// The momentum vector `(px, py, pz)` of the atom.
    pub momentum: Vector3<f64>,
}

impl AtomRecord {
    /// Creates a new `AtomRecord`.
    ///
    /// # Arguments
    ///
    /// * `atomic_number` - The atomic number of the atom.
    /// * `position` - The Cartesian position.
    /// * `momentum` - The momentum vector.
    pub fn new(atomic_number: u8, position: Point3<f64>, momentum: Vector3<f64>) -> Self {
        Self {
            atomic_number,
            position,
            momentum,
        }
    }

    /// Creates an `AtomRecord` from plain `[x, y, z]` arrays.
    pub fn from_arrays(atomic_number: u8, position: [f64; 3], momentum: [f64; 3]) -> Self {
        Self::new(
            atomic_number,
            Point3::from(position),
            Vector3::from(momentum),
        )
    }

    /// Returns the position as a plain `[x, y, z]` array.
    pub fn position_array(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }

    /// Returns the momentum as a plain `[px, py, pz]` array.
    pub fn momentum_array(&self) -> [f64; 3] {
        [self.momentum.x, self.momentum.y, self.momentum.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arrays_populates_all_components() {
        let record = AtomRecord::from_arrays(8, [1.0, 2.0, 3.0], [-0.5, 0.0, 0.25]);

        assert_eq!(record.atomic_number, 8);
        assert_eq!(record.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(record.momentum, Vector3::new(-0.5, 0.0, 0.25));
    }

    #[test]
    fn array_accessors_round_trip_components() {
        let record = AtomRecord::from_arrays(1, [0.1, 0.2, 0.3], [4.0, 5.0, 6.0]);

        assert_eq!(record.position_array(), [0.1, 0.2, 0.3]);
        assert_eq!(record.momentum_array(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn atom_record_equality_and_copy_works() {
        let record1 = AtomRecord::from_arrays(6, [1.0, 1.0, 1.0], [0.0, 0.0, 0.0]);
        let record2 = record1;
        assert_eq!(record1, record2);
    }
}
