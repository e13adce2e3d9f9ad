use nalgebra::Point3;

/// Euclidean distance between two points.
pub fn pair_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Angle (radians) between sides `adj_1` and `adj_2` of a triangle, i.e. the angle
/// opposite side `opp`.
///
/// The cosine is clamped to `[-1, 1]` so collinear points yield `0` or `π` instead of
/// `NaN`. A zero-length adjacent side still yields `NaN`.
pub fn law_of_cosines(adj_1: f64, adj_2: f64, opp: f64) -> f64 {
    let cos = (adj_1 * adj_1 + adj_2 * adj_2 - opp * opp) / (2.0 * adj_1 * adj_2);
    cos.clamp(-1.0, 1.0).acos()
}

/// The distance between two positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub atom_i: Point3<f64>,
    pub atom_j: Point3<f64>,
    pub distance: f64,
}

impl Pair {
    pub fn new(atom_i: Point3<f64>, atom_j: Point3<f64>) -> Self {
        Self {
            atom_i,
            atom_j,
            distance: pair_distance(&atom_i, &atom_j),
        }
    }
}

/// All pair distances and interior angles of three positions `a`, `b` and `c`.
///
/// Angles are in radians and lie in `[0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triple {
    pub pair_ab: Pair,
    pub pair_ac: Pair,
    pub pair_bc: Pair,
    /// Angle with `a` at the vertex (opposite side `bc`).
    pub angle_at_a: f64,
    /// Angle with `b` at the vertex (opposite side `ac`).
    pub angle_at_b: f64,
    /// Angle with `c` at the vertex (opposite side `ab`).
    pub angle_at_c: f64,
}

impl Triple {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        let pair_ab = Pair::new(a, b);
        let pair_ac = Pair::new(a, c);
        let pair_bc = Pair::new(b, c);
        let (ab, ac, bc) = (pair_ab.distance, pair_ac.distance, pair_bc.distance);

        Self {
            pair_ab,
            pair_ac,
            pair_bc,
            angle_at_a: law_of_cosines(ab, ac, bc),
            angle_at_b: law_of_cosines(ab, bc, ac),
            angle_at_c: law_of_cosines(ac, bc, ab),
        }
    }
}
