use std::collections::{BTreeMap, HashMap};
use std::ops::Sub;

/// 3D coordinate vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Coordinate) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length of the vector
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or None for a zero-length vector
    pub fn normalized(&self) -> Option<Coordinate> {
        let norm = self.norm();
        if norm == 0.0 {
            return None;
        }
        Some(Coordinate::new(self.x / norm, self.y / norm, self.z / norm))
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Role of a declared particle, taken from the `name` attribute of its header line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleRole {
    Real,
    Virtual,
    /// Any other code is kept as-is; only Real and Virtual take part in the analysis
    Other(i64),
}

impl ParticleRole {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ParticleRole::Real,
            1 => ParticleRole::Virtual,
            other => ParticleRole::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ParticleRole::Real => 0,
            ParticleRole::Virtual => 1,
            ParticleRole::Other(code) => *code,
        }
    }
}

/// Identifier -> role mapping for every particle declared in a structure block.
///
/// Built once per file through `FromIterator`; there is no mutation API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMap {
    roles: BTreeMap<usize, ParticleRole>,
}

impl RoleMap {
    /// Number of declared particles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn role(&self, id: usize) -> Option<ParticleRole> {
        self.roles.get(&id).copied()
    }

    /// Identifiers carrying `role`, in ascending order
    pub fn ids_with_role(&self, role: ParticleRole) -> Vec<usize> {
        self.roles
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether a position record with this identifier belongs to the declared particles.
    ///
    /// Records at or beyond the declared particle count are bookkeeping entries.
    pub fn accepts(&self, id: usize) -> bool {
        id < self.roles.len()
    }
}

impl FromIterator<(usize, ParticleRole)> for RoleMap {
    fn from_iter<I: IntoIterator<Item = (usize, ParticleRole)>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

/// Frame data: maps particle identifier to its coordinate in one frame
pub type FramePositions = HashMap<usize, Coordinate>;
