//! Dipole alignment order parameter of a trimer.
//!
//! For each real particle `i` with unit dipole `m_i` (real site -> virtual site), and the
//! unit vectors `rhat` towards the two other real particles:
//!
//! ```text
//! A_i = (|m_i . rhat_j1| + |m_i . rhat_j2|) / 2
//! S   = (A_0 + A_1 + A_2) / 3
//! ```
//!
//! S lies in [0, 1]. Frames with a zero-length dipole or two coincident real particles
//! have no defined S.

use crate::error::{AnalysisError, Result};
use crate::structure::{Coordinate, FramePositions, ParticleRole, RoleMap};

/// Real and virtual identifiers of a trimer, paired by sorted position.
///
/// The i-th smallest real identifier owns the dipole ending at the i-th smallest
/// virtual identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimerPairing {
    real: [usize; 3],
    dipole: [usize; 3],
}

impl TrimerPairing {
    pub fn new(mut real: [usize; 3], mut dipole: [usize; 3]) -> Self {
        real.sort_unstable();
        dipole.sort_unstable();
        Self { real, dipole }
    }

    /// Pair the real and virtual particles declared in `roles`.
    ///
    /// Fails unless exactly three of each are declared.
    pub fn from_role_map(roles: &RoleMap) -> Result<Self> {
        let real = roles.ids_with_role(ParticleRole::Real);
        let dipole = roles.ids_with_role(ParticleRole::Virtual);

        match (<[usize; 3]>::try_from(real.as_slice()), <[usize; 3]>::try_from(dipole.as_slice())) {
            (Ok(real), Ok(dipole)) => Ok(Self::new(real, dipole)),
            _ => Err(AnalysisError::Pairing {
                real: real.len(),
                virtual_sites: dipole.len(),
            }),
        }
    }

    pub fn real_ids(&self) -> [usize; 3] {
        self.real
    }

    pub fn virtual_ids(&self) -> [usize; 3] {
        self.dipole
    }

    /// (real, virtual) identifier pairs in pairing order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.real.iter().copied().zip(self.dipole.iter().copied())
    }
}

/// Order parameter of one frame, or None when the frame is degenerate.
///
/// A frame lacking any of the six paired positions is also treated as undefined.
pub fn compute_s_frame(positions: &FramePositions, pairing: &TrimerPairing) -> Option<f64> {
    let mut real = [Coordinate::new(0.0, 0.0, 0.0); 3];
    let mut dipoles = [Coordinate::new(0.0, 0.0, 0.0); 3];

    for (i, (real_id, virtual_id)) in pairing.pairs().enumerate() {
        let real_pos = *positions.get(&real_id)?;
        let virtual_pos = *positions.get(&virtual_id)?;
        real[i] = real_pos;
        dipoles[i] = (virtual_pos - real_pos).normalized()?;
    }

    let mut total = 0.0;
    for i in 0..3 {
        let mut alignment = 0.0;
        for j in (0..3).filter(|&j| j != i) {
            let rhat = (real[j] - real[i]).normalized()?;
            alignment += dipoles[i].dot(&rhat).abs();
        }
        total += alignment / 2.0;
    }

    let s = total / 3.0;
    s.is_finite().then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h() -> f64 {
        3f64.sqrt() / 2.0
    }

    /// Equilateral triangle in the xy-plane
    fn triangle() -> [Coordinate; 3] {
        [
            Coordinate::new(0.0, 0.0, 0.0),
            Coordinate::new(1.0, 0.0, 0.0),
            Coordinate::new(0.5, h(), 0.0),
        ]
    }

    fn frame(real: [Coordinate; 3], dipoles: [Coordinate; 3]) -> FramePositions {
        let mut positions = FramePositions::new();
        for i in 0..3 {
            positions.insert(i, real[i]);
            let d = dipoles[i];
            positions.insert(
                i + 3,
                Coordinate::new(real[i].x + d.x, real[i].y + d.y, real[i].z + d.z),
            );
        }
        positions
    }

    fn pairing() -> TrimerPairing {
        TrimerPairing::new([0, 1, 2], [3, 4, 5])
    }

    #[test]
    fn test_perpendicular_dipoles_give_zero() {
        let z = Coordinate::new(0.0, 0.0, 0.3);
        let s = compute_s_frame(&frame(triangle(), [z, z, z]), &pairing()).unwrap();
        assert!(s.abs() < 1e-12);
    }

    #[test]
    fn test_radial_dipoles() {
        let real = triangle();
        let centroid = Coordinate::new(0.5, h() / 3.0, 0.0);
        let dipoles = real.map(|r| r - centroid);
        let s = compute_s_frame(&frame(real, dipoles), &pairing()).unwrap();
        assert!((s - h()).abs() < 1e-12);
    }

    #[test]
    fn test_dipoles_along_edges() {
        let real = triangle();
        let dipoles = [real[1] - real[0], real[2] - real[1], real[0] - real[2]];
        let s = compute_s_frame(&frame(real, dipoles), &pairing()).unwrap();
        assert!((s - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_polarity_does_not_matter() {
        let real = triangle();
        let forward = [real[1] - real[0], real[2] - real[1], real[0] - real[2]];
        let backward = forward.map(|d| Coordinate::new(-d.x, -d.y, -d.z));
        let a = compute_s_frame(&frame(real, forward), &pairing()).unwrap();
        let b = compute_s_frame(&frame(real, backward), &pairing()).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_pairing_follows_sorted_identifiers() {
        let real = triangle();
        let z = Coordinate::new(0.0, 0.0, 0.3);
        let positions = frame(real, [z, Coordinate::new(-0.3, 0.0, 0.0), z]);
        let s = compute_s_frame(&positions, &pairing()).unwrap();
        assert!((s - 0.25).abs() < 1e-12);

        // Identifiers handed over out of order still pair 0-3, 1-4, 2-5.
        let shuffled = TrimerPairing::new([2, 0, 1], [5, 3, 4]);
        assert_eq!(shuffled, pairing());
        assert!((compute_s_frame(&positions, &shuffled).unwrap() - 0.25).abs() < 1e-12);

        // Swapping which virtual site sits next to which real particle changes S.
        let mut swapped = positions.clone();
        let v3 = positions[&3];
        swapped.insert(3, positions[&4]);
        swapped.insert(4, v3);
        let other = compute_s_frame(&swapped, &pairing()).unwrap();
        assert!((other - 0.25).abs() > 0.1);
    }

    #[test]
    fn test_zero_dipole_is_undefined() {
        let z = Coordinate::new(0.0, 0.0, 0.3);
        let zero = Coordinate::new(0.0, 0.0, 0.0);
        assert!(compute_s_frame(&frame(triangle(), [z, zero, z]), &pairing()).is_none());
    }

    #[test]
    fn test_coincident_real_particles_are_undefined() {
        let mut real = triangle();
        real[2] = real[0];
        let z = Coordinate::new(0.0, 0.0, 0.3);
        assert!(compute_s_frame(&frame(real, [z, z, z]), &pairing()).is_none());
    }

    #[test]
    fn test_missing_position_is_undefined() {
        let z = Coordinate::new(0.0, 0.0, 0.3);
        let mut positions = frame(triangle(), [z, z, z]);
        positions.remove(&5);
        assert!(compute_s_frame(&positions, &pairing()).is_none());
    }

    #[test]
    fn test_non_finite_result_is_discarded() {
        let z = Coordinate::new(0.0, 0.0, 0.3);
        let mut positions = frame(triangle(), [z, z, z]);
        positions.insert(1, Coordinate::new(f64::NAN, 0.0, 0.0));
        assert!(compute_s_frame(&positions, &pairing()).is_none());
    }

    #[test]
    fn test_s_bounded_for_arbitrary_geometry() {
        // Small LCG so the geometries are deterministic.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) * 4.0 - 2.0
        };

        for _ in 0..500 {
            let mut positions = FramePositions::new();
            for id in 0..6 {
                positions.insert(id, Coordinate::new(next(), next(), next()));
            }
            if let Some(s) = compute_s_frame(&positions, &pairing()) {
                assert!((0.0..=1.0 + 1e-12).contains(&s), "S out of range: {}", s);
            }
        }
    }

    #[test]
    fn test_pairing_requires_three_of_each() {
        let roles: RoleMap = vec![
            (0, ParticleRole::Real),
            (1, ParticleRole::Real),
            (2, ParticleRole::Virtual),
            (3, ParticleRole::Virtual),
            (4, ParticleRole::Virtual),
        ]
        .into_iter()
        .collect();
        match TrimerPairing::from_role_map(&roles) {
            Err(AnalysisError::Pairing { real, virtual_sites }) => {
                assert_eq!(real, 2);
                assert_eq!(virtual_sites, 3);
            }
            other => panic!("expected pairing error, got {:?}", other),
        }
    }

    #[test]
    fn test_pairing_from_role_map_ignores_other_roles() {
        let roles: RoleMap = vec![
            (5, ParticleRole::Virtual),
            (0, ParticleRole::Real),
            (4, ParticleRole::Virtual),
            (6, ParticleRole::Other(2)),
            (2, ParticleRole::Real),
            (3, ParticleRole::Virtual),
            (1, ParticleRole::Real),
        ]
        .into_iter()
        .collect();
        let pairing = TrimerPairing::from_role_map(&roles).unwrap();
        assert_eq!(pairing.real_ids(), [0, 1, 2]);
        assert_eq!(pairing.virtual_ids(), [3, 4, 5]);
        assert_eq!(pairing.pairs().collect::<Vec<_>>(), vec![(0, 3), (1, 4), (2, 5)]);
    }
}
