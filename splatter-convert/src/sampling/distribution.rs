//! Discrete face-area distribution.

use crate::error::ConvertError;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use splatter_data::Mesh;

/// Probability of picking each face, proportional to its area.
///
/// Built once per conversion run from the mesh's current face areas.
#[derive(Debug, Clone)]
pub struct FaceDistribution {
    index: WeightedIndex<f64>,
    probabilities: Vec<f64>,
}

impl FaceDistribution {
    /// Build the distribution from raw per-face areas.
    pub fn from_areas(areas: &[f64]) -> Result<Self, ConvertError> {
        let index = WeightedIndex::new(areas)?;
        let total: f64 = areas.iter().sum();
        let probabilities = areas.iter().map(|&a| a / total).collect();
        Ok(Self {
            index,
            probabilities,
        })
    }

    pub fn from_mesh(mesh: &Mesh) -> Result<Self, ConvertError> {
        Self::from_areas(mesh.face_areas())
    }

    /// Normalized selection probability per face.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Draw one face index.
    pub fn sample_face<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::distributions::WeightedError;
    use rand::rngs::StdRng;

    #[test]
    fn test_probabilities_sum_to_one() {
        let dist = FaceDistribution::from_areas(&[0.5, 1.5, 3.0, 0.0]).unwrap();
        let sum: f64 = dist.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((dist.probabilities()[2] - 0.6).abs() < 1e-12);
        assert_eq!(dist.probabilities().len(), 4);
    }

    #[test]
    fn test_zero_area_face_never_selected() {
        let dist = FaceDistribution::from_areas(&[1.0, 0.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            assert_ne!(dist.sample_face(&mut rng), 1);
        }
    }

    #[test]
    fn test_all_zero_areas_rejected() {
        let err = FaceDistribution::from_areas(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Distribution(WeightedError::AllWeightsZero)
        ));
    }

    #[test]
    fn test_empty_areas_rejected() {
        let err = FaceDistribution::from_areas(&[]).unwrap_err();
        assert!(matches!(err, ConvertError::Distribution(WeightedError::NoItem)));
    }

    #[test]
    fn test_selection_frequency_tracks_area() {
        let areas = [1.0, 2.0, 3.0, 4.0];
        let dist = FaceDistribution::from_areas(&areas).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 200_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            counts[dist.sample_face(&mut rng)] += 1;
        }

        // Chi-square with 3 degrees of freedom; 16.27 is the 0.999 quantile.
        let chi_square: f64 = counts
            .iter()
            .zip(dist.probabilities())
            .map(|(&observed, &p)| {
                let expected = p * draws as f64;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();
        assert!(chi_square < 16.27, "chi-square {chi_square} too large: {counts:?}");
    }
}
