//! Extra profile points around structures.
//!
//! Computed profiles are sampled on a grid that rarely coincides with the
//! structures along a route. Drawing a straight line between the two grid
//! points that surround a weir or pump hides the jump the structure causes,
//! so two synthetic points are inserted around every structure: one just
//! upstream carrying the last sample value before it, one just downstream
//! carrying the first sample value after it. Values are never interpolated.

use log::{debug, warn};

use crate::error::ProfileError;

/// Distance between a structure and its synthetic points (1 mm).
pub const STRUCTURE_OFFSET: f64 = 0.001;

/// Inserts two points around each structure chainage using [`STRUCTURE_OFFSET`].
///
/// `chainages` and `structure_chainages` are expected to be sorted
/// ascending. Unsorted input is tolerated but the output is then not
/// guaranteed to be monotonic.
pub fn densify(
    chainages: &[f64],
    values: &[f64],
    structure_chainages: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), ProfileError> {
    densify_with_offset(chainages, values, structure_chainages, STRUCTURE_OFFSET)
}

/// Same as [`densify`] with a caller supplied structure offset.
pub fn densify_with_offset(
    chainages: &[f64],
    values: &[f64],
    structure_chainages: &[f64],
    offset: f64,
) -> Result<(Vec<f64>, Vec<f64>), ProfileError> {
    if chainages.len() != values.len() {
        return Err(ProfileError::LengthMismatch {
            chainages: chainages.len(),
            values: values.len(),
        });
    }
    if !offset.is_finite() || offset <= 0.0 {
        return Err(ProfileError::InvalidOffset(offset));
    }
    if structure_chainages.is_empty() {
        return Ok((chainages.to_vec(), values.to_vec()));
    }
    if !is_non_decreasing(chainages) || !is_non_decreasing(structure_chainages) {
        warn!("densifying unsorted chainages, output may not be monotonic");
    }

    // A sample this close past a structure still counts as lying before it.
    let tolerance = 0.001 * offset;

    let mut out = Densified::with_capacity(chainages.len() + 2 * structure_chainages.len());
    let mut sample = 0;
    let mut structure = 0;

    while sample < chainages.len() && structure < structure_chainages.len() {
        if chainages[sample] < structure_chainages[structure] + tolerance {
            out.push(chainages[sample], values[sample]);
            sample += 1;
        } else {
            out.push_structure(chainages, values, structure_chainages, sample, structure, offset);
            structure += 1;
        }
    }
    for (&chainage, &value) in chainages[sample..].iter().zip(&values[sample..]) {
        out.push(chainage, value);
    }
    for s in structure..structure_chainages.len() {
        out.push_structure(chainages, values, structure_chainages, chainages.len(), s, offset);
    }

    debug!(
        "densified {} samples around {} structures into {} points",
        chainages.len(),
        structure_chainages.len(),
        out.chainages.len()
    );
    Ok((out.chainages, out.values))
}

fn is_non_decreasing(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[1] >= w[0] || w[0].is_nan() || w[1].is_nan())
}

struct Densified {
    chainages: Vec<f64>,
    values: Vec<f64>,
}

impl Densified {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            chainages: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, chainage: f64, value: f64) {
        self.chainages.push(chainage);
        self.values.push(value);
    }

    /// Emits the before and after points of `structures[structure]`.
    ///
    /// `sample` is the index of the first sample not yet emitted.
    fn push_structure(
        &mut self,
        chainages: &[f64],
        values: &[f64],
        structures: &[f64],
        sample: usize,
        structure: usize,
        offset: f64,
    ) {
        let at = structures[structure];

        let mut before = (at - offset).max(0.0);
        if let Some(&last) = self.chainages.last() {
            before = before.max(last);
        }

        let mut after = at + offset;
        if let Some(&next_sample) = chainages.get(sample) {
            after = after.min(next_sample);
        }
        if let Some(&next_structure) = structures.get(structure + 1) {
            after = after.min(next_structure - 0.5 * offset);
        }
        after = after.max(before);

        let before_value = sample
            .checked_sub(1)
            .and_then(|i| values.get(i))
            .or_else(|| values.first())
            .copied()
            .unwrap_or(f64::NAN);
        let after_value = values
            .get(sample)
            .or_else(|| values.last())
            .copied()
            .unwrap_or(f64::NAN);

        self.push(before, before_value);
        self.push(after, after_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = densify(&[0.0, 1.0], &[1.0], &[0.5]).unwrap_err();
        assert_eq!(err, ProfileError::LengthMismatch { chainages: 2, values: 1 });
    }

    #[test]
    fn rejects_non_positive_offset() {
        assert!(densify_with_offset(&[0.0], &[1.0], &[0.5], 0.0).is_err());
        assert!(densify_with_offset(&[0.0], &[1.0], &[0.5], f64::NAN).is_err());
    }

    #[test]
    fn sorted_check_ignores_ties() {
        assert!(is_non_decreasing(&[0.0, 1.0, 1.0, 2.0]));
        assert!(!is_non_decreasing(&[0.0, 2.0, 1.0]));
        assert!(is_non_decreasing(&[]));
    }

    #[test]
    fn sample_inside_tolerance_is_emitted_first() {
        let (c, v) = densify(&[0.0, 10.0000005, 20.0], &[1.0, 2.0, 3.0], &[10.0]).unwrap();
        assert_eq!(v, vec![1.0, 2.0, 2.0, 3.0, 3.0]);
        assert!((c[1] - 10.0000005).abs() < 1e-12);
        assert!((c[2] - 10.0000005).abs() < 1e-12);
    }

    #[test]
    fn unsorted_input_does_not_panic() {
        let (c, v) = densify(&[10.0, 0.0, 5.0], &[1.0, 2.0, 3.0], &[7.0, 2.0]).unwrap();
        assert_eq!(c.len(), 7);
        assert_eq!(v.len(), 7);
    }
}
