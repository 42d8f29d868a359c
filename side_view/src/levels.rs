//! Post-processing of computed levels before they are shown along a route.

use log::debug;

use crate::error::ProfileError;
use crate::profile::Profile;

/// A level is usable when it is neither `NaN` nor the no-data marker.
pub fn is_valid_level(value: f64, no_data: Option<f64>) -> bool {
    !value.is_nan() && Some(value) != no_data
}

/// Replaces missing levels with the bed level at the same chainage.
///
/// Dry locations report no data; drawing them at the bed keeps the water
/// level line connected in the side view.
pub fn replace_no_data_with_bed_level(
    levels: &mut [f64],
    chainages: &[f64],
    no_data: Option<f64>,
    bed_level: &Profile,
) -> Result<usize, ProfileError> {
    if levels.len() != chainages.len() {
        return Err(ProfileError::LengthMismatch {
            chainages: chainages.len(),
            values: levels.len(),
        });
    }
    let mut replaced = 0;
    for (level, &chainage) in levels.iter_mut().zip(chainages) {
        if !is_valid_level(*level, no_data) {
            *level = bed_level.evaluate(chainage);
            replaced += 1;
        }
    }
    debug!("replaced {} of {} levels with bed level", replaced, levels.len());
    Ok(replaced)
}

/// Maximum over time per location; `NaN` where a location has no valid value.
pub fn max_over_time(series: &[Vec<f64>]) -> Vec<f64> {
    series
        .iter()
        .map(|s| {
            s.iter()
                .copied()
                .filter(|v| !v.is_nan())
                .reduce(f64::max)
                .unwrap_or(f64::NAN)
        })
        .collect()
}
