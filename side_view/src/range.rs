//! Vertical axis range of a side view chart.

use crate::levels::is_valid_level;
use crate::profile::Profile;

/// Widens `min`/`max` to include the valid entries of `values`.
///
/// `NaN` entries and entries equal to `no_data` are ignored. A `NaN`
/// bound is treated as unset. Without any valid value the bounds are left
/// as they are.
pub fn update_min_max_from_values(values: &[f64], no_data: Option<f64>, min: &mut f64, max: &mut f64) {
    let mut valid = values.iter().copied().filter(|v| is_valid_level(*v, no_data));
    let Some(first) = valid.next() else {
        return;
    };
    let (lo, hi) = valid.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    *min = if min.is_nan() { lo } else { min.min(lo) };
    *max = if max.is_nan() { hi } else { max.max(hi) };
}

/// Pads a degenerate range so the chart still has some height.
pub fn ensure_vertical_resolution(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }
    let mut pad = (min * 0.1).abs();
    if pad == 0.0 {
        pad = 5.0;
    }
    (min - pad, max + pad)
}

/// Combined value range of several profiles, padded for display.
pub fn profiles_range<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> Option<(f64, f64)> {
    let mut min = f64::NAN;
    let mut max = f64::NAN;
    for p in profiles {
        update_min_max_from_values(&p.values, p.no_data_value, &mut min, &mut max);
    }
    if min.is_nan() || max.is_nan() {
        return None;
    }
    Some(ensure_vertical_resolution(min, max))
}
