use serde::{Deserialize, Serialize};

use crate::densify::densify_with_offset;
use crate::error::ProfileError;

/// Name of the chainage argument of every profile.
pub const CHAINAGE_NAME: &str = "Chainage";

/// Quantity sampled along a route, e.g. bed level or water level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub unit: String,
    pub chainages: Vec<f64>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub no_data_value: Option<f64>,
}

impl Profile {
    /// Creates a profile from parallel chainage and value sequences.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        chainages: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, ProfileError> {
        if chainages.len() != values.len() {
            return Err(ProfileError::LengthMismatch {
                chainages: chainages.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            unit: unit.into(),
            chainages,
            values,
            no_data_value: None,
        })
    }

    pub fn len(&self) -> usize {
        self.chainages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chainages.is_empty()
    }

    /// Iterates over `(chainage, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.chainages.iter().copied().zip(self.values.iter().copied())
    }

    /// Checks that the profile can be shown in a side view.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::BlankName);
        }
        if self.name == CHAINAGE_NAME {
            return Err(ProfileError::ReservedName(self.name.clone()));
        }
        if self.chainages.len() != self.values.len() {
            return Err(ProfileError::LengthMismatch {
                chainages: self.chainages.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }

    /// Linearly interpolates the value at `chainage`.
    ///
    /// Values before the first and after the last point are held constant.
    /// An empty profile or a `NaN` chainage evaluates to `NaN`.
    pub fn evaluate(&self, chainage: f64) -> f64 {
        if chainage.is_nan() {
            return f64::NAN;
        }
        let (Some(&first), Some(&last)) = (self.chainages.first(), self.chainages.last()) else {
            return f64::NAN;
        };
        let first_value = self.values.first().copied().unwrap_or(f64::NAN);
        let last_value = self.values.last().copied().unwrap_or(f64::NAN);
        if chainage <= first {
            return first_value;
        }
        if chainage >= last {
            return last_value;
        }
        for (c, v) in self.chainages.windows(2).zip(self.values.windows(2)) {
            if chainage >= c[0] && chainage <= c[1] {
                let t = if (c[1] - c[0]).abs() < f64::EPSILON {
                    0.0
                } else {
                    (chainage - c[0]) / (c[1] - c[0])
                };
                return v[0] + t * (v[1] - v[0]);
            }
        }
        last_value
    }

    /// Returns a copy with extra points around the given structures.
    ///
    /// Structure chainages may be given in any order.
    pub fn with_structures(
        &self,
        structure_chainages: &[f64],
        offset: f64,
    ) -> Result<Self, ProfileError> {
        let mut ordered = structure_chainages.to_vec();
        ordered.sort_by(f64::total_cmp);
        let (chainages, values) = densify_with_offset(&self.chainages, &self.values, &ordered, offset)?;
        Ok(Self {
            chainages,
            values,
            ..self.clone()
        })
    }
}
