//! User settings for building side view profiles.

use serde::{Deserialize, Serialize};

use crate::densify::STRUCTURE_OFFSET;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideViewSettings {
    /// Distance between a structure and its synthetic profile points.
    pub structure_offset: f64,
    /// Marker for missing values in level files.
    pub no_data_value: Option<f64>,
    /// Unit assigned to profiles read from plain text.
    pub value_unit: String,
}

impl Default for SideViewSettings {
    fn default() -> Self {
        Self {
            structure_offset: STRUCTURE_OFFSET,
            no_data_value: None,
            value_unit: "m AD".to_string(),
        }
    }
}

pub fn read_settings_json(path: &str) -> std::io::Result<SideViewSettings> {
    let contents = crate::io::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let s: SideViewSettings = serde_json::from_str(r#"{"no_data_value": -999.0}"#).unwrap();
        assert_eq!(s.structure_offset, STRUCTURE_OFFSET);
        assert_eq!(s.no_data_value, Some(-999.0));
        assert_eq!(s.value_unit, "m AD");
    }
}
