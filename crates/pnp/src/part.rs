use std::fmt::{Display, Formatter};

use derivative::Derivative;

use crate::package::Package;

#[derive(Debug, Clone)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl Display for PartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Part {
    pub id: PartId,
    pub package: Package,
    /// Body height, mm. Used to compute the place depth, must be positive.
    pub height: f64,
    /// Bottom vision settings, `None` falls back to the machine-wide defaults.
    #[serde(default)]
    pub alignment: Option<AlignmentSettings>,
}

impl Part {
    pub fn new(id: PartId, package: Package, height: f64) -> Self {
        Self {
            id,
            package,
            height,
            alignment: None,
        }
    }

    pub fn with_alignment(mut self, alignment: AlignmentSettings) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

#[cfg(feature = "testing")]
impl Default for Part {
    fn default() -> Self {
        Self {
            id: PartId::from("DEFAULT_PART"),
            package: Package::default(),
            height: 1.0,
            alignment: Some(AlignmentSettings::default()),
        }
    }
}

/// Controls whether a part is rotated to its placement angle before the vision measurement is taken.
#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PreRotateUsage {
    /// Use the machine-wide setting
    #[derivative(Default)]
    Default,
    AlwaysOn,
    AlwaysOff,
}

impl PreRotateUsage {
    pub fn resolve(&self, machine_default: bool) -> bool {
        match self {
            PreRotateUsage::Default => machine_default,
            PreRotateUsage::AlwaysOn => true,
            PreRotateUsage::AlwaysOff => false,
        }
    }
}

/// How far a part may be rotated on the nozzle after picking.
#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum MaxRotation {
    /// Vision can only tell the angle of a body modulo 90 degrees, parts are assumed to be picked within +/-45 degrees.
    #[derivative(Default)]
    Adjust,
    /// Any angle, corrections never turn more than 180 degrees in one direction.
    Full,
}

impl MaxRotation {
    pub fn limit(&self) -> f64 {
        match self {
            MaxRotation::Adjust => 45.0,
            MaxRotation::Full => 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct AlignmentSettings {
    pub enabled: bool,
    #[serde(default)]
    pub pre_rotate: PreRotateUsage,
    #[serde(default)]
    pub max_rotation: MaxRotation,
    pub max_vision_passes: u32,
    /// mm
    pub max_linear_offset: f64,
    /// degrees
    pub max_angular_offset: f64,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            pre_rotate: PreRotateUsage::Default,
            max_rotation: MaxRotation::Adjust,
            max_vision_passes: 3,
            max_linear_offset: 0.01,
            max_angular_offset: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(PreRotateUsage::Default, false, false)]
    #[case(PreRotateUsage::Default, true, true)]
    #[case(PreRotateUsage::AlwaysOn, false, true)]
    #[case(PreRotateUsage::AlwaysOff, true, false)]
    fn pre_rotate_resolution(#[case] usage: PreRotateUsage, #[case] machine_default: bool, #[case] expected: bool) {
        // expect
        assert_eq!(usage.resolve(machine_default), expected);
    }

    #[test]
    fn part_without_alignment_deserializes() {
        // given
        let json = r#"{"id": "R_0402_10K", "package": {"name": "0402", "body_width": 0.5, "body_length": 1.0}, "height": 0.35}"#;

        // when
        let part: Part = serde_json::from_str(json).unwrap();

        // then
        assert_eq!(part.id, PartId::from("R_0402_10K"));
        assert_eq!(part.alignment, None);
    }
}
