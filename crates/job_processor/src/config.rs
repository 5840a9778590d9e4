use math::pose::Pose;
use pnp::part::{AlignmentSettings, Part};

/// Offsets measured after pre-rotation that are larger than this are known to be inaccurate.
pub const DEFAULT_PRE_ROTATE_OFFSET_LIMIT: f64 = 19.999;

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct JobProcessorConfig {
    pub retry: RetryConfig,
    pub alignment: AlignmentConfig,
    /// Where parts that failed alignment are dropped.
    pub discard_pose: Pose,
    /// Check the job against the machine setup when loading it.
    pub validate_on_load: bool,
}

impl Default for JobProcessorConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            alignment: AlignmentConfig::default(),
            discard_pose: Pose::ZERO,
            validate_on_load: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_pick_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_pick_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub enabled: bool,
    /// Machine-wide pre-rotate setting, parts can override it.
    pub pre_rotate: bool,
    /// mm
    pub pre_rotate_offset_limit: f64,
    /// Used for parts without their own settings.
    pub default_settings: Option<AlignmentSettings>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pre_rotate: false,
            pre_rotate_offset_limit: DEFAULT_PRE_ROTATE_OFFSET_LIMIT,
            default_settings: Some(AlignmentSettings::default()),
        }
    }
}

impl AlignmentConfig {
    pub fn settings_for<'a>(&'a self, part: &'a Part) -> Option<&'a AlignmentSettings> {
        part.alignment
            .as_ref()
            .or(self.default_settings.as_ref())
    }

    /// `false` when alignment is disabled for the machine, or for the part.
    pub fn is_enabled_for(&self, part: &Part) -> bool {
        self.enabled
            && self
                .settings_for(part)
                .is_some_and(|settings| settings.enabled)
    }
}
