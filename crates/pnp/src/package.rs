/// Defines a component package (body style / case), used by vision to know what to look for.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Package {
    /// Library name (human-readable identifier, e.g. "QFN-48-1EP-7x7mm").
    pub name: String,
    /// mm
    pub body_width: f64,
    /// mm
    pub body_length: f64,
}

impl Package {
    pub fn new(name: String, body_width: f64, body_length: f64) -> Self {
        Self {
            name,
            body_width,
            body_length,
        }
    }

    /// Offset of a body corner from the body center when the part is at rotation 0.
    pub fn corner(&self) -> (f64, f64) {
        (self.body_length / 2.0, self.body_width / 2.0)
    }
}

#[cfg(feature = "testing")]
impl Default for Package {
    fn default() -> Self {
        Self {
            name: "Default Package".to_string(),
            body_width: 1.6,
            body_length: 0.8,
        }
    }
}

