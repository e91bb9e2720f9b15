use serde::{Deserialize, Serialize};

/// A timed span of the soundtrack, e.g. a musical section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub loudness: Option<f64>,
    #[serde(default)]
    pub tempo: Option<f64>,
}

impl Section {
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            loudness: None,
            tempo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Beat {
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            confidence: None,
        }
    }
}

/// Audio analysis document. Unrecognised fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub beats: Vec<Beat>,
}

impl AudioAnalysis {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
