//! Submission document and its base64url transport encoding.

use std::collections::BTreeMap;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::mark::RawMark;
use crate::coords::CanvasConfig;
use crate::error::SubmissionError;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMeta {
    pub config: CanvasConfig,
}

/// A student sketch: canvas metadata plus marks keyed by tool id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub meta: SubmissionMeta,
    #[serde(default)]
    pub gradeable: BTreeMap<String, Vec<RawMark>>,
}

impl Submission {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            meta: SubmissionMeta { config },
            gradeable: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach marks to a tool.
    pub fn with_marks(mut self, tool_id: &str, marks: Vec<RawMark>) -> Self {
        self.gradeable
            .entry(tool_id.to_string())
            .or_default()
            .extend(marks);
        self
    }

    #[inline]
    pub fn config(&self) -> &CanvasConfig {
        &self.meta.config
    }

    /// Decode transport text. Accepts the url-safe and standard alphabets, with or
    /// without padding.
    pub fn decode(encoded: &str) -> Result<Self, SubmissionError> {
        let text = encoded.trim();
        let bytes = URL_SAFE_LENIENT
            .decode(text)
            .or_else(|_| STANDARD_LENIENT.decode(text))
            .map_err(|e| SubmissionError::Base64(e.to_string()))?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, SubmissionError> {
        serde_json::from_slice(bytes).map_err(|e| SubmissionError::Json(e.to_string()))
    }

    pub fn encode(&self) -> Result<String, SubmissionError> {
        let bytes = serde_json::to_vec(self).map_err(|e| SubmissionError::Json(e.to_string()))?;
        Ok(URL_SAFE.encode(bytes))
    }

    /// Marks of one tool; empty when the tool drew nothing.
    pub fn marks(&self, tool_id: &str) -> &[RawMark] {
        self.gradeable.get(tool_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The same sketch with graph x and y exchanged.
    ///
    /// A pixel `(px, py)` on a `w × h` canvas lands on `(h − py, w − px)` of the
    /// flipped `h × w` canvas.
    pub fn flipped(&self) -> Self {
        let w = self.meta.config.width as f64;
        let h = self.meta.config.height as f64;
        Self {
            meta: SubmissionMeta {
                config: self.meta.config.flipped(),
            },
            gradeable: self
                .gradeable
                .iter()
                .map(|(id, marks)| {
                    let flipped = marks
                        .iter()
                        .map(|m| m.map_points(|[px, py]| [h - py, w - px]))
                        .collect();
                    (id.clone(), flipped)
                })
                .collect(),
        }
    }

    /// The same sketch rendered at `k` times the pixel resolution.
    pub fn scaled(&self, k: u32) -> Self {
        let kf = k as f64;
        let mut config = self.meta.config;
        config.width *= k;
        config.height *= k;
        Self {
            meta: SubmissionMeta { config },
            gradeable: self
                .gradeable
                .iter()
                .map(|(id, marks)| {
                    let scaled = marks
                        .iter()
                        .map(|m| m.map_points(|[px, py]| [px * kf, py * kf]))
                        .collect();
                    (id.clone(), scaled)
                })
                .collect(),
        }
    }
}
