/*!
 * Records streamed to the client during a translation job.
 *
 * Each event serialises to a JSON object with a `type` discriminator. A job
 * emits zero or more `progress` (and optionally `skipped`) events followed by
 * exactly one terminal event, `done` or `error`.
 */

use serde::{Deserialize, Serialize};

use crate::subtitle_processor::SubtitleBlock;

/// One streamed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslationEvent {
    /// A block was translated
    Progress {
        #[serde(rename = "number")]
        sequence_number: String,
        #[serde(rename = "timestamp")]
        timestamp_range: String,
        original_text: String,
        translated_text: String,
    },

    /// A block candidate did not parse and was left out
    Skipped {
        /// 0-based position among the blank-line separated candidates
        index: usize,
        raw: String,
    },

    /// The output file was written
    Done {
        #[serde(rename = "filename")]
        output_filename: String,
    },

    /// The job failed; nothing was written
    Error { message: String },
}

impl TranslationEvent {
    /// Progress event for a translated block
    pub fn progress(block: &SubtitleBlock, translated_text: &str) -> Self {
        Self::Progress {
            sequence_number: block.sequence_number.clone(),
            timestamp_range: block.timestamp_range.clone(),
            original_text: block.original_text.clone(),
            translated_text: translated_text.to_string(),
        }
    }

    /// Whether no further events may follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }

    /// Serialised single-line JSON form
    pub fn to_json(&self) -> String {
        // A derived Serialize over String fields cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Answer to a standalone retry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl RetryResponse {
    pub fn success(translated_text: impl Into<String>) -> Self {
        Self {
            success: true,
            translated_text: Some(translated_text.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            translated_text: None,
            message: Some(message.into()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
