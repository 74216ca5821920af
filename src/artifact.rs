use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::engine::EngineDump;
use crate::error::{Error, Result};

/// Transportable form of a trained model.
///
/// Plain data, safe for JSON and other text-oriented transports: the
/// engine's serialized model bytes are base64-encoded and all metadata
/// keys are plain strings. Produced by export, consumed by compile; the
/// round trip must yield a model with identical predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Base64-encoded engine model blob
    pub model: String,
    /// Scalar metadata fields attached by the engine on export
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ModelArtifact {
    /// Transport-encode an engine dump.
    pub fn from_dump(dump: EngineDump) -> Self {
        Self {
            model: BASE64.encode(&dump.model),
            metadata: dump.metadata,
        }
    }

    /// Reverse the transport encoding back into an engine dump.
    ///
    /// Fails with [`Error::MalformedArtifact`] if the model field is not
    /// valid base64. Metadata keys are handed to the engine as-is; vetting
    /// them against the engine's known set happens at compile time.
    pub fn to_dump(&self) -> Result<EngineDump> {
        let model = BASE64
            .decode(&self.model)
            .map_err(|e| Error::MalformedArtifact(format!("invalid base64 model data: {}", e)))?;
        Ok(EngineDump {
            model,
            metadata: self.metadata.clone(),
        })
    }
}
