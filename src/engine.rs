use std::collections::BTreeMap;

use crate::encoder::EncodedSequence;
use crate::error::Result;
use crate::params::EngineParams;
use crate::token::LabelSequence;

/// Serialized model state as produced by an engine: the opaque byte blob
/// plus whatever scalar metadata the engine attaches on export.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDump {
    /// Engine's serialized model form
    pub model: Vec<u8>,
    /// Scalar metadata fields, keyed by the engine's own names
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// The wrapped training/compilation/prediction engine.
///
/// All four operations are potentially slow and blocking; they are the
/// sole source of real computation behind this layer. A `Handle` is
/// engine-owned trained or compiled state: created by [`Engine::train`] or
/// [`Engine::compile_model`], never mutated afterwards. Whether one handle
/// may be shared across threads is a property of the engine, not of this
/// layer.
pub trait Engine {
    /// Opaque reference to trained/compiled state
    type Handle;

    /// Estimate model parameters from encoded sequences and their labels.
    fn train(
        &self,
        x: &[EncodedSequence],
        y: &[LabelSequence],
        params: &EngineParams,
    ) -> Result<Self::Handle>;

    /// Serialize handle state into a transportable dump.
    fn export_model(&self, handle: &Self::Handle) -> Result<EngineDump>;

    /// Materialize a handle from a dump produced by [`Engine::export_model`].
    fn compile_model(&self, dump: EngineDump) -> Result<Self::Handle>;

    /// Decode the most probable label sequence and its probability for one
    /// non-empty encoded sequence.
    fn predict(&self, handle: &Self::Handle, x: &EncodedSequence) -> Result<(LabelSequence, f64)>;
}

#[cfg(feature = "crfsuite")]
pub use self::crfsuite_engine::{CrfSuiteEngine, CrfSuiteHandle};

#[cfg(feature = "crfsuite")]
mod crfsuite_engine {
    use std::collections::BTreeMap;
    use std::fs;

    use crfsuite::{Attribute, GraphicalModel, Model, Trainer};

    use super::{Engine, EngineDump};
    use crate::encoder::EncodedSequence;
    use crate::error::{Error, Result};
    use crate::params::{Algorithm, EngineParams};
    use crate::token::LabelSequence;

    /// Metadata key for the model format; load-bearing, so a compile with
    /// an unexpected value must fail rather than proceed.
    pub(crate) const META_FORMAT: &str = "format";
    /// Metadata key recording the training algorithm; informational only.
    pub(crate) const META_ALGORITHM: &str = "algorithm";

    const FORMAT_CRF1D: &str = "crf1d";

    /// Engine backed by the CRFsuite C library.
    ///
    /// CRFsuite trains to a file path, so training detours through a
    /// temporary file whose bytes become the handle's serialized form.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CrfSuiteEngine;

    /// Trained or compiled CRFsuite state together with its serialized
    /// bytes, kept so export does not need to re-serialize.
    pub struct CrfSuiteHandle {
        model: Model,
        raw: Vec<u8>,
        meta: BTreeMap<String, serde_json::Value>,
    }

    fn to_algorithm(algorithm: Algorithm) -> crfsuite::Algorithm {
        match algorithm {
            Algorithm::Lbfgs => crfsuite::Algorithm::LBFGS,
            Algorithm::L2Sgd => crfsuite::Algorithm::L2SGD,
            Algorithm::AveragedPerceptron => crfsuite::Algorithm::AP,
            Algorithm::PassiveAggressive => crfsuite::Algorithm::PA,
            Algorithm::Arow => crfsuite::Algorithm::AROW,
        }
    }

    fn to_items(xseq: &EncodedSequence) -> Vec<Vec<Attribute>> {
        xseq.iter()
            .map(|features| {
                features
                    .iter()
                    .map(|(name, value)| Attribute::new(name.clone(), *value))
                    .collect()
            })
            .collect()
    }

    impl Engine for CrfSuiteEngine {
        type Handle = CrfSuiteHandle;

        fn train(
            &self,
            x: &[EncodedSequence],
            y: &[LabelSequence],
            params: &EngineParams,
        ) -> Result<Self::Handle> {
            let mut trainer = Trainer::new(params.verbose);
            trainer
                .select(to_algorithm(params.algorithm), GraphicalModel::CRF1D)
                .map_err(Error::engine)?;
            for (name, value) in params.engine_pairs() {
                trainer.set(name, &value).map_err(Error::engine)?;
            }

            for (xseq, yseq) in x.iter().zip(y.iter()) {
                let items = to_items(xseq);
                let labels: Vec<&str> = yseq.iter().map(String::as_str).collect();
                trainer.append(&items, &labels, 0i32).map_err(Error::engine)?;
            }

            // CRFsuite only trains to a path
            let temp_file = tempfile::NamedTempFile::new().map_err(Error::engine)?;
            let path = temp_file
                .path()
                .to_str()
                .ok_or_else(|| Error::engine("temporary model path is not valid UTF-8"))?;
            trainer.train(path, -1i32).map_err(Error::engine)?;

            let raw = fs::read(temp_file.path()).map_err(Error::engine)?;
            let model = Model::from_memory(&raw).map_err(Error::engine)?;

            let mut meta = BTreeMap::new();
            meta.insert(META_FORMAT.to_string(), FORMAT_CRF1D.into());
            meta.insert(
                META_ALGORITHM.to_string(),
                params.algorithm.engine_name().into(),
            );
            Ok(CrfSuiteHandle { model, raw, meta })
        }

        fn export_model(&self, handle: &Self::Handle) -> Result<EngineDump> {
            Ok(EngineDump {
                model: handle.raw.clone(),
                metadata: handle.meta.clone(),
            })
        }

        fn compile_model(&self, dump: EngineDump) -> Result<Self::Handle> {
            for (key, value) in &dump.metadata {
                match key.as_str() {
                    META_FORMAT => {
                        if value.as_str() != Some(FORMAT_CRF1D) {
                            return Err(Error::MalformedArtifact(format!(
                                "unsupported model format {}, expected {:?}",
                                value, FORMAT_CRF1D
                            )));
                        }
                    }
                    META_ALGORITHM => {}
                    other => return Err(Error::UnknownMetadataKey(other.to_string())),
                }
            }

            let model = Model::from_memory(&dump.model)
                .map_err(|e| Error::MalformedArtifact(e.to_string()))?;
            Ok(CrfSuiteHandle {
                model,
                raw: dump.model,
                meta: dump.metadata,
            })
        }

        fn predict(
            &self,
            handle: &Self::Handle,
            x: &EncodedSequence,
        ) -> Result<(LabelSequence, f64)> {
            let items = to_items(x);
            let mut tagger = handle.model.tagger().map_err(Error::engine)?;
            let labels = tagger.tag(&items).map_err(Error::engine)?;
            let confidence = tagger.probability(&labels).map_err(Error::engine)?;
            Ok((labels, confidence))
        }
    }
}
