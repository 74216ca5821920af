use std::fmt;

use tracing::debug;

use crate::artifact::ModelArtifact;
use crate::encoder::{self, encode_token, EncodedSequence};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::params::{EngineParams, TrainingOptions};
use crate::token::{LabelSequence, TokenSequence};

#[cfg(feature = "crfsuite")]
use crate::engine::CrfSuiteEngine;

/// A trained or compiled model: the engine together with its opaque
/// handle. The handle is created by [`fit_with`] or
/// [`TrainedModel::compile_with`] and never mutated afterwards, so shared
/// read-only use is governed solely by the engine's own guarantees.
pub struct TrainedModel<E: Engine> {
    engine: E,
    handle: E::Handle,
}

// The handle is opaque engine state, so there is nothing meaningful to
// print and no Debug bound to demand from engines.
impl<E: Engine> fmt::Debug for TrainedModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedModel").finish_non_exhaustive()
    }
}

/// Train a model with the default CRFsuite engine.
///
/// Fails with [`Error::ArgumentMismatch`] before any engine call when the
/// number of feature sequences and label sequences differ. Training is
/// blocking and CPU-bound; callers needing cancellation must run it in an
/// externally cancellable context.
#[cfg(feature = "crfsuite")]
pub fn fit(
    x: &[TokenSequence],
    y: &[LabelSequence],
    options: &TrainingOptions,
) -> Result<TrainedModel<CrfSuiteEngine>> {
    fit_with(CrfSuiteEngine, x, y, options)
}

/// Train a model with an explicit engine.
pub fn fit_with<E: Engine>(
    engine: E,
    x: &[TokenSequence],
    y: &[LabelSequence],
    options: &TrainingOptions,
) -> Result<TrainedModel<E>> {
    if x.len() != y.len() {
        return Err(Error::ArgumentMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    let encoded = encoder::transform(x)?;
    let params = EngineParams::from_options(options)?;
    debug!(
        sequences = x.len(),
        algorithm = %params.algorithm,
        "training model"
    );
    let handle = engine.train(&encoded, y, &params)?;
    debug!("training finished");
    Ok(TrainedModel { engine, handle })
}

impl<E: Engine> TrainedModel<E> {
    /// Compile a transportable artifact back into a usable model.
    pub fn compile_with(engine: E, artifact: &ModelArtifact) -> Result<Self> {
        let dump = artifact.to_dump()?;
        debug!(model_bytes = dump.model.len(), "compiling model artifact");
        let handle = engine.compile_model(dump)?;
        Ok(Self { engine, handle })
    }

    /// Export this model into its transportable form.
    pub fn export(&self) -> Result<ModelArtifact> {
        let dump = self.engine.export_model(&self.handle)?;
        debug!(model_bytes = dump.model.len(), "exported model");
        Ok(ModelArtifact::from_dump(dump))
    }

    /// Normalize token sequences into canonical feature maps.
    ///
    /// Pure and model-independent today; it lives on the model for
    /// interface symmetry with transforms that may consult trained state.
    pub fn transform(&self, x: &[TokenSequence]) -> Result<Vec<EncodedSequence>> {
        encoder::transform(x)
    }

    /// Predict the label sequence and its probability for each input
    /// sequence.
    ///
    /// An empty sequence has exactly one labeling, the empty one, so it
    /// yields `(vec![], 1.0)` without consulting the engine. Probabilities
    /// are returned exactly as the engine computed them.
    pub fn predict_sequence(&self, x: &[TokenSequence]) -> Result<Vec<(LabelSequence, f64)>> {
        x.iter()
            .map(|seq| {
                if seq.is_empty() {
                    return Ok((LabelSequence::new(), 1.0));
                }
                let encoded = seq.iter().map(encode_token).collect::<Result<_>>()?;
                self.engine.predict(&self.handle, &encoded)
            })
            .collect()
    }

    /// The engine this model was created with.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine-owned handle.
    pub fn handle(&self) -> &E::Handle {
        &self.handle
    }
}

#[cfg(feature = "crfsuite")]
impl TrainedModel<CrfSuiteEngine> {
    /// Compile a transportable artifact with the default CRFsuite engine.
    pub fn compile(artifact: &ModelArtifact) -> Result<Self> {
        Self::compile_with(CrfSuiteEngine, artifact)
    }
}
