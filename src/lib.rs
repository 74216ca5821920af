//! Configuration and data-normalization front-end for CRF sequence labeling
//!
//! This library sits in front of a CRF training/inference engine
//! (CRFsuite by default). It normalizes heterogeneous per-token feature
//! shapes into the canonical weighted-feature maps the engine expects,
//! translates sparse symbolic training options into the engine's full
//! parameter set, and manages the serialized-model round trip:
//! train, export, persist, compile, predict.
//!
//! # Examples
//!
//! ## Training and prediction
//!
//! ```no_run
//! # #[cfg(feature = "crfsuite")]
//! # fn main() -> Result<(), crfwrap::Error> {
//! use crfwrap::{fit, Token, TrainingOptions};
//!
//! let x = vec![
//!     vec![Token::from("cat"), Token::from("sat")],
//!     vec![Token::from("dog"), Token::from("ran")],
//! ];
//! let y = vec![
//!     vec!["N".to_string(), "V".to_string()],
//!     vec!["N".to_string(), "V".to_string()],
//! ];
//!
//! let model = fit(&x, &y, &TrainingOptions::default())?;
//! let results = model.predict_sequence(&[vec![Token::from("cat"), Token::from("sat")]])?;
//! let (labels, confidence) = &results[0];
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "crfsuite"))]
//! # fn main() {}
//! ```
//!
//! ## Model round trip
//!
//! ```no_run
//! # #[cfg(feature = "crfsuite")]
//! # fn main() -> Result<(), crfwrap::Error> {
//! use crfwrap::{fit, Token, TrainedModel, TrainingOptions};
//!
//! # let x = vec![vec![Token::from("cat")]];
//! # let y = vec![vec!["N".to_string()]];
//! let model = fit(&x, &y, &TrainingOptions::default())?;
//!
//! // The artifact is plain data, safe for JSON transport
//! let artifact = model.export()?;
//! let json = serde_json::to_string(&artifact).unwrap();
//!
//! let artifact: crfwrap::ModelArtifact = serde_json::from_str(&json).unwrap();
//! let compiled = TrainedModel::compile(&artifact)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "crfsuite"))]
//! # fn main() {}
//! ```

mod artifact;
mod encoder;
mod engine;
mod error;
mod model;
mod params;
mod token;

pub use self::artifact::ModelArtifact;
pub use self::encoder::{encode_token, transform, CanonicalFeatureMap, EncodedSequence};
pub use self::engine::{Engine, EngineDump};
pub use self::error::{Error, Result};
pub use self::model::{fit_with, TrainedModel};
pub use self::params::{Algorithm, EngineParams, Linesearch, TrainingOptions};
pub use self::token::{AttrValue, LabelSequence, Token, TokenSequence};

#[cfg(feature = "crfsuite")]
pub use self::engine::{CrfSuiteEngine, CrfSuiteHandle};
#[cfg(feature = "crfsuite")]
pub use self::model::fit;
