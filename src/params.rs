use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported training algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// L-BFGS with L1/L2 regularization (default)
    #[default]
    Lbfgs,
    /// SGD with L2 regularization
    L2Sgd,
    /// Averaged Perceptron
    AveragedPerceptron,
    /// Passive Aggressive
    PassiveAggressive,
    /// Adaptive Regularization of Weights
    Arow,
}

impl Algorithm {
    /// Default iteration cap for this algorithm. L-BFGS runs until
    /// convergence; the cap only exists because the engine wants an integer.
    pub fn default_max_iterations(self) -> u64 {
        match self {
            Algorithm::Lbfgs => i32::MAX as u64,
            Algorithm::L2Sgd => 1000,
            Algorithm::AveragedPerceptron => 100,
            Algorithm::PassiveAggressive => 100,
            Algorithm::Arow => 100,
        }
    }

    /// The engine's own name for this algorithm.
    pub fn engine_name(self) -> &'static str {
        match self {
            Algorithm::Lbfgs => "lbfgs",
            Algorithm::L2Sgd => "l2sgd",
            Algorithm::AveragedPerceptron => "averaged-perceptron",
            Algorithm::PassiveAggressive => "passive-aggressive",
            Algorithm::Arow => "arow",
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lbfgs" => Ok(Algorithm::Lbfgs),
            "l2sgd" => Ok(Algorithm::L2Sgd),
            "ap" | "averaged-perceptron" => Ok(Algorithm::AveragedPerceptron),
            "pa" | "passive-aggressive" => Ok(Algorithm::PassiveAggressive),
            "arow" => Ok(Algorithm::Arow),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_name())
    }
}

/// Line search method for L-BFGS optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linesearch {
    /// More-Thuente line search (engine default)
    #[default]
    MoreThuente,
    /// Backtracking with regular Wolfe condition
    Backtracking,
    /// Backtracking with strong Wolfe condition
    StrongBacktracking,
}

impl Linesearch {
    /// The engine's own token for this method.
    pub fn engine_name(self) -> &'static str {
        match self {
            Linesearch::MoreThuente => "MoreThuente",
            Linesearch::Backtracking => "Backtracking",
            Linesearch::StrongBacktracking => "StrongBacktracking",
        }
    }
}

impl FromStr for Linesearch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "more_thuente" => Ok(Linesearch::MoreThuente),
            "backtracking" => Ok(Linesearch::Backtracking),
            "strong_backtracking" => Ok(Linesearch::StrongBacktracking),
            other => Err(Error::UnsupportedLinesearch(other.to_string())),
        }
    }
}

/// Sparse, user-facing training options.
///
/// Every field is optional; omitted fields take the documented engine
/// defaults when translated. `algorithm` and `linesearch` are symbolic so
/// the options block can come straight out of a JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingOptions {
    /// Training algorithm: `lbfgs`, `l2sgd`, `ap`, `pa` or `arow`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Minimum frequency of features to keep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_freq: Option<f64>,
    /// Generate state features for all label/attribute pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_possible_states: Option<bool>,
    /// Generate transition features for all label pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_possible_transitions: Option<bool>,
    /// L1 regularization coefficient (lbfgs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c1: Option<f64>,
    /// L2 regularization coefficient (lbfgs, l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c2: Option<f64>,
    /// Iteration cap; the default depends on the algorithm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
    /// Number of limited memory vectors (lbfgs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_memories: Option<u64>,
    /// Convergence epsilon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    /// Iterations between convergence tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u64>,
    /// Convergence threshold over `period` iterations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    /// Line search method: `more_thuente`, `backtracking` or
    /// `strong_backtracking` (lbfgs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linesearch: Option<String>,
    /// Maximum line search trials per iteration (lbfgs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_linesearch: Option<u64>,
    /// Initial learning rate for calibration (l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_eta: Option<f64>,
    /// Learning rate increase/decrease rate for calibration (l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_rate: Option<f64>,
    /// Number of instances used for calibration (l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_samples: Option<u64>,
    /// Number of candidate learning rates (l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_candidates: Option<u64>,
    /// Maximum calibration trials (l2sgd)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_max_trials: Option<u64>,
    /// PA variant: 0, 1 or 2 (pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pa_type: Option<u8>,
    /// Aggressiveness parameter C (pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// Count wrong labels instead of a 0/1 sequence loss (pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_sensitive: Option<bool>,
    /// Average weights over updates (pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub averaging: Option<bool>,
    /// Initial variance of weights (arow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Tradeoff between loss and update change (arow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    /// Let the engine print its iteration log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Fully-defaulted parameter set in the engine's vocabulary.
///
/// Built exclusively by [`EngineParams::from_options`]; every field is
/// always populated so the merge table is auditable in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    pub algorithm: Algorithm,
    pub min_freq: f64,
    pub all_possible_states: bool,
    pub all_possible_transitions: bool,
    pub c1: f64,
    pub c2: f64,
    pub max_iterations: u64,
    pub num_memories: u64,
    pub epsilon: f64,
    pub period: u64,
    pub delta: f64,
    pub linesearch: Linesearch,
    pub max_linesearch: u64,
    pub calibration_eta: f64,
    pub calibration_rate: f64,
    pub calibration_samples: u64,
    pub calibration_candidates: u64,
    pub calibration_max_trials: u64,
    pub pa_type: u8,
    pub c: f64,
    pub error_sensitive: bool,
    pub averaging: bool,
    pub variance: f64,
    pub gamma: f64,
    pub verbose: bool,
}

impl EngineParams {
    /// Merge sparse options with the default table.
    ///
    /// Pure over its input: no I/O, no engine calls. Fails only on an
    /// unrecognized `algorithm` or `linesearch` value.
    pub fn from_options(options: &TrainingOptions) -> Result<Self> {
        let algorithm = match options.algorithm.as_deref() {
            Some(name) => name.parse()?,
            None => Algorithm::default(),
        };
        let linesearch = match options.linesearch.as_deref() {
            Some(name) => name.parse()?,
            None => Linesearch::default(),
        };
        Ok(Self {
            algorithm,
            min_freq: options.min_freq.unwrap_or(0.0),
            all_possible_states: options.all_possible_states.unwrap_or(false),
            all_possible_transitions: options.all_possible_transitions.unwrap_or(false),
            c1: options.c1.unwrap_or(0.0),
            c2: options.c2.unwrap_or(1.0),
            max_iterations: options
                .max_iterations
                .unwrap_or_else(|| algorithm.default_max_iterations()),
            num_memories: options.num_memories.unwrap_or(6),
            epsilon: options.epsilon.unwrap_or(1e-5),
            period: options.period.unwrap_or(10),
            delta: options.delta.unwrap_or(1e-5),
            linesearch,
            max_linesearch: options.max_linesearch.unwrap_or(20),
            calibration_eta: options.calibration_eta.unwrap_or(0.1),
            calibration_rate: options.calibration_rate.unwrap_or(2.0),
            calibration_samples: options.calibration_samples.unwrap_or(1000),
            calibration_candidates: options.calibration_candidates.unwrap_or(10),
            calibration_max_trials: options.calibration_max_trials.unwrap_or(20),
            pa_type: options.pa_type.unwrap_or(1),
            c: options.c.unwrap_or(1.0),
            error_sensitive: options.error_sensitive.unwrap_or(true),
            averaging: options.averaging.unwrap_or(true),
            variance: options.variance.unwrap_or(1.0),
            gamma: options.gamma.unwrap_or(1.0),
            verbose: options.verbose.unwrap_or(false),
        })
    }

    /// Render the parameters the selected algorithm understands, as
    /// `(engine key, engine value)` pairs.
    ///
    /// The engine rejects parameters outside the algorithm's own set, so
    /// the subset is exhaustive per algorithm rather than a single union.
    pub fn engine_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("feature.minfreq", self.min_freq.to_string()),
            (
                "feature.possible_states",
                bool_to_engine(self.all_possible_states),
            ),
            (
                "feature.possible_transitions",
                bool_to_engine(self.all_possible_transitions),
            ),
            ("max_iterations", self.max_iterations.to_string()),
        ];
        match self.algorithm {
            Algorithm::Lbfgs => {
                pairs.push(("c1", self.c1.to_string()));
                pairs.push(("c2", self.c2.to_string()));
                pairs.push(("num_memories", self.num_memories.to_string()));
                pairs.push(("epsilon", self.epsilon.to_string()));
                pairs.push(("period", self.period.to_string()));
                pairs.push(("delta", self.delta.to_string()));
                pairs.push(("linesearch", self.linesearch.engine_name().to_string()));
                pairs.push(("max_linesearch", self.max_linesearch.to_string()));
            }
            Algorithm::L2Sgd => {
                pairs.push(("c2", self.c2.to_string()));
                pairs.push(("period", self.period.to_string()));
                pairs.push(("delta", self.delta.to_string()));
                pairs.push(("calibration.eta", self.calibration_eta.to_string()));
                pairs.push(("calibration.rate", self.calibration_rate.to_string()));
                pairs.push(("calibration.samples", self.calibration_samples.to_string()));
                pairs.push((
                    "calibration.candidates",
                    self.calibration_candidates.to_string(),
                ));
                pairs.push((
                    "calibration.max_trials",
                    self.calibration_max_trials.to_string(),
                ));
            }
            Algorithm::AveragedPerceptron => {
                pairs.push(("epsilon", self.epsilon.to_string()));
            }
            Algorithm::PassiveAggressive => {
                pairs.push(("type", self.pa_type.to_string()));
                pairs.push(("c", self.c.to_string()));
                pairs.push(("error_sensitive", bool_to_engine(self.error_sensitive)));
                pairs.push(("averaging", bool_to_engine(self.averaging)));
                pairs.push(("epsilon", self.epsilon.to_string()));
            }
            Algorithm::Arow => {
                pairs.push(("variance", self.variance.to_string()));
                pairs.push(("gamma", self.gamma.to_string()));
                pairs.push(("epsilon", self.epsilon.to_string()));
            }
        }
        pairs
    }
}

fn bool_to_engine(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_defaults_all_populated() {
        let params = EngineParams::from_options(&TrainingOptions::default()).unwrap();
        assert_eq!(params.algorithm, Algorithm::Lbfgs);
        assert_eq!(params.c1, 0.0);
        assert_eq!(params.c2, 1.0);
        assert_eq!(params.num_memories, 6);
        assert_eq!(params.epsilon, 1e-5);
        assert_eq!(params.linesearch, Linesearch::MoreThuente);
        assert_eq!(params.max_linesearch, 20);
        assert_eq!(params.pa_type, 1);
        assert!(params.error_sensitive);
        assert!(params.averaging);
        assert_eq!(params.variance, 1.0);
        assert_eq!(params.gamma, 1.0);
        assert!(!params.verbose);
    }

    #[test]
    fn test_max_iterations_default_depends_on_algorithm() {
        let cases = [
            ("lbfgs", i32::MAX as u64),
            ("l2sgd", 1000),
            ("ap", 100),
            ("pa", 100),
            ("arow", 100),
        ];
        for (name, expected) in cases {
            let options = TrainingOptions {
                algorithm: Some(name.to_string()),
                ..Default::default()
            };
            let params = EngineParams::from_options(&options).unwrap();
            assert_eq!(params.max_iterations, expected, "algorithm {}", name);
        }
    }

    #[test]
    fn test_explicit_max_iterations_wins() {
        let options = TrainingOptions {
            algorithm: Some("l2sgd".to_string()),
            max_iterations: Some(50),
            ..Default::default()
        };
        let params = EngineParams::from_options(&options).unwrap();
        assert_eq!(params.max_iterations, 50);
    }

    #[test]
    fn test_unsupported_algorithm() {
        let options = TrainingOptions {
            algorithm: Some("bogus".to_string()),
            ..Default::default()
        };
        let err = EngineParams::from_options(&options).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(name) if name == "bogus"));
    }

    #[test]
    fn test_unsupported_linesearch() {
        let options = TrainingOptions {
            linesearch: Some("bisection".to_string()),
            ..Default::default()
        };
        let err = EngineParams::from_options(&options).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLinesearch(name) if name == "bisection"));
    }

    #[test]
    fn test_algorithm_aliases() {
        assert_eq!(
            "averaged-perceptron".parse::<Algorithm>().unwrap(),
            Algorithm::AveragedPerceptron
        );
        assert_eq!(
            "passive-aggressive".parse::<Algorithm>().unwrap(),
            Algorithm::PassiveAggressive
        );
    }

    #[test]
    fn test_linesearch_translation() {
        let options = TrainingOptions {
            linesearch: Some("strong_backtracking".to_string()),
            ..Default::default()
        };
        let params = EngineParams::from_options(&options).unwrap();
        let pairs = params.engine_pairs();
        assert_eq!(value_of(&pairs, "linesearch"), Some("StrongBacktracking"));
    }

    #[test]
    fn test_engine_pairs_match_algorithm() {
        let lbfgs = EngineParams::from_options(&TrainingOptions::default()).unwrap();
        let pairs = lbfgs.engine_pairs();
        assert!(value_of(&pairs, "num_memories").is_some());
        assert!(value_of(&pairs, "calibration.eta").is_none());
        assert!(value_of(&pairs, "type").is_none());

        let options = TrainingOptions {
            algorithm: Some("pa".to_string()),
            ..Default::default()
        };
        let pa = EngineParams::from_options(&options).unwrap();
        let pairs = pa.engine_pairs();
        assert_eq!(value_of(&pairs, "type"), Some("1"));
        assert_eq!(value_of(&pairs, "error_sensitive"), Some("1"));
        assert!(value_of(&pairs, "c1").is_none());
        assert!(value_of(&pairs, "linesearch").is_none());
    }

    #[test]
    fn test_options_deserialize_sparse_json() {
        let options: TrainingOptions =
            serde_json::from_str(r#"{"algorithm": "arow", "variance": 2.5}"#).unwrap();
        assert_eq!(options.algorithm.as_deref(), Some("arow"));
        assert_eq!(options.variance, Some(2.5));
        assert_eq!(options.c2, None);

        let params = EngineParams::from_options(&options).unwrap();
        assert_eq!(params.variance, 2.5);
        assert_eq!(params.max_iterations, 100);
    }
}
