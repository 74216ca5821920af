use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::token::{AttrValue, Token, TokenSequence};

/// Normalized per-token feature representation: feature name to finite
/// numeric weight.
pub type CanonicalFeatureMap = BTreeMap<String, f64>;

/// A token sequence after normalization.
pub type EncodedSequence = Vec<CanonicalFeatureMap>;

/// Normalize one token into its canonical weighted-feature map.
///
/// - `Map`: numeric values pass through as weights; categorical values are
///   folded into the name as `"<key>-<value>"` with weight 1.0.
/// - `List`: every element becomes a present feature with weight 1.0.
/// - `Scalar`: the value becomes a present feature with weight 1.0.
///
/// The only rejected input is a non-finite numeric weight, which would
/// break the canonical-map invariant.
pub fn encode_token(token: &Token) -> Result<CanonicalFeatureMap> {
    let mut features = CanonicalFeatureMap::new();
    match token {
        Token::Map(attrs) => {
            for (key, value) in attrs {
                match value {
                    AttrValue::Num(weight) => {
                        if !weight.is_finite() {
                            return Err(Error::TypeMismatch(format!(
                                "attribute {:?} has non-finite weight {}",
                                key, weight
                            )));
                        }
                        features.insert(key.clone(), *weight);
                    }
                    AttrValue::Text(text) => {
                        features.insert(format!("{}-{}", key, text), 1.0);
                    }
                }
            }
        }
        Token::List(items) => {
            for item in items {
                features.insert(item.clone(), 1.0);
            }
        }
        Token::Scalar(value) => {
            features.insert(value.clone(), 1.0);
        }
    }
    Ok(features)
}

/// Normalize a batch of token sequences, independently per token.
pub fn transform(x: &[TokenSequence]) -> Result<Vec<EncodedSequence>> {
    x.iter()
        .map(|seq| seq.iter().map(encode_token).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_token() {
        let encoded = transform(&[vec![Token::from("cat")]]).unwrap();
        assert_eq!(
            encoded,
            vec![vec![CanonicalFeatureMap::from([("cat".to_string(), 1.0)])]]
        );
    }

    #[test]
    fn test_list_token() {
        let map = encode_token(&Token::from(vec!["walk", "shop"])).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["walk"], 1.0);
        assert_eq!(map["shop"], 1.0);
    }

    #[test]
    fn test_map_token_mixed_values() {
        let token: Token = [("f1", AttrValue::Num(1.5)), ("f2", AttrValue::from("v"))]
            .into_iter()
            .collect();
        let map = encode_token(&token).unwrap();
        assert_eq!(
            map,
            CanonicalFeatureMap::from([("f1".to_string(), 1.5), ("f2-v".to_string(), 1.0)])
        );
    }

    #[test]
    fn test_integer_weight_coerced_to_float() {
        let token: Token = [("count", AttrValue::from(1i64))].into_iter().collect();
        let map = encode_token(&token).unwrap();
        assert_eq!(map["count"], 1.0);
    }

    #[test]
    fn test_numeric_map_is_fixed_point() {
        // A map token whose values are all numeric re-encodes to itself.
        let token: Token = [("f1", 1.5), ("f2", 0.25)].into_iter().collect();
        let once = encode_token(&token).unwrap();
        let again: Token = once
            .iter()
            .map(|(k, v)| (k.clone(), AttrValue::Num(*v)))
            .collect();
        assert_eq!(encode_token(&again).unwrap(), once);
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let token: Token = [("f", f64::NAN)].into_iter().collect();
        let err = encode_token(&token).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));

        let token: Token = [("f", f64::INFINITY)].into_iter().collect();
        assert!(encode_token(&token).is_err());
    }

    #[test]
    fn test_shapes_may_vary_within_a_sequence() {
        let seq: TokenSequence = vec![
            Token::from("cat"),
            Token::from(vec!["sat", "mat"]),
            [("pos", AttrValue::from("NN"))].into_iter().collect(),
        ];
        let encoded = transform(&[seq]).unwrap();
        assert_eq!(encoded[0].len(), 3);
        assert_eq!(encoded[0][2]["pos-NN"], 1.0);
    }

    #[test]
    fn test_empty_sequence_transforms_to_empty() {
        let encoded = transform(&[vec![]]).unwrap();
        assert_eq!(encoded, vec![Vec::<CanonicalFeatureMap>::new()]);
    }
}
