use std::collections::BTreeMap;

/// Scalar value of an attribute inside a [`Token::Map`].
///
/// Numeric values become feature weights directly; text values are folded
/// into the feature name with an implicit weight of 1.0.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Numeric weight
    Num(f64),
    /// Categorical value
    Text(String),
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Num(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Num(value as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// One positional unit of an input sequence.
///
/// Callers may mix shapes freely within one sequence; each token is
/// normalized independently by the feature encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A single present feature, e.g. the surface word itself
    Scalar(String),
    /// An ordered list of present features
    List(Vec<String>),
    /// Named attributes with numeric weights or categorical values.
    /// Duplicate keys cannot occur here; callers building the map decide
    /// which write wins.
    Map(BTreeMap<String, AttrValue>),
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Scalar(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Scalar(value)
    }
}

impl From<Vec<String>> for Token {
    fn from(value: Vec<String>) -> Self {
        Token::List(value)
    }
}

impl From<Vec<&str>> for Token {
    fn from(value: Vec<&str>) -> Self {
        Token::List(value.into_iter().map(String::from).collect())
    }
}

impl From<BTreeMap<String, AttrValue>> for Token {
    fn from(value: BTreeMap<String, AttrValue>) -> Self {
        Token::Map(value)
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Token {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Token::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An ordered sequence of tokens; order is the position axis of the
/// labeling task.
pub type TokenSequence = Vec<Token>;

/// A sequence of label tags, same length as its token sequence.
pub type LabelSequence = Vec<String>;
