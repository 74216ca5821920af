#![cfg(feature = "crfsuite")]

//! Every supported algorithm must train through the same option surface.

use crfwrap::{fit, Token, TrainingOptions};

fn weather_corpus() -> (Vec<Vec<Token>>, Vec<Vec<String>>) {
    let x = vec![
        vec![
            Token::from(vec!["walk", "shop"]),
            Token::from("walk"),
            Token::from(vec!["walk", "clean"]),
        ],
        vec![
            Token::from(vec!["shop", "clean"]),
            Token::from(vec!["walk", "clean"]),
            Token::from("clean"),
        ],
    ];
    let y = vec![
        vec!["sunny".to_string(), "sunny".to_string(), "sunny".to_string()],
        vec!["rainy".to_string(), "rainy".to_string(), "rainy".to_string()],
    ];
    (x, y)
}

fn train_and_check(algorithm: &str) {
    let (x, y) = weather_corpus();
    let options = TrainingOptions {
        algorithm: Some(algorithm.to_string()),
        max_iterations: Some(50),
        ..Default::default()
    };
    let model = fit(&x, &y, &options).unwrap();

    let results = model.predict_sequence(&x).unwrap();
    assert_eq!(results.len(), 2);
    for (labels, confidence) in results {
        assert_eq!(labels.len(), 3);
        assert!((0.0..=1.0).contains(&confidence));
        for label in labels {
            assert!(label == "sunny" || label == "rainy");
        }
    }
}

#[test]
fn test_lbfgs_training() {
    train_and_check("lbfgs");
}

#[test]
fn test_l2sgd_training() {
    train_and_check("l2sgd");
}

#[test]
fn test_ap_training() {
    train_and_check("ap");
}

#[test]
fn test_pa_training() {
    train_and_check("pa");
}

#[test]
fn test_arow_training() {
    train_and_check("arow");
}

#[test]
fn test_pa_specific_options() {
    let (x, y) = weather_corpus();
    let options = TrainingOptions {
        algorithm: Some("pa".to_string()),
        pa_type: Some(2),
        c: Some(0.5),
        error_sensitive: Some(false),
        averaging: Some(false),
        max_iterations: Some(50),
        ..Default::default()
    };
    let model = fit(&x, &y, &options).unwrap();
    assert_eq!(model.predict_sequence(&x).unwrap().len(), 2);
}

#[test]
fn test_lbfgs_linesearch_option() {
    let (x, y) = weather_corpus();
    let options = TrainingOptions {
        algorithm: Some("lbfgs".to_string()),
        linesearch: Some("backtracking".to_string()),
        c1: Some(0.1),
        max_iterations: Some(50),
        ..Default::default()
    };
    let model = fit(&x, &y, &options).unwrap();
    assert_eq!(model.predict_sequence(&x).unwrap().len(), 2);
}
