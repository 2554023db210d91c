use crate::error::Result;
use crate::train::Train;
use crate::vocabulary::RegistrationSink;

use std::fmt::Display;
use ndarray::ArrayView1;


/// `dot(a, b) / sqrt(dot(a, a) * dot(b, b))`, NaN when either vector is all zero.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.dot(&b) / (a.dot(&a) * b.dot(&b)).sqrt()
}

pub fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    (&b - &a).mapv(|x| x.powi(2)).sum().sqrt()
}


#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub first: String,
    pub second: String,
    pub cosine: f64,
    pub euclidean: f64,
}

impl Display for PairScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}: cosine = {}, euclidean = {}", self.first, self.second, self.cosine, self.euclidean)
    }
}

/// Both query metrics for one word pair of a trained model.
pub fn score_pair<S: RegistrationSink>(trainer: &Train<S>, first: &str, second: &str) -> Result<PairScore> {
    Ok(PairScore {
        first: first.to_owned(),
        second: second.to_owned(),
        cosine: trainer.cosine_similarity(first, second)?,
        euclidean: trainer.euclidean_distance(first, second)?
    })
}

// each line holds two words separated by whitespace, other lines are skipped
pub fn parse_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
    .filter_map(|line| {
        let words = line.split_whitespace().map(|w| w.to_lowercase()).collect::<Vec<String>>();
        match words.as_slice() {
            [first, second] => Some((first.to_owned(), second.to_owned())),
            _ => None
        }
    })
    .collect()
}
