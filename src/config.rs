// imports
use crate::error::CbowError;

use serde_json::Value;
use std::{fs::File, error::Error, fmt::Display, io::BufReader};


// default hyper parameters
const DEFAULT_CONTEXT_SIZE: usize = 15;
const DEFAULT_FEATURE_DIM: usize = 50;
const DEFAULT_LEARNING_RATE: f64 = 0.4;
const DEFAULT_VOCAB_CAPACITY: usize = 7000;

#[derive(Clone, Debug, PartialEq)]
pub struct JsonTrain {
    pub context_size: usize,
    pub feature_dim: usize,
    pub learning_rate: f64,
    pub vocab_capacity: usize,
    pub seed: Option<u64>
}

impl JsonTrain {

    pub fn new(context_size: usize, feature_dim: usize, learning_rate: f64, vocab_capacity: usize) -> JsonTrain {
        Self {
            context_size: context_size,
            feature_dim: feature_dim,
            learning_rate: learning_rate,
            vocab_capacity: vocab_capacity,
            seed: None
        }
    }

    pub fn with_seed(mut self, seed: u64) -> JsonTrain {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), CbowError> {

        if self.context_size < 3 || self.context_size % 2 == 0 {
            return Err(CbowError::InvalidConfig(format!("context_size must be odd and at least 3, got {}", self.context_size)));
        }
        if self.feature_dim == 0 {
            return Err(CbowError::InvalidConfig("feature_dim must be positive".to_string()));
        }
        // also rejects NaN
        if !(self.learning_rate > 0.0) {
            return Err(CbowError::InvalidConfig(format!("learning_rate must be positive, got {}", self.learning_rate)));
        }
        if self.vocab_capacity == 0 {
            return Err(CbowError::InvalidConfig("vocab_capacity must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for JsonTrain {
    fn default() -> Self {
        JsonTrain::new(DEFAULT_CONTEXT_SIZE, DEFAULT_FEATURE_DIM, DEFAULT_LEARNING_RATE, DEFAULT_VOCAB_CAPACITY)
    }
}

impl Display for JsonTrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training hyper parameters:
        context_size: {},
        feature_dim: {},
        learning_rate: {},
        vocab_capacity: {},
        seed: {:?}",
        self.context_size, self.feature_dim, self.learning_rate, self.vocab_capacity, self.seed
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JsonTypes {
    pub corpus_file: String,
    pub pairs_file: Option<String>,
    pub json_train: JsonTrain
}

impl Display for JsonTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        corpus_file: {}
        pairs_file: {:?}
        Using training hyper-params: {}",
        self.corpus_file, self.pairs_file, self.json_train)
    }
}

pub struct Config {
    params: JsonTypes
}

impl Config {

    pub fn get_params(&self) -> JsonTypes {
        return self.params.clone()
    }

    pub fn new(args: &[String]) -> Result<Config, Box<dyn Error>> {

        if args.len() != 2 {
            return Err(format!("input should be a path to json file only").into());
        }

        let f = BufReader::new(File::open(&args[1])?);
        let json: Value = serde_json::from_reader(f)?;
        Ok(Config::from_json(&json)?)
    }

    pub fn from_json(json: &Value) -> Result<Config, CbowError> {

        // input files
        let corpus_file = match json.get("corpus_file") {
            Some(corpus_file) => corpus_file.as_str()
                .ok_or(CbowError::InvalidConfig("corpus_file is not a string".to_string()))?,
            None => return Err(CbowError::InvalidConfig("corpus_file was not supplied through json".to_string()))
        };
        let pairs_file = match json.get("pairs_file") {
            Some(pairs_file) => Some(pairs_file.as_str()
                .ok_or(CbowError::InvalidConfig("pairs_file is not a string".to_string()))?.to_owned()),
            None => None
        };

        // handle default vs input parameters
        let context_size = get_usize(json, "context_size", DEFAULT_CONTEXT_SIZE)?;
        let feature_dim = get_usize(json, "feature_dim", DEFAULT_FEATURE_DIM)?;
        let vocab_capacity = get_usize(json, "vocab_capacity", DEFAULT_VOCAB_CAPACITY)?;
        let learning_rate = match json.get("learning_rate") {
            Some(learning_rate) => learning_rate.as_f64()
                .ok_or(CbowError::InvalidConfig("given learning_rate is not numeric".to_string()))?,
            None => DEFAULT_LEARNING_RATE
        };
        let seed = match json.get("seed") {
            Some(seed) => Some(seed.as_u64()
                .ok_or(CbowError::InvalidConfig("given seed is not a non negative integer".to_string()))?),
            None => None
        };

        let json_train = JsonTrain {
            context_size: context_size,
            feature_dim: feature_dim,
            learning_rate: learning_rate,
            vocab_capacity: vocab_capacity,
            seed: seed
        };
        json_train.validate()?;

        Ok (
            Self {
                params: JsonTypes {
                    corpus_file: corpus_file.to_owned(),
                    pairs_file: pairs_file,
                    json_train: json_train
                }
            }
        )
    }

}

fn get_usize(json: &Value, key: &str, default: usize) -> Result<usize, CbowError> {
    match json.get(key) {
        Some(value) => value.as_u64()
            .map(|v| v as usize)
            .ok_or(CbowError::InvalidConfig(format!("given {} is not a non negative integer", key))),
        None => Ok(default)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_filled_in() {

        let config = Config::from_json(&json!({"corpus_file": "Input/corpus.txt"})).unwrap();
        let params = config.get_params();

        assert_eq!(params.corpus_file, "Input/corpus.txt");
        assert_eq!(params.pairs_file, None);
        assert_eq!(params.json_train, JsonTrain::default());
        assert_eq!(params.json_train.context_size, 15);
        assert_eq!(params.json_train.feature_dim, 50);
        assert_eq!(params.json_train.vocab_capacity, 7000);
    }

    #[test]
    fn explicit_values_override_defaults() {

        let config = Config::from_json(&json!({
            "corpus_file": "c.txt.gz",
            "pairs_file": "pairs.txt",
            "context_size": 5,
            "feature_dim": 8,
            "learning_rate": 0.05,
            "vocab_capacity": 100,
            "seed": 42
        })).unwrap();
        let params = config.get_params();

        assert_eq!(params.pairs_file.as_deref(), Some("pairs.txt"));
        assert_eq!(params.json_train, JsonTrain::new(5, 8, 0.05, 100).with_seed(42));
    }

    #[test]
    fn missing_corpus_is_rejected() {
        let res = Config::from_json(&json!({"context_size": 5}));
        assert!(matches!(res, Err(CbowError::InvalidConfig(_))));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let res = Config::from_json(&json!({"corpus_file": "c.txt", "feature_dim": "fifty"}));
        assert!(matches!(res, Err(CbowError::InvalidConfig(_))));

        let res = Config::from_json(&json!({"corpus_file": "c.txt", "learning_rate": "fast"}));
        assert!(matches!(res, Err(CbowError::InvalidConfig(_))));
    }

    #[test]
    fn window_must_be_odd_and_wide_enough() {
        assert!(JsonTrain::new(4, 2, 0.1, 10).validate().is_err());
        assert!(JsonTrain::new(1, 2, 0.1, 10).validate().is_err());
        assert!(JsonTrain::new(3, 2, 0.1, 10).validate().is_ok());
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert!(JsonTrain::new(3, 0, 0.1, 10).validate().is_err());
        assert!(JsonTrain::new(3, 2, 0.0, 10).validate().is_err());
        assert!(JsonTrain::new(3, 2, f64::NAN, 10).validate().is_err());
        assert!(JsonTrain::new(3, 2, 0.1, 0).validate().is_err());
    }

    #[test]
    fn wrong_argument_count_is_an_error() {
        let args = vec!["cbow_trainer".to_string()];
        assert!(Config::new(&args).is_err());
    }
}
