// imports
use crate::config::{Config, JsonTypes};
use crate::corpus;
use crate::similarity;
use crate::train::Train;
use crate::vocabulary::{PrintRegistrations, RegistrationSink};

use std::env;
use std::error::Error;
use std::fs;
use std::time::Instant;

pub struct Pipeline {}

impl Pipeline {

    // progress goes to stderr, stdout carries the registration lines and pair scores.
    // runs the main procedure of 3 steps -
    // -> configuration of arguments
    // -> training over the corpus tokens
    // -> scoring of word pairs, if given

    pub fn run() -> Result<(), Box<dyn Error>> {

        eprintln!("entering program...");
        let args: Vec<String> = env::args().collect();

        eprintln!("building parameters...");
        let params = Config::new(&args)?.get_params();
        eprintln!("{}", params);

        let trainer = Pipeline::train(&params, PrintRegistrations)?;

        if let Some(pairs_file) = &params.pairs_file {
            Pipeline::score_pairs(&trainer, pairs_file)?;
        }
        Ok(())
    }

    pub fn train<S: RegistrationSink>(params: &JsonTypes, sink: S) -> Result<Train<S>, Box<dyn Error>> {

        let timer = Instant::now();
        eprintln!("starting training part...");

        let mut tokens = corpus::open(&params.corpus_file)?;
        let trainer = Train::run(&mut tokens, &params.json_train, sink)?;

        // a read error ends the token stream early, don't report a truncated run as done
        if let Some(e) = tokens.take_error() {
            return Err(format!("corpus {} could not be read to the end: {}", params.corpus_file, e).into());
        }

        if !trainer.weights_are_finite() {
            eprintln!("warning: training produced non finite weights, consider a lower learning_rate");
        }

        eprintln!("finished training, {} update steps over {} words. Took {} seconds ...",
        trainer.steps(), trainer.vocabulary_len(), timer.elapsed().as_secs());
        Ok(trainer)
    }

    pub fn score_pairs<S: RegistrationSink>(trainer: &Train<S>, pairs_file: &str) -> Result<Vec<similarity::PairScore>, Box<dyn Error>> {

        let pairs = similarity::parse_pairs(&fs::read_to_string(pairs_file)?);
        eprintln!("scoring {} word pairs...", pairs.len());

        let mut scores = Vec::new();
        for (first, second) in &pairs {
            match similarity::score_pair(trainer, first, second) {
                Ok(score) => {
                    println!("{}", score);
                    scores.push(score);
                },
                // an unknown word only fails its own pair
                Err(e) => eprintln!("{} ~ {}: {}", first, second, e)
            }
        }
        Ok(scores)
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::config::JsonTrain;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("cbow_{}_{}", std::process::id(), name));
        fs::write(&path, content).unwrap();
        path
    }

    fn params(corpus_file: &PathBuf) -> JsonTypes {
        JsonTypes {
            corpus_file: corpus_file.to_str().unwrap().to_string(),
            pairs_file: None,
            json_train: JsonTrain::new(3, 4, 0.1, 20).with_seed(11)
        }
    }

    #[test]
    fn trains_from_corpus_file() {

        let corpus = temp_file("corpus.txt", "1\nThe cat sat on the mat.\n\nThe dog sat on the log!\n");
        let trainer = Pipeline::train(&params(&corpus), Vec::<(usize, String)>::new()).unwrap();
        fs::remove_file(&corpus).unwrap();

        let words = trainer.get_sink().iter().map(|(_, w)| w.as_str()).collect::<Vec<&str>>();
        assert_eq!(words, vec!["the", "cat", "sat", "on", "mat", "dog", "log"]);
        // 12 tokens, 3 of them prime the window
        assert_eq!(trainer.steps(), 9);
    }

    #[test]
    fn scores_pairs_and_skips_unknown_words() {

        let corpus = temp_file("pairs_corpus.txt", "the cat sat on the mat\n");
        let pairs = temp_file("pairs.txt", "cat mat\ncat unicorn\nthe on\n");

        let trainer = Pipeline::train(&params(&corpus), Vec::<(usize, String)>::new()).unwrap();
        let scores = Pipeline::score_pairs(&trainer, pairs.to_str().unwrap()).unwrap();
        fs::remove_file(&corpus).unwrap();
        fs::remove_file(&pairs).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].first, "cat");
        assert_eq!(scores[1].second, "on");
    }

    #[test]
    fn too_short_corpus_fails() {
        let corpus = temp_file("short.txt", "just two\n");
        let res = Pipeline::train(&params(&corpus), Vec::<(usize, String)>::new());
        fs::remove_file(&corpus).unwrap();
        assert!(res.is_err());
    }
}
