// imports
use crate::config::JsonTrain;
use crate::error::{CbowError, Result};
use crate::vocabulary::{RegistrationSink, Vocabulary};

use std::collections::VecDeque;
use std::time::Instant;
use ndarray::prelude::*;
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::{rngs::StdRng, SeedableRng};


// errors at or below this magnitude are clamped to zero before the update
const DEADBAND: f64 = 0.001;
const PROGRESS_EVERY: usize = 100000;


/// Online continuous-bag-of-words trainer.
///
/// Row `i` of `w_input` is the embedding of the word with identity `i`,
/// column `v` of `w_output` scores the hidden layer against word `v`.
/// Both are allocated at `vocab_capacity` up front.
pub struct Train<S: RegistrationSink> {
    w_input: Array2<f64>,
    w_output: Array2<f64>,
    vocabulary: Vocabulary,
    sink: S,
    context_size: usize,
    context_mid: usize,
    learning_rate: f64,
    steps: usize,
    phase: Phase,
}

// training is a single pass: once it ends, either way, it can't be resumed
enum Phase {
    Training,
    // holds the average feature vector, computed once the stream is exhausted
    Trained(Array1<f64>),
    Failed,
}

impl<S: RegistrationSink> Train<S> {

    pub fn new(params: &JsonTrain, sink: S) -> Result<Train<S>> {

        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };
        let (capacity, dim) = (params.vocab_capacity, params.feature_dim);

        Ok(Self {
            w_input: Array::random_using((capacity, dim), Uniform::new(0.0, 1.0), &mut rng),
            w_output: Array::random_using((dim, capacity), Uniform::new(0.0, 1.0), &mut rng),
            vocabulary: Vocabulary::new(capacity),
            sink: sink,
            context_size: params.context_size,
            context_mid: (params.context_size - 1) / 2,
            learning_rate: params.learning_rate,
            steps: 0,
            phase: Phase::Training
        })
    }

    /// Builds a trainer and consumes `tokens` with it.
    pub fn run<I>(tokens: I, params: &JsonTrain, sink: S) -> Result<Train<S>>
    where
        I: IntoIterator,
        I::Item: AsRef<str> {

        let mut trainer = Train::new(params, sink)?;
        trainer.train(tokens)?;
        Ok(trainer)
    }

    pub fn get_input_weights(&self) -> &Array2<f64> {
        &self.w_input
    }

    pub fn get_output_weights(&self) -> &Array2<f64> {
        &self.w_output
    }

    pub fn get_sink(&self) -> &S {
        &self.sink
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.phase, Phase::Trained(_))
    }

    pub fn weights_are_finite(&self) -> bool {
        self.w_input.iter().chain(self.w_output.iter()).all(|w| w.is_finite())
    }

    /// Single pass over `tokens`: fill the window, then one update per slide.
    pub fn train<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str> {

        match self.phase {
            Phase::Training => (),
            Phase::Trained(_) => return Err(CbowError::AlreadyTrained),
            Phase::Failed => return Err(CbowError::TrainingFailed)
        }

        // any error leaves weights and vocabulary half updated, so the run is dead
        match self.consume(tokens) {
            Ok(avg_feature_vector) => {
                self.phase = Phase::Trained(avg_feature_vector);
                Ok(())
            },
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    fn consume<I>(&mut self, tokens: I) -> Result<Array1<f64>>
    where
        I: IntoIterator,
        I::Item: AsRef<str> {

        let mut tokens = tokens.into_iter();
        let mut context = self.init_context(&mut tokens)?;
        let timer = Instant::now();

        for token in tokens {

            self.update_context(&mut context, token.as_ref())?;
            self.update_features(&context);

            if self.steps % PROGRESS_EVERY == 0 {
                eprintln!("done {} update steps, {} words in vocabulary, {} seconds ...",
                self.steps, self.vocabulary.len(), timer.elapsed().as_secs());
            }
        }

        self.calculate_avg_feature_vector()
    }

    fn init_context<I>(&mut self, tokens: &mut I) -> Result<VecDeque<usize>>
    where
        I: Iterator,
        I::Item: AsRef<str> {

        let mut context: VecDeque<usize> = VecDeque::with_capacity(self.context_size + 1);
        while context.len() < self.context_size {
            match tokens.next() {
                Some(token) => {
                    let identity = self.vocabulary.register_or_fetch(token.as_ref(), &mut self.sink)?;
                    context.push_back(identity);
                },
                None => return Err(CbowError::InsufficientData { required: self.context_size, available: context.len() })
            }
        }
        Ok(context)
    }

    fn update_context(&mut self, context: &mut VecDeque<usize>, word: &str) -> Result<()> {
        let identity = self.vocabulary.register_or_fetch(word, &mut self.sink)?;
        context.push_back(identity);
        context.pop_front();
        Ok(())
    }

    // mean of every row, unused rows included
    fn calculate_avg_feature_vector(&self) -> Result<Array1<f64>> {
        self.w_input.mean_axis(Axis(0))
        .ok_or(CbowError::InvalidConfig("vocab_capacity must be positive".to_string()))
    }

    // one forward and backward pass for the current window
    fn update_features(&mut self, context: &VecDeque<usize>) {

        let target = context[self.context_mid];
        let hidden_layer = self.calculate_hidden_layer(context);
        let output = hidden_layer.dot(&self.w_output);
        let prediction = softmax(&output);
        let output_errors = output_errors(&prediction, target);

        self.correct_output_weights(&output_errors, &hidden_layer);
        self.correct_input_weights(&output_errors);
        self.steps += 1;
    }

    // sum, not mean, of the context rows around the target
    fn calculate_hidden_layer(&self, context: &VecDeque<usize>) -> Array1<f64> {

        let mut hidden_layer: Array1<f64> = Array1::zeros(self.w_input.dim().1);
        for (position, identity) in context.iter().enumerate() {
            if position == self.context_mid {
                continue;
            }
            hidden_layer += &self.w_input.row(*identity);
        }
        hidden_layer
    }

    fn correct_output_weights(&mut self, output_errors: &Array1<f64>, hidden_layer: &Array1<f64>) {
        // outer product of shape (feature_dim, vocab_capacity)
        let delta = &hidden_layer.view().insert_axis(Axis(1)) * &output_errors.view().insert_axis(Axis(0));
        self.w_output.scaled_add(-self.learning_rate, &delta);
    }

    // must run after correct_output_weights, the input error is taken from the corrected matrix.
    // every row moves by the same delta, not only the rows of the window words.
    fn correct_input_weights(&mut self, output_errors: &Array1<f64>) {
        let input_errors = self.w_output.dot(output_errors);
        let delta = input_errors * self.learning_rate;
        self.w_input -= &delta;
    }

    fn trained_avg(&self) -> Result<&Array1<f64>> {
        match &self.phase {
            Phase::Trained(avg_feature_vector) => Ok(avg_feature_vector),
            Phase::Training => Err(CbowError::NotTrained),
            Phase::Failed => Err(CbowError::TrainingFailed)
        }
    }

    /// Raw embedding row of `word`, as an owned copy.
    pub fn features(&self, word: &str) -> Result<Array1<f64>> {
        self.trained_avg()?;
        let identity = self.vocabulary.fetch(word)?;
        Ok(self.w_input.row(identity).to_owned())
    }

    /// Average embedding minus the embedding of `word`. Centered and sign
    /// inverted, not scaled to unit length.
    pub fn normalised_features(&self, word: &str) -> Result<Array1<f64>> {
        let avg = self.trained_avg()?;
        let features = self.features(word)?;
        Ok(avg - &features)
    }

    pub fn cosine_similarity(&self, first: &str, second: &str) -> Result<f64> {
        let first = self.normalised_features(first)?;
        let second = self.normalised_features(second)?;
        Ok(crate::similarity::cosine_similarity(first.view(), second.view()))
    }

    pub fn euclidean_distance(&self, first: &str, second: &str) -> Result<f64> {
        let first = self.features(first)?;
        let second = self.features(second)?;
        Ok(crate::similarity::euclidean_distance(first.view(), second.view()))
    }

}


// no max shift, large scores overflow to non finite values
pub(crate) fn softmax(output: &Array1<f64>) -> Array1<f64> {
    let exps = output.mapv(f64::exp);
    let sum = exps.sum();
    exps / sum
}

pub(crate) fn output_errors(prediction: &Array1<f64>, target: usize) -> Array1<f64> {
    let mut errors = prediction.clone();
    errors[target] -= 1.0;
    errors.mapv_inplace(|e| if e.abs() > DEADBAND { e } else { 0.0 });
    errors
}
