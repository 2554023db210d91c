
mod error;
mod config;
mod corpus;
mod vocabulary;
mod train;
mod similarity;
mod pipeline;

pub use error::{CbowError, Result};
pub use config::{Config, JsonTrain, JsonTypes};
pub use corpus::{open as open_corpus, Tokens};
pub use vocabulary::{registration_line, PrintRegistrations, RegistrationSink, Vocabulary};
pub use train::Train;
pub use similarity::{cosine_similarity, euclidean_distance, score_pair, PairScore};
pub use pipeline::Pipeline;
