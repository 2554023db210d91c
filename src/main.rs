use cbow_trainer::Pipeline;

// the binary takes a single argument, a path to a json file such as
// {"corpus_file": "Input/corpus.txt", "context_size": 15, "feature_dim": 50,
//  "learning_rate": 0.4, "vocab_capacity": 7000, "seed": 1, "pairs_file": "Input/pairs.txt"}
// registered words are printed as "<identity> <word>" while training runs.

fn main() {
    if let Err(e) = Pipeline::run() {
        panic!("{}", e)
    }
}
