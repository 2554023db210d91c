// imports
use crate::error::{CbowError, Result};

use std::collections::HashMap;


// receives one event per newly allocated identity, in allocation order.
// this is the only way to rebuild the identity -> word dictionary, the
// vocabulary itself has no reverse lookup.
pub trait RegistrationSink {
    fn registered(&mut self, identity: usize, word: &str);
}

// "<identity> <word>", identity in decimal
pub fn registration_line(identity: usize, word: &str) -> String {
    format!("{} {}", identity, word)
}

// writes every registration line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintRegistrations;

impl RegistrationSink for PrintRegistrations {
    fn registered(&mut self, identity: usize, word: &str) {
        println!("{}", registration_line(identity, word));
    }
}

impl RegistrationSink for Vec<(usize, String)> {
    fn registered(&mut self, identity: usize, word: &str) {
        self.push((identity, word.to_owned()));
    }
}


pub struct Vocabulary {
    t2i: HashMap<String, usize>,
    capacity: usize,
}

impl Vocabulary {

    pub fn new(capacity: usize) -> Vocabulary {
        Self {
            t2i: HashMap::new(),
            capacity: capacity
        }
    }

    pub fn len(&self) -> usize {
        self.t2i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t2i.is_empty()
    }

    /// Returns the identity of `word`, allocating the next consecutive one
    /// on first sight. Only a fresh allocation reaches `sink`.
    pub fn register_or_fetch<S: RegistrationSink + ?Sized>(&mut self, word: &str, sink: &mut S) -> Result<usize> {

        if let Some(identity) = self.t2i.get(word) {
            return Ok(*identity);
        }

        // identities index rows of the weight matrices, so they can't pass the capacity
        let identity = self.t2i.len();
        if identity >= self.capacity {
            return Err(CbowError::CapacityExceeded { capacity: self.capacity, word: word.to_owned() });
        }

        self.t2i.insert(word.to_owned(), identity);
        sink.registered(identity, word);
        Ok(identity)
    }

    /// Pure lookup, never allocates.
    pub fn fetch(&self, word: &str) -> Result<usize> {
        match self.t2i.get(word) {
            Some(identity) => Ok(*identity),
            None => Err(CbowError::UnknownWord(word.to_owned()))
        }
    }

}
