// imports
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use flate2::read::GzDecoder;


/// Lazy, single pass stream of lower cased word tokens.
///
/// Empty lines and lines made only of digits are skipped, the rest is split
/// on runs of whitespace and ascii punctuation. Reading stops at the first
/// I/O error, which is kept and can be checked with [`Tokens::error`] once
/// the stream is drained.
pub struct Tokens<R: BufRead> {
    reader: R,
    current_line: VecDeque<String>,
    error: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> Tokens<R> {

    pub fn new(reader: R) -> Tokens<R> {
        Self {
            reader: reader,
            current_line: VecDeque::new(),
            error: None,
            done: false
        }
    }

    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn is_skipped(line: &str) -> bool {
        line.is_empty() || line.chars().all(|c| c.is_ascii_digit())
    }

    fn tokenize(line: &str) -> VecDeque<String> {
        line
        .split(|c: char| c.is_ascii_whitespace() || c == '\x0B' || c.is_ascii_punctuation())
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.to_lowercase())
        .collect()
    }

    // refill `current_line` from the next line that yields tokens
    fn read_line(&mut self) {

        let mut line = String::new();
        while self.current_line.is_empty() && !self.done {

            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
                    if !Tokens::<R>::is_skipped(line) {
                        self.current_line = Tokens::<R>::tokenize(line);
                    }
                },
                Err(e) => {
                    self.error = Some(e);
                    self.done = true;
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.current_line.is_empty() {
            self.read_line();
        }
        self.current_line.pop_front()
    }
}

/// Opens a corpus file, decompressing on the fly when the path ends in `.gz`.
pub fn open(file_path: &str) -> Result<Tokens<Box<dyn BufRead>>, io::Error> {

    let f = File::open(file_path)?;
    let reader: Box<dyn BufRead> = if file_path.ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(Tokens::new(reader))
}


#[cfg(test)]
mod tests {

    use super::*;
    use std::io::{Cursor, Write};
    use flate2::{Compression, write::GzEncoder};

    fn collect(text: &str) -> Vec<String> {
        Tokens::new(Cursor::new(text.as_bytes().to_vec())).collect()
    }

    #[test]
    fn splits_and_lowercases() {
        let tokens = collect("The Cat, sat on\tthe MAT!\n");
        assert_eq!(tokens, vec!["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn skips_blank_and_numeric_lines() {
        let tokens = collect("12\n\nfirst line\r\n2023\nsecond-line.\n");
        assert_eq!(tokens, vec!["first", "line", "second", "line"]);
    }

    #[test]
    fn only_ascii_whitespace_separates() {
        // no-break space and ideographic space stay inside the token, vertical tab splits
        let tokens = collect("caf\u{a0}au lait\u{3000}x\x0By\n");
        assert_eq!(tokens, vec!["caf\u{a0}au", "lait\u{3000}x", "y"]);
    }

    #[test]
    fn numbers_inside_text_are_kept() {
        let tokens = collect("chapter 12 begins\n");
        assert_eq!(tokens, vec!["chapter", "12", "begins"]);
    }

    #[test]
    fn punctuation_only_line_does_not_end_stream() {
        let tokens = collect("hello\n...\nworld\n");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn invalid_utf8_stops_with_error() {

        let mut bytes = b"good words\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"never reached\n");

        let mut tokens = Tokens::new(Cursor::new(bytes));
        let read = (&mut tokens).collect::<Vec<String>>();

        assert_eq!(read, vec!["good", "words"]);
        assert!(tokens.error().is_some());
        assert!(tokens.take_error().is_some());
        assert!(tokens.error().is_none());
    }

    #[test]
    fn reads_gzip_corpus() {

        let path = std::env::temp_dir().join(format!("cbow_corpus_{}.txt.gz", std::process::id()));
        {
            let f = File::create(&path).unwrap();
            let mut writer = GzEncoder::new(f, Compression::default());
            writer.write_all(b"Zipped text\n42\nstill zipped\n").unwrap();
            writer.finish().unwrap();
        }

        let tokens = open(path.to_str().unwrap()).unwrap().collect::<Vec<String>>();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(tokens, vec!["zipped", "text", "still", "zipped"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(open("no/such/corpus.txt").is_err());
    }
}
