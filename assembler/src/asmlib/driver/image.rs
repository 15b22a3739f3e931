//! Reading program images.  An image has one word per line, written
//! in hexadecimal without a prefix.  Blank lines are ignored.
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use super::Program;
use crate::types::LineNumber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageError {
    pub line: LineNumber,
    pub text: String,
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "line {} of the program image is not a 32-bit hexadecimal word: '{}'",
            self.line, self.text
        )
    }
}

impl Error for ImageError {}

fn parse_word(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 8 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(text, 16).ok()
}

impl Program {
    /// Parse a program image, as written by [`Program::write_hex`].
    ///
    /// # Errors
    /// Fails on the first line which is not a hexadecimal word.
    pub fn from_hex(image: &str) -> Result<Program, ImageError> {
        let mut words = Vec::new();
        for (index, raw) in image.lines().enumerate() {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            match parse_word(text) {
                Some(word) => words.push(word),
                None => {
                    return Err(ImageError {
                        line: index + 1,
                        text: text.to_string(),
                    });
                }
            }
        }
        Ok(Program::from_words(words))
    }
}
