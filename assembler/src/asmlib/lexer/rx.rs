use std::{ops::Deref, sync::OnceLock};

use regex::Regex;

/// A regular expression which is compiled the first time it is used.
pub(crate) struct LazyRegex {
    once: OnceLock<Regex>,
    pattern: &'static str,
}

impl LazyRegex {
    pub(crate) const fn new(pattern: &'static str) -> Self {
        LazyRegex {
            once: OnceLock::new(),
            pattern,
        }
    }
}

impl Deref for LazyRegex {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        self.once.get_or_init(|| match Regex::new(self.pattern) {
            Ok(r) => r,
            Err(e) => {
                panic!("'{}' is not a valid regular expression: {e}", self.pattern);
            }
        })
    }
}

/// Numeric literals: decimal, or hexadecimal, octal or binary with a
/// `0x`, `0o` or `0b` prefix.  Underscores may separate digits.
pub(crate) static NUMBER: LazyRegex = LazyRegex::new(
    r"^(?P<sign>-)?(?:0[xX](?P<hex>[0-9A-Fa-f_]+)|0[oO](?P<oct>[0-7_]+)|0[bB](?P<bin>[01_]+)|(?P<dec>[0-9][0-9_]*))$",
);

/// The `\xHH` escape in string literals.
pub(crate) static HEX_ESCAPE: LazyRegex = LazyRegex::new(r"^[0-9A-Fa-f]{2}$");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_forms() {
        for good in ["0", "-1", "0x1f", "0XFF_FF", "0o17", "0b1010", "1_000"] {
            assert!(NUMBER.is_match(good), "{good} should match");
        }
        for bad in ["", "-", "0x", "0b102", "12ab", "x12", "--1"] {
            assert!(!NUMBER.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_hex_escape() {
        assert!(HEX_ESCAPE.is_match("7f"));
        assert!(!HEX_ESCAPE.is_match("7"));
        assert!(!HEX_ESCAPE.is_match("7g"));
    }
}
