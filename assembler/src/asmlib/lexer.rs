//! Splits one line of assembly source into tokens.  Whitespace and
//! comments (from `#` to the end of the line, outside string
//! literals) are discarded.
use logos::Logos;

pub(crate) mod rx;

fn capture_text(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

/// The body of a string literal, without the quotes.  Escape
/// sequences are left alone here; see [`crate::directive`].
fn capture_string_body(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

#[derive(Debug, PartialEq, Eq, Logos, Clone)]
#[logos(skip r"[ \t\r\f]+|#[^\n]*")]
pub(crate) enum Token {
    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    /// Anything which starts like a number.  Whether it actually is
    /// one is decided by the parser, so that `12ab` is reported as a
    /// bad immediate rather than as two tokens.
    #[regex("-?[0-9][0-9A-Za-z_]*", capture_text)]
    Number(String),

    #[regex(r"[A-Za-z_.$][A-Za-z0-9_.$]*", capture_text)]
    Name(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, capture_string_body)]
    Str(String),
}

/// Tokenise `text`, returning the offending byte offset on failure.
pub(crate) fn tokenise(text: &str) -> Result<Vec<Token>, usize> {
    let mut lexer = Token::lexer(text);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(tok) => tokens.push(tok),
            Err(()) => {
                return Err(lexer.span().start);
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Token {
        Token::Name(s.to_string())
    }

    fn number(s: &str) -> Token {
        Token::Number(s.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenise(""), Ok(Vec::new()));
        assert_eq!(tokenise("   \t  "), Ok(Vec::new()));
    }

    #[test]
    fn test_comment_only() {
        assert_eq!(tokenise("# nothing here, at all"), Ok(Vec::new()));
        assert_eq!(tokenise("    #"), Ok(Vec::new()));
    }

    #[test]
    fn test_instruction() {
        assert_eq!(
            tokenise("    addeq r2, r0,r1   # sum"),
            Ok(vec![
                name("addeq"),
                name("r2"),
                Token::Comma,
                name("r0"),
                Token::Comma,
                name("r1"),
            ])
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(tokenise("loop:"), Ok(vec![name("loop"), Token::Colon]));
        assert_eq!(
            tokenise("$tmp.1:"),
            Ok(vec![name("$tmp.1"), Token::Colon])
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenise("0x1F -12 0b101 12ab"),
            Ok(vec![number("0x1F"), number("-12"), number("0b101"), number("12ab")])
        );
    }

    #[test]
    fn test_directive_name() {
        assert_eq!(
            tokenise("    .ORG 0x100"),
            Ok(vec![name(".ORG"), number("0x100")])
        );
    }

    #[test]
    fn test_string_keeps_hash_and_escapes() {
        assert_eq!(
            tokenise(r#"    .STR "a#b\"c" # comment"#),
            Ok(vec![name(".STR"), Token::Str(r#"a#b\"c"#.to_string())])
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(tokenise(r#".STR "abc"#).is_err());
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(tokenise("ldi r1, @"), Err(8));
    }
}
