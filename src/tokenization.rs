use lazy_static::lazy_static;
use regex::Regex;

use crate::ontology::Token;

/// Light tokenization splitting words and punctuation marks.
pub fn tokenize(text: &str) -> Vec<Token> {
    lazy_static! {
        static ref TOKEN_REGEX: Regex = Regex::new(r"\w+|[^\w\s]").unwrap();
    }
    TOKEN_REGEX
        .find_iter(text)
        .enumerate()
        .map(|(index, token)| Token::new(index, token.as_str()))
        .collect()
}
