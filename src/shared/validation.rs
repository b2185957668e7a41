use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Search terms that may also be postal codes
    /// - Valid: "75111", "2465", "0"
    /// - Invalid: "", "75 111", "7511a", "-1", "1.5"
    pub static ref NUMERIC_TERM_REGEX: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

pub fn is_numeric_term(term: &str) -> bool {
    NUMERIC_TERM_REGEX.is_match(term)
}
