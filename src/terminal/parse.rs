pub type Token<'a> = &'a str;
pub type TokenIterator<'a> = std::str::SplitWhitespace<'a>;

#[macro_export]
/// Parses a token as a board position, mapping failure to
/// `ParseError::ExpectedPosition`.
macro_rules! parse_position {
    ($string:expr) => {
        $string
            .parse::<usize>()
            .map_err(|_| ParseError::ExpectedPosition($string.into()))
    };
}

pub fn into_tokens(input: &str) -> TokenIterator<'_> {
    input.split_whitespace()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected command found \"{0}\", type `help` for a list")]
    ExpectedCommand(String),
    #[error("Unexpected argument \"{0}\"")]
    UnexpectedArgument(String),
    #[error("Expected a square from 1-9, found \"{0}\"")]
    ExpectedPosition(String),
}
pub type ParseResult<T> = Result<T, ParseError>;
