use nom::bytes::complete::{take_while, take_while1};

use super::char_class::is_wsp;
use super::ParseResult;

// Value grammars run on unfolded text, so linear whitespace is plain
// SP/HTAB here. Folds are removed by `utils::unfold` before decoding.

/// Parses optional whitespace (0 or more SP or HTAB)
pub fn owsp(input: &[u8]) -> ParseResult<&[u8]> {
    take_while(is_wsp)(input)
}

/// Parses required whitespace (1 or more SP or HTAB)
pub fn lws(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(is_wsp)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owsp_and_lws() {
        let (rem, val) = owsp(b"rest").unwrap();
        assert_eq!(rem, b"rest");
        assert_eq!(val, b"");

        let (rem, val) = owsp(b" \t \trest").unwrap();
        assert_eq!(rem, b"rest");
        assert_eq!(val, b" \t \t");

        assert!(lws(b"rest").is_err());
        let (rem, _) = lws(b"  rest").unwrap();
        assert_eq!(rem, b"rest");
    }
}
