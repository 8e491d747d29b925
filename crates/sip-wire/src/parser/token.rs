use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::digit1,
    combinator::{map_res, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

use super::char_class::{is_token_char, is_word_char};
use super::ParseResult;

/// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
pub fn token(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(is_token_char)(input)
}

/// word = 1*(token chars / word separators)
pub fn word(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(is_word_char)(input)
}

fn is_qdtext(c: u8) -> bool {
    c != b'"' && c != b'\\' && c != b'\r' && c != b'\n'
}

fn is_quoted_pair_char(c: u8) -> bool {
    c != b'\r' && c != b'\n'
}

/// quoted-string = DQUOTE *(qdtext / quoted-pair) DQUOTE
///
/// Returns the literal including the quotes.
pub fn quoted_string_raw(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(delimited(
        tag(b"\""),
        many0(alt((
            take_while1(is_qdtext),
            recognize(preceded(
                tag(b"\\"),
                nom::bytes::complete::take_while_m_n(1, 1, is_quoted_pair_char),
            )),
        ))),
        tag(b"\""),
    ))(input)
}

/// Parses a quoted string and returns its unescaped content.
pub fn quoted_string(input: &[u8]) -> ParseResult<String> {
    let (rem, raw) = quoted_string_raw(input)?;
    Ok((rem, unquote(raw)))
}

/// Strips the surrounding quotes of a quoted-string literal and resolves
/// quoted pairs. Text that is not quoted is returned as is.
pub fn unquote(raw: &[u8]) -> String {
    let inner = if raw.len() >= 2 && raw[0] == b'"' && raw[raw.len() - 1] == b'"' {
        &raw[1..raw.len() - 1]
    } else {
        return String::from_utf8_lossy(raw).into_owned();
    };
    let mut out = Vec::with_capacity(inner.len());
    let mut escaped = false;
    for &c in inner {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == b'\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Writes `text` as a quoted string, escaping quotes and backslashes.
pub fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// True if `text` can be written without quoting.
pub fn is_token(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_token_char)
}

pub fn parse_u32(input: &[u8]) -> ParseResult<u32> {
    map_res(digit1, |d: &[u8]| {
        std::str::from_utf8(d)
            .map_err(|_| ())
            .and_then(|s| s.parse::<u32>().map_err(|_| ()))
    })(input)
}

pub fn parse_u16(input: &[u8]) -> ParseResult<u16> {
    map_res(digit1, |d: &[u8]| {
        std::str::from_utf8(d)
            .map_err(|_| ())
            .and_then(|s| s.parse::<u16>().map_err(|_| ()))
    })(input)
}

/// comment = "(" *(ctext / quoted-pair / comment) ")", returned without the
/// outer parentheses.
pub fn comment(input: &[u8]) -> ParseResult<&[u8]> {
    let err = || nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char));
    if input.first() != Some(&b'(') {
        return Err(err());
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, &c) in input.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            b'\\' => escaped = true,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[1..i]));
                }
            }
            _ => {}
        }
    }
    Err(err())
}

/// Converts parsed bytes to an owned string. The scanner only hands out
/// bytes of the original message, which may contain any UTF-8 text.
pub fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
