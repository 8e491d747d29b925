// Byte classification for the header scanner and the value grammars

/// Classes the scanner state machine switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Cr,
    Lf,
    Colon,
    Semicolon,
    Whitespace,
    DQuote,
    LessThan,
    GreaterThan,
    Backslash,
    Comma,
    /// Characters allowed in a header name
    Token,
    Other,
}

const fn build_class_table() -> [CharClass; 256] {
    let mut table = [CharClass::Other; 256];
    let mut i = 0;
    while i < 256 {
        let c = i as u8;
        if is_token_char(c) {
            table[i] = CharClass::Token;
        }
        i += 1;
    }
    table[b'\r' as usize] = CharClass::Cr;
    table[b'\n' as usize] = CharClass::Lf;
    table[b':' as usize] = CharClass::Colon;
    table[b';' as usize] = CharClass::Semicolon;
    table[b' ' as usize] = CharClass::Whitespace;
    table[b'\t' as usize] = CharClass::Whitespace;
    table[b'"' as usize] = CharClass::DQuote;
    table[b'<' as usize] = CharClass::LessThan;
    table[b'>' as usize] = CharClass::GreaterThan;
    table[b'\\' as usize] = CharClass::Backslash;
    table[b',' as usize] = CharClass::Comma;
    table
}

static CLASS_TABLE: [CharClass; 256] = build_class_table();

#[inline]
pub fn classify(c: u8) -> CharClass {
    CLASS_TABLE[c as usize]
}

/// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
pub const fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~'
        )
}

/// word characters used by Call-ID
pub const fn is_word_char(c: u8) -> bool {
    is_token_char(c)
        || matches!(
            c,
            b'(' | b')' | b'<' | b'>' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'{' | b'}'
        )
}

pub const fn is_wsp(c: u8) -> bool {
    c == b' ' || c == b'\t'
}
