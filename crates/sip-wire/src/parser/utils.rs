// Utility functions for turning raw field bytes into decodable text

use std::borrow::Cow;

use super::char_class::is_wsp;

/// Replaces each line fold with a single SP.
///
/// A fold is `*WSP CRLF 1*WSP`. Whitespace that is not part of a fold is
/// left alone, and a CRLF not followed by whitespace is kept verbatim. The
/// input is borrowed when it contains no CR.
pub fn unfold(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&b'\r') {
        return Cow::Borrowed(input);
    }

    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    let len = input.len();
    while i < len {
        let c = input[i];
        if is_wsp(c) || c == b'\r' {
            // look ahead over whitespace for CRLF WSP
            let mut j = i;
            while j < len && is_wsp(input[j]) {
                j += 1;
            }
            if j + 2 < len && input[j] == b'\r' && input[j + 1] == b'\n' && is_wsp(input[j + 2]) {
                let mut k = j + 2;
                while k < len && is_wsp(input[k]) {
                    k += 1;
                }
                out.push(b' ');
                i = k;
                continue;
            }
            out.extend_from_slice(&input[i..j.max(i + 1)]);
            i = j.max(i + 1);
            continue;
        }
        out.push(c);
        i += 1;
    }
    Cow::Owned(out)
}

/// Trims SP, HTAB, CR and LF from both ends.
pub fn trim(input: &[u8]) -> &[u8] {
    let is_space = |c: &u8| is_wsp(*c) || *c == b'\r' || *c == b'\n';
    let start = input.iter().position(|c| !is_space(c)).unwrap_or(input.len());
    let end = input.iter().rposition(|c| !is_space(c)).map_or(start, |p| p + 1);
    &input[start..end]
}
