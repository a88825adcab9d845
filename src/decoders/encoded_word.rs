/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

//! RFC 2047 encoded-word decoder.
//!
//! Operates on an already-unfolded header value and expands every
//! `=?charset?enc?text?=` token to UTF-8, concatenating adjacent tokens
//! that were only separated by linear whitespace (RFC 2047 §6.2). Each
//! token is transcoded independently rather than buffered into a shared
//! per-charset byte run before a single transcode call — for every
//! stateless charset this crate supports, `transcode(a) + transcode(b) ==
//! transcode(a ++ b)`, so the two approaches are observably identical
//! except for `iso-2022-jp`, whose stateful escape sequences the original
//! source refuses to concatenate even with itself anyway. Decoding
//! independently makes that exception automatic rather than a special
//! case to remember.

use super::{base64::decode_base64_word, charsets::charset_decoder};
use crate::parsers::HeaderStream;

/// Decodes every encoded word in `value`, returning the expanded UTF-8
/// text and whether any byte sequence failed UTF-8 validation along the
/// way (the caller raises `BAD_UNICODE` on `true`).
pub fn decode(value: &[u8]) -> (String, bool) {
    let mut out = String::with_capacity(value.len());
    let mut invalid_utf8 = false;
    let mut i = 0;
    let n = value.len();
    let mut after_token = false;

    while i < n {
        if value[i] == b'=' && value.get(i + 1) == Some(&b'?') {
            if let Some((text, consumed)) = decode_token(&value[i + 1..]) {
                out.push_str(&text);
                i += 1 + consumed;
                after_token = true;
                continue;
            }
        }

        if after_token && matches!(value[i], b' ' | b'\t') {
            let mut j = i;
            while j < n && matches!(value[j], b' ' | b'\t') {
                j += 1;
            }
            if value.get(j) == Some(&b'=') && value.get(j + 1) == Some(&b'?') {
                i = j;
                continue;
            }
        }
        after_token = false;

        match std::str::from_utf8(&value[i..]) {
            Ok(s) => {
                let ch = s.chars().next().expect("non-empty slice");
                out.push(ch);
                i += ch.len_utf8();
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if valid_up_to > 0 {
                    out.push_str(std::str::from_utf8(&value[i..i + valid_up_to]).unwrap());
                    i += valid_up_to;
                } else {
                    out.push('\u{FFFD}');
                    invalid_utf8 = true;
                    i += e.error_len().unwrap_or(1).max(1);
                }
            }
        }
    }

    (sanitize(out), invalid_utf8)
}

/// Parses and decodes a single encoded word whose leading `=` has already
/// been matched; `data` starts at the first `?` (`?charset?enc?text?=…`).
/// Returns the decoded text and the number of bytes of `data` consumed
/// (through the closing `?=`), or `None` if this isn't a well-formed
/// encoded word (the caller then treats the `=` as a literal byte).
fn decode_token(data: &[u8]) -> Option<(String, usize)> {
    if data.first() != Some(&b'?') {
        return None;
    }
    let mut i = 1;
    let n = data.len();
    let charset_start = i;
    while i < n && data[i] != b'?' {
        if data[i] == b'\n' {
            return None;
        }
        i += 1;
    }
    if i >= n || i == charset_start {
        return None;
    }
    let charset_end = i;
    i += 1; // skip '?'

    let enc = *data.get(i)?;
    i += 1;
    if data.get(i) != Some(&b'?') {
        return None;
    }
    i += 1; // payload starts here

    let (payload, payload_len) = match enc {
        b'q' | b'Q' => {
            let mut cursor = HeaderStream::new(&data[i..]);
            let bytes = cursor.decode_quoted_printable_word()?;
            (bytes, cursor.offset())
        }
        b'b' | b'B' => {
            let (consumed, bytes) = decode_base64_word(&data[i..]);
            if consumed == usize::MAX {
                return None;
            }
            (bytes, consumed)
        }
        _ => return None,
    };

    let charset = &data[charset_start..charset_end];
    let text = match charset_decoder(charset) {
        Some(decoder) => decoder(&payload),
        None => String::from_utf8(payload)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
    };

    Some((text, i + payload_len))
}

/// Final pass (§4.1): non-graphic, non-space, non-high-bit bytes become
/// `?`; runs of control whitespace collapse to a single space.
pub(crate) fn sanitize(s: String) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_ascii() {
            result.push(c);
            continue;
        }
        match c as u8 {
            b' '..=b'~' => result.push(c),
            b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                result.push(' ');
                while let Some(&next) = chars.peek() {
                    if next.is_ascii() && matches!(next as u8, b'\t' | b'\n' | b'\r' | 0x0b | 0x0c | b' ') {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            _ => result.push('?'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::decode;

    #[test]
    fn plain_text_round_trips() {
        let (text, bad) = decode(b"hello world");
        assert_eq!(text, "hello world");
        assert!(!bad);
    }

    #[test]
    fn single_encoded_word() {
        let (text, _) = decode("=?utf-8?B?SMOpbGxv?=".as_bytes());
        assert_eq!(text, "Héllo");
    }

    #[test]
    fn adjacent_same_charset_tokens_concatenate() {
        let (text, _) = decode(b"=?utf-8?B?SMOpbGxv?= =?utf-8?Q?_world?=");
        assert_eq!(text, "Héllo world");
    }

    #[test]
    fn whitespace_between_plain_and_encoded_is_preserved() {
        let (text, _) = decode(b"hi =?utf-8?Q?there?=");
        assert_eq!(text, "hi there");
    }

    #[test]
    fn iso2022_jp_tokens_decode_independently_and_concatenate() {
        #[cfg(feature = "full_encoding")]
        {
            let (text, _) = decode(
                b"=?iso-2022-jp?B?GyRCJCIbKEI=?= =?iso-2022-jp?B?GyRCJCQbKEI=?=",
            );
            assert_eq!(text, "\u{3042}\u{3044}");
        }
    }

    #[test]
    fn invalid_utf8_emits_replacement_character() {
        let (text, bad) = decode(b"la\xffla");
        assert!(bad);
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn malformed_encoded_word_falls_back_to_literal() {
        let (text, _) = decode(b"=?broken");
        assert_eq!(text, "=?broken");
    }
}
