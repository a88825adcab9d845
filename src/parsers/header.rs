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

//! Header Tokenizer (§4.2): walks raw header-block bytes, extracts
//! name/separator/value triples, unfolds continuation lines, counts newline
//! styles, and hands each header a fully EWD-decoded value.

use std::borrow::Cow;

use crate::{decoders::encoded_word, Header, HeaderLineFlags, HeaderName, NewlineStyle, ParseFlags};

pub struct Tokenized<'x> {
    pub headers: Vec<Header<'x>>,
    pub nlines_type: Option<NewlineStyle>,
    pub flags: ParseFlags,
}

/// Runs the Header Tokenizer over `data`, stopping at the blank line that
/// terminates the header block (or at EOF if none is found).
pub fn tokenize(data: &[u8], count_newlines: bool) -> Tokenized<'_> {
    let mut headers = Vec::new();
    let mut flags = ParseFlags::default();
    let (mut cr_only, mut lf_only, mut crlf) = (0usize, 0usize, 0usize);
    let mut order = 0usize;
    let mut pos = 0usize;
    let len = data.len();

    while pos < len {
        match data[pos] {
            b'\n' => {
                pos += 1;
                break;
            }
            b'\r' => {
                pos += if data.get(pos + 1) == Some(&b'\n') { 2 } else { 1 };
                break;
            }
            _ => (),
        }

        let offset_field = pos;

        // State 0 -> 1: header names must open on an alphabetic byte.
        if !data[pos].is_ascii_alphabetic() {
            flags.broken_headers = true;
            pos = skip_line(data, pos);
            continue;
        }

        let name_start = pos;
        let mut name_end = pos;
        let mut broken = false;
        loop {
            if pos >= len {
                broken = true;
                break;
            }
            match data[pos] {
                b':' => break,
                b'\n' | b'\r' => {
                    broken = true;
                    break;
                }
                b' ' | b'\t' => {
                    broken = true;
                    break;
                }
                _ => {
                    pos += 1;
                    name_end = pos;
                }
            }
        }
        if broken {
            flags.broken_headers = true;
            pos = skip_line(data, name_start);
            continue;
        }

        let name = parse_header_name(&data[name_start..name_end]);
        pos += 1; // skip ':'

        // State 2: separator whitespace.
        let mut line_flags = HeaderLineFlags {
            tab_separated: false,
            empty_separator: true,
        };
        while pos < len && matches!(data[pos], b' ' | b'\t') {
            if data[pos] == b'\t' {
                line_flags.tab_separated = true;
            }
            line_flags.empty_separator = false;
            pos += 1;
        }

        // States 3/99: value, across any number of folded continuation lines.
        let value_start = pos;
        let mut value_end = pos;
        loop {
            while pos < len && data[pos] != b'\r' && data[pos] != b'\n' {
                pos += 1;
            }
            value_end = pos;
            if pos >= len {
                break;
            }
            if data[pos] == b'\r' {
                if data.get(pos + 1) == Some(&b'\n') {
                    pos += 2;
                    crlf += 1;
                } else {
                    pos += 1;
                    cr_only += 1;
                }
            } else {
                pos += 1;
                lf_only += 1;
            }
            if pos < len && matches!(data[pos], b' ' | b'\t') {
                continue; // valid fold, keep accumulating
            }
            break;
        }

        let raw = &data[value_start..value_end];
        let decoded = decode_value(raw, &mut flags);

        headers.push(Header {
            name,
            decoded,
            raw_value: (value_start, value_end),
            flags: line_flags,
            offset_field,
            offset_start: value_start,
            offset_end: value_end,
            order,
        });
        order += 1;
    }

    let nlines_type = count_newlines.then(|| {
        if crlf >= lf_only && crlf >= cr_only {
            NewlineStyle::CrLf
        } else if lf_only >= cr_only {
            NewlineStyle::Lf
        } else {
            NewlineStyle::Cr
        }
    });

    Tokenized {
        headers,
        nlines_type,
        flags,
    }
}

fn skip_line(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() && data[pos] != b'\n' {
        pos += 1;
    }
    if pos < data.len() {
        pos += 1;
    }
    pos
}

/// State 4: unfold (CR/LF runs plus trailing fold whitespace collapse to
/// one space, NUL bytes elided), trim, then run the Encoded-Word Decoder.
///
/// When nothing actually needs decoding (no fold, no encoded word) this
/// borrows straight out of `raw` instead of paying for a decode pass.
fn decode_value<'x>(raw: &'x [u8], flags: &mut ParseFlags) -> Cow<'x, str> {
    let needs_unfold = raw.iter().any(|&b| matches!(b, b'\r' | b'\n' | 0));
    if !needs_unfold {
        let trimmed = trim_wsp(raw);
        if let Ok(s) = std::str::from_utf8(trimmed) {
            if !s.contains("=?") {
                return if needs_sanitizing(s) {
                    Cow::Owned(encoded_word::sanitize(s.to_string()))
                } else {
                    Cow::Borrowed(s)
                };
            }
        }
        let (decoded, invalid_utf8) = encoded_word::decode(trimmed);
        if invalid_utf8 {
            flags.bad_unicode = true;
        }
        return Cow::Owned(decoded);
    }

    let unfolded = unfold(raw);
    let (decoded, invalid_utf8) = encoded_word::decode(&unfolded);
    if invalid_utf8 {
        flags.bad_unicode = true;
    }
    Cow::Owned(decoded)
}

/// Whether `s` has any ASCII control byte the §4.1 sanity pass would
/// rewrite — the no-fold, no-encoded-word fast path skips
/// `encoded_word::sanitize` entirely unless this says otherwise, so it never
/// returns a value the sanity pass would have changed.
fn needs_sanitizing(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii() && !(b' '..=b'~').contains(&b))
}

fn unfold(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    let n = raw.len();
    while i < n {
        match raw[i] {
            0 => i += 1,
            b'\r' | b'\n' => {
                out.push(b' ');
                i += if raw[i] == b'\r' && raw.get(i + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                while i < n && matches!(raw[i], b' ' | b'\t') {
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    let start = out.iter().position(|&b| b != b' ').unwrap_or(out.len());
    let end = out.iter().rposition(|&b| b != b' ').map_or(start, |p| p + 1);
    out[start..end].to_vec()
}

fn trim_wsp(b: &[u8]) -> &[u8] {
    let start = b
        .iter()
        .position(|&c| !matches!(c, b' ' | b'\t'))
        .unwrap_or(b.len());
    let end = b
        .iter()
        .rposition(|&c| !matches!(c, b' ' | b'\t'))
        .map_or(start, |p| p + 1);
    &b[start..end]
}

/// Case-insensitive dispatch on the lower-cased name bytes (§10.1 Design
/// Note: any case-insensitive lookup technique satisfies the contract —
/// this crate uses a plain `match` rather than re-deriving a perfect hash).
fn parse_header_name(name: &[u8]) -> HeaderName<'_> {
    if name.eq_ignore_ascii_case(b"from") {
        HeaderName::From
    } else if name.eq_ignore_ascii_case(b"to") {
        HeaderName::To
    } else if name.eq_ignore_ascii_case(b"cc") {
        HeaderName::Cc
    } else if name.eq_ignore_ascii_case(b"bcc") {
        HeaderName::Bcc
    } else if name.eq_ignore_ascii_case(b"subject") {
        HeaderName::Subject
    } else if name.eq_ignore_ascii_case(b"message-id") {
        HeaderName::MessageId
    } else if name.eq_ignore_ascii_case(b"return-path") {
        HeaderName::ReturnPath
    } else if name.eq_ignore_ascii_case(b"delivered-to") {
        HeaderName::DeliveredTo
    } else if name.eq_ignore_ascii_case(b"received") {
        HeaderName::Received
    } else if name.eq_ignore_ascii_case(b"date") {
        HeaderName::Date
    } else if name.eq_ignore_ascii_case(b"sender") {
        HeaderName::Sender
    } else if name.eq_ignore_ascii_case(b"in-reply-to") {
        HeaderName::InReplyTo
    } else if name.eq_ignore_ascii_case(b"content-type") {
        HeaderName::ContentType
    } else if name.eq_ignore_ascii_case(b"content-transfer-encoding") {
        HeaderName::ContentTransferEncoding
    } else if name.eq_ignore_ascii_case(b"references") {
        HeaderName::References
    } else {
        HeaderName::Other(String::from_utf8_lossy(name))
    }
}

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::{HeaderName, NewlineStyle};

    #[test]
    fn simple_header_block() {
        let data = b"From: alice@example.com\r\nTo: bob@example.com\r\nSubject: hi\r\n\r\nbody";
        let t = tokenize(data, true);
        assert_eq!(t.headers.len(), 3);
        assert_eq!(t.headers[0].name, HeaderName::From);
        assert_eq!(t.headers[0].decoded, "alice@example.com");
        assert_eq!(t.nlines_type, Some(NewlineStyle::CrLf));
    }

    #[test]
    fn folded_continuation_collapses_to_one_space() {
        let data = b"Subject: line one\r\n  line two\r\n\r\n";
        let t = tokenize(data, false);
        assert_eq!(t.headers[0].decoded, "line one line two");
    }

    #[test]
    fn malformed_name_sets_broken_flag_and_is_skipped() {
        let data = b"1bad: value\r\nFrom: a@b.c\r\n\r\n";
        let t = tokenize(data, false);
        assert!(t.flags.broken_headers);
        assert_eq!(t.headers.len(), 1);
        assert_eq!(t.headers[0].name, HeaderName::From);
    }

    #[test]
    fn name_only_header_has_empty_value() {
        let data = b"X-Empty:\r\nFrom: a@b.c\r\n\r\n";
        let t = tokenize(data, false);
        assert_eq!(t.headers[0].decoded, "");
    }

    #[test]
    fn encoded_word_is_decoded_in_place() {
        let data = b"Subject: =?utf-8?q?hi?=\r\n\r\n";
        let t = tokenize(data, false);
        assert_eq!(t.headers[0].decoded, "hi");
    }

    #[test]
    fn unterminated_block_still_flushes_final_header() {
        let data = b"Subject: no trailing blank line";
        let t = tokenize(data, false);
        assert_eq!(t.headers.len(), 1);
        assert_eq!(t.headers[0].decoded, "no trailing blank line");
    }

    #[test]
    fn control_byte_on_unfolded_fast_path_still_gets_sanitized() {
        let data = b"Subject: a\x01b\r\n\r\n";
        let t = tokenize(data, false);
        assert_eq!(t.headers[0].decoded, "a?b");
    }

    #[test]
    fn clean_unfolded_value_stays_borrowed() {
        let data = b"Subject: hi\r\n\r\n";
        let t = tokenize(data, false);
        assert!(matches!(t.headers[0].decoded, std::borrow::Cow::Borrowed(_)));
    }
}
