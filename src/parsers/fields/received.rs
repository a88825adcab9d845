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

//! SMTP `Received:` trace parsing (§4.4).
//!
//! A `Received:` value is a sequence of keyword-introduced parts —
//! `from ... by ... with ... for ...` — each carrying free-text data and
//! zero or more parenthesized comments, followed by an optional `;`-date
//! suffix. MTAs disagree wildly on exactly how the `from` part's rDNS and
//! IP address are spelled, so the from-part extraction step tries several
//! shapes in a fixed priority order rather than one fixed grammar.

use std::net::IpAddr;

use super::date::parse_smtp_date;
use crate::{ReceivedFlags, ReceivedHeader, ReceivedProtocol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    From,
    By,
    With,
    For,
    Other,
}

#[derive(Debug, Default)]
struct Part {
    keyword: Option<Keyword>,
    data: String,
    comments: Vec<String>,
}

/// Parses a decoded `Received:` header value into a [`ReceivedHeader`].
///
/// Returns `None` if the value does not open with a `from` part at all —
/// too malformed to interpret as a trace (§4.4 Failure semantics).
pub fn parse_received(value: &str) -> Option<ReceivedHeader> {
    let (parts, date_part) = spill(value)?;

    let mut header = ReceivedHeader::new();

    for part in &parts {
        match part.keyword {
            Some(Keyword::From) => extract_from(part, &mut header),
            Some(Keyword::By) => {
                header.by_hostname = extract_rdns(&part.data).map(str::to_string);
            }
            Some(Keyword::With) => {
                let (protocol, flags) = transport(&part.data);
                header.protocol = protocol;
                header.flags = flags;
            }
            Some(Keyword::For) => {
                let token = part.data.trim();
                let token = token
                    .strip_prefix('<')
                    .and_then(|s| s.strip_suffix('>'))
                    .unwrap_or(token);
                if !token.is_empty() {
                    header.for_mbox = Some(token.to_string());
                }
            }
            Some(Keyword::Other) | None => (),
        }
    }

    if header.real_ip.is_some() && header.from_ip.is_none() {
        header.from_ip = header.real_ip.clone();
    }
    if header.real_hostname.is_some() && header.from_hostname.is_none() {
        header.from_hostname = header.real_hostname.clone();
    }
    if let Some(addr) = header
        .from_ip
        .as_deref()
        .and_then(|ip| ip.parse::<IpAddr>().ok())
    {
        header.addr = Some(addr);
    }
    if let Some(date) = date_part.and_then(|d| parse_smtp_date(d.as_bytes())) {
        header.timestamp = date.to_epoch();
    }

    Some(header)
}

/// Splits a Received value into keyword parts plus the trailing date text,
/// per §4.4 Steps 1-2 (spill and per-part scan combined into a single pass,
/// since a keyword can only be recognized at a part's word boundary).
fn spill(value: &str) -> Option<(Vec<Part>, Option<&str>)> {
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    skip_spaces(bytes, &mut pos);
    let (word, next) = read_word(bytes, pos);
    if !word.eq_ignore_ascii_case("from") {
        return None;
    }
    pos = next;

    let mut parts = Vec::new();
    let mut current = Part {
        keyword: Some(Keyword::From),
        ..Default::default()
    };
    let mut date_part = None;

    loop {
        skip_spaces(bytes, &mut pos);
        if pos >= len {
            break;
        }
        match bytes[pos] {
            b';' => {
                date_part = Some(value[pos + 1..].trim());
                break;
            }
            b'(' => {
                if let Some((comment, next)) = read_comment(bytes, pos) {
                    current.comments.push(comment);
                    pos = next;
                } else {
                    break;
                }
            }
            _ => {
                let (word, next) = read_word(bytes, pos);
                if word.is_empty() {
                    break;
                }
                let keyword = match_keyword(word);
                if matches!(keyword, Some(Keyword::By | Keyword::With | Keyword::For)) {
                    parts.push(std::mem::take(&mut current));
                    current = Part {
                        keyword,
                        ..Default::default()
                    };
                } else {
                    if !current.data.is_empty() {
                        current.data.push(' ');
                    }
                    current.data.push_str(&word.to_ascii_lowercase());
                }
                pos = next;
            }
        }
    }
    parts.push(current);

    Some((parts, date_part))
}

fn match_keyword(word: &str) -> Option<Keyword> {
    if word.eq_ignore_ascii_case("by") {
        Some(Keyword::By)
    } else if word.eq_ignore_ascii_case("with") {
        Some(Keyword::With)
    } else if word.eq_ignore_ascii_case("for") {
        Some(Keyword::For)
    } else if word.eq_ignore_ascii_case("id") || word.eq_ignore_ascii_case("via") {
        Some(Keyword::Other)
    } else {
        None
    }
}

fn skip_spaces(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && matches!(bytes[*pos], b' ' | b'\t' | b'\r' | b'\n') {
        *pos += 1;
    }
}

fn read_word(bytes: &[u8], mut pos: usize) -> (&str, usize) {
    let start = pos;
    while pos < bytes.len() && !matches!(bytes[pos], b' ' | b'\t' | b'\r' | b'\n' | b'(' | b';') {
        pos += 1;
    }
    (std::str::from_utf8(&bytes[start..pos]).unwrap_or(""), pos)
}

/// Reads a balanced parenthesized comment starting at `bytes[pos] == b'('`.
fn read_comment(bytes: &[u8], pos: usize) -> Option<(String, usize)> {
    let mut depth: u32 = 0;
    let mut i = pos;
    let start = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    let text = std::str::from_utf8(&bytes[start..i]).unwrap_or("").trim();
                    return Some((text.to_string(), i + 1));
                }
            }
            b'\\' => i += 1,
            _ => (),
        }
        i += 1;
    }
    None
}

/// §4.4 Step 3: examine the `from` part's comment and data in priority
/// order to recover the real (rDNS-verified) and announced identities.
fn extract_from(part: &Part, header: &mut ReceivedHeader) {
    if let Some(comment) = part.comments.first() {
        if let Some((host, ip)) = split_hostname_bracket_ip(comment) {
            header.real_hostname = Some(host.to_string());
            header.real_ip = Some(ip.to_string());
        } else if let Some(ip) = bare_ip(comment) {
            header.real_ip = Some(ip.to_string());
        }
    }

    let data = part.data.trim();
    if let Some(ip) = data.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        header.from_ip = Some(ip.to_string());
    } else if let Some((host, ip)) = split_hostname_bracket_ip(data) {
        header.from_hostname = Some(host.to_string());
        header.from_ip = Some(ip.to_string());
    } else if data
        .as_bytes()
        .first()
        .is_some_and(u8::is_ascii_hexdigit)
        && data.parse::<IpAddr>().is_ok()
    {
        header.from_ip = Some(data.to_string());
    } else if !data.is_empty() {
        header.from_hostname = Some(data.to_string());
    }
}

/// Matches the `<rdns> [<ip>]` (or `(<ip>)`) shape Postfix/Exim use to
/// report a verified reverse-DNS name next to the raw connecting address.
fn split_hostname_bracket_ip(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let open = text.rfind('[')?;
    let ip = text[open + 1..].strip_suffix(']')?;
    ip.parse::<IpAddr>().ok()?;
    let host = extract_rdns(text[..open].trim())?;
    Some((host, ip))
}

fn bare_ip(text: &str) -> Option<&str> {
    let text = text.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(text);
    inner.parse::<IpAddr>().ok().map(|_| inner)
}

/// §4.4 rDNS extractor: a run of hostname characters, requiring at least
/// one `.` unless the whole span already qualifies.
fn extract_rdns(text: &str) -> Option<&str> {
    let end = text
        .find(|c: char| c == ' ' || c == '\t' || c == '[' || c == '(')
        .unwrap_or(text.len());
    let candidate = &text[..end];
    if candidate.is_empty()
        || !candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return None;
    }
    if candidate.contains('.') || end == text.len() {
        Some(candidate)
    } else {
        None
    }
}

/// §4.4 Step 4 transport table.
fn transport(data: &str) -> (ReceivedProtocol, ReceivedFlags) {
    let token = data.split_whitespace().next().unwrap_or("");
    match token.to_ascii_lowercase().as_str() {
        "smtp" => (ReceivedProtocol::Smtp, ReceivedFlags::default()),
        "esmtp" => (ReceivedProtocol::Esmtp, ReceivedFlags::default()),
        "esmtpa" => (
            ReceivedProtocol::Esmtpa,
            ReceivedFlags {
                authenticated: true,
                ssl: false,
            },
        ),
        "esmtps" => (
            ReceivedProtocol::Esmtps,
            ReceivedFlags {
                authenticated: false,
                ssl: true,
            },
        ),
        "esmtpsa" => (
            ReceivedProtocol::Esmtpsa,
            ReceivedFlags {
                authenticated: true,
                ssl: true,
            },
        ),
        "lmtp" => (ReceivedProtocol::Lmtp, ReceivedFlags::default()),
        "imap" => (ReceivedProtocol::Imap, ReceivedFlags::default()),
        "http" => (ReceivedProtocol::Http, ReceivedFlags::default()),
        "https" => (
            ReceivedProtocol::Http,
            ReceivedFlags {
                authenticated: false,
                ssl: true,
            },
        ),
        "local" => (ReceivedProtocol::Local, ReceivedFlags::default()),
        _ => (ReceivedProtocol::Unknown, ReceivedFlags::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_received;
    use crate::ReceivedProtocol;

    #[test]
    fn postfix_style_with_rdns_comment() {
        let h = parse_received(
            "from mail.example.com (real.example.com [192.0.2.10]) by mx.local with esmtps id abc123 for <bob@local>; Tue, 1 Jul 2003 10:52:37 +0200",
        )
        .unwrap();
        assert_eq!(h.from_hostname.as_deref(), Some("mail.example.com"));
        assert_eq!(h.real_hostname.as_deref(), Some("real.example.com"));
        assert_eq!(h.real_ip.as_deref(), Some("192.0.2.10"));
        assert_eq!(h.from_ip.as_deref(), Some("192.0.2.10"));
        assert_eq!(h.by_hostname.as_deref(), Some("mx.local"));
        assert_eq!(h.protocol, ReceivedProtocol::Esmtps);
        assert!(h.flags.ssl);
        assert_eq!(h.for_mbox.as_deref(), Some("bob@local"));
        let expected = super::parse_smtp_date(b"Tue, 1 Jul 2003 10:52:37 +0200")
            .unwrap()
            .to_epoch();
        assert_eq!(h.timestamp, expected);
    }

    #[test]
    fn bracketed_ip_literal_without_comment() {
        let h = parse_received("from [203.0.113.5] by mx.local with smtp;").unwrap();
        assert_eq!(h.from_ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(h.real_ip, h.from_ip);
        assert_eq!(h.protocol, ReceivedProtocol::Smtp);
    }

    #[test]
    fn raw_ip_without_brackets() {
        let h = parse_received("from 198.51.100.7 by mx.local with esmtpa;").unwrap();
        assert_eq!(h.from_ip.as_deref(), Some("198.51.100.7"));
        assert!(h.flags.authenticated);
        assert_eq!(h.protocol, ReceivedProtocol::Esmtpa);
    }

    #[test]
    fn bare_hostname_with_no_address_info() {
        let h = parse_received("from mail.example.org by mx.local;").unwrap();
        assert_eq!(h.from_hostname.as_deref(), Some("mail.example.org"));
        assert!(h.from_ip.is_none());
    }

    #[test]
    fn missing_from_fails() {
        assert!(parse_received("by mx.local with smtp;").is_none());
    }

    #[test]
    fn unrecognized_transport_is_unknown() {
        let h = parse_received("from host.example.com by mx.local with somethingelse;").unwrap();
        assert_eq!(h.protocol, ReceivedProtocol::Unknown);
    }
}
