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

//! Entry point and configuration surface (§10.3).
//!
//! A full MIME parser's builder controls which of its many field parsers run
//! on which header name. This core stops at the header layer, so there is
//! only one dispatch table (the Special-Field Recognizer, §4.3) and it isn't
//! user-configurable — what's left to toggle is whether the three optional
//! passes around it run at all: newline-style counting (§4.2), the
//! Headers-Hash Finalizer (§4.5), and SFR itself.

use crate::{
    hash::HeaderHasher,
    parsers::{
        fields::{address, id, received},
        header,
    },
    Header, HeaderName, ParseResult,
};

/// Builder for a single header-block parse.
///
/// All three passes run by default; a caller doing pure tokenization (for
/// example, a signature verifier that only needs the raw `Header` list) can
/// turn any of them off to skip the work.
#[derive(Debug, Clone, Copy)]
pub struct HeaderParser {
    count_newlines: bool,
    compute_hash: bool,
    run_sfr: bool,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            count_newlines: true,
            compute_hash: true,
            run_sfr: true,
        }
    }

    /// Skip the newline-majority vote (§4.2) — `ParseResult::nlines_type`
    /// stays `None`.
    pub fn without_newline_counting(mut self) -> Self {
        self.count_newlines = false;
        self
    }

    /// Skip the Headers-Hash Finalizer (§4.5) — `ParseResult::headers_hash`
    /// stays `None`.
    pub fn without_hash(mut self) -> Self {
        self.compute_hash = false;
        self
    }

    /// Skip the Special-Field Recognizer (§4.3) entirely: only the Header
    /// Table is populated, none of `received`/`subject`/`message_id`/…
    pub fn without_sfr(mut self) -> Self {
        self.run_sfr = false;
        self
    }

    /// Tokenizes `data`, optionally running SFR and the Headers-Hash
    /// Finalizer over the result, per this builder's settings.
    pub fn parse<'x>(&self, data: &'x [u8]) -> ParseResult<'x> {
        let tokenized = header::tokenize(data, self.count_newlines);
        let mut result = ParseResult {
            flags: tokenized.flags,
            nlines_type: tokenized.nlines_type,
            ..Default::default()
        };

        let mut hasher = self.compute_hash.then(HeaderHasher::new);

        for header in tokenized.headers {
            if let Some(hasher) = hasher.as_mut() {
                hasher.update(&header);
            }
            if self.run_sfr {
                apply_sfr(&mut result, &header);
            }
            result.headers.push(header);
        }

        if let Some(hasher) = hasher {
            result.headers_hash = Some(hasher.finalize());
        }

        result
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Special-Field Recognizer dispatch table (§4.3): for each well-known
/// header, extracts its structured value into the matching `ParseResult`
/// slot. `Other` headers and the `UNIQUE`-tagged-but-unextracted names
/// (`Date`, `Sender`, `In-Reply-To`, `Content-Type`,
/// `Content-Transfer-Encoding`, `References`) fall through untouched — their
/// decoded text is still reachable via the Header Table.
///
/// Takes `header.decoded` by way of `Cow::clone()` rather than `&str`: a
/// clone of a `Cow` copies the enum, not the bytes (for the `Borrowed` case
/// it's just copying a reference), so each field parser below still gets a
/// value honoring the Header Tokenizer's zero-copy fast path.
fn apply_sfr<'x>(result: &mut ParseResult<'x>, header: &Header<'x>) {
    match &header.name {
        HeaderName::Received => {
            if let Some(rh) = received::parse_received(header.decoded.as_ref()) {
                result.received.push(rh);
            }
        }
        HeaderName::To | HeaderName::Cc | HeaderName::Bcc => {
            result
                .rcpt_mime
                .extend(address::parse_email_addresses_mime(header.decoded.clone()).unwrap_address());
        }
        HeaderName::From => {
            if result.from_mime.is_none() {
                result.from_mime = Some(
                    address::parse_email_addresses_mime(header.decoded.clone()).unwrap_address(),
                );
            }
        }
        HeaderName::MessageId => {
            if result.message_id.is_none() {
                result.message_id = Some(id::sanitize_message_id(header.decoded.clone()));
            }
        }
        HeaderName::Subject => {
            if result.subject.is_none() {
                result.subject = Some(header.decoded.clone());
            }
        }
        HeaderName::ReturnPath => {
            if result.from_envelope.is_none() {
                result.from_envelope = address::parse_email_address_smtp(header.decoded.clone());
            }
        }
        HeaderName::DeliveredTo => {
            if result.deliver_to.is_none() {
                result.deliver_to = Some(header.decoded.clone());
            }
        }
        HeaderName::Date
        | HeaderName::Sender
        | HeaderName::InReplyTo
        | HeaderName::ContentType
        | HeaderName::ContentTransferEncoding
        | HeaderName::References
        | HeaderName::Other(_) => (),
    }
}

#[cfg(test)]
mod tests {
    use super::HeaderParser;

    #[test]
    fn extracts_well_known_fields() {
        let data: &[u8] = concat!(
            "From: \"Jane Doe\" <jane@example.com>\r\n",
            "To: a@example.com, b@example.com\r\n",
            "Subject: =?utf-8?q?hi?=\r\n",
            "Message-ID: <123@example.com>\r\n",
            "Return-Path: <bounce@example.com>\r\n",
            "Received: from a.example.com (a.example.com [192.0.2.1])\r\n",
            " by b.example.com with ESMTP; 1 Jan 2020 00:00:00 +0000\r\n",
            "\r\nbody",
        )
        .as_bytes();
        let result = HeaderParser::new().parse(data);

        assert_eq!(result.subject.as_deref(), Some("hi"));
        assert_eq!(result.message_id.as_deref(), Some("123@example.com"));
        assert_eq!(
            result.from_mime.as_ref().unwrap()[0].address(),
            Some("jane@example.com")
        );
        assert_eq!(result.rcpt_mime.len(), 2);
        assert_eq!(
            result.from_envelope.as_ref().unwrap().address(),
            Some("bounce@example.com")
        );
        assert_eq!(result.received.len(), 1);
        assert!(result.headers_hash.is_some());
        assert_eq!(result.headers.len(), 6);
    }

    #[test]
    fn without_sfr_only_populates_header_table() {
        let data = b"Subject: hi\r\n\r\n";
        let result = HeaderParser::new().without_sfr().parse(data);
        assert!(result.subject.is_none());
        assert_eq!(result.headers.len(), 1);
    }

    #[test]
    fn without_hash_leaves_headers_hash_none() {
        let data = b"Subject: hi\r\n\r\n";
        let result = HeaderParser::new().without_hash().parse(data);
        assert!(result.headers_hash.is_none());
    }

    #[test]
    fn first_occurrence_wins_for_unique_fields() {
        let data = b"Subject: first\r\nSubject: second\r\n\r\n";
        let result = HeaderParser::new().parse(data);
        assert_eq!(result.subject.as_deref(), Some("first"));
    }
}
