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

//! # mail-header-core
//!
//! _mail-header-core_ parses the RFC 5322 header block of an e-mail message
//! into a structured, ordered header table: it unfolds continuation lines,
//! decodes RFC 2047 `=?charset?enc?text?=` encoded words, recognizes the
//! well-known header names and extracts their semantic content (addresses,
//! message identifiers, SMTP `Received:` trace metadata), and finalizes a
//! hash over the header names for downstream use.
//!
//! It deliberately stops at the header layer: MIME body parsing, DKIM/ARC
//! verification, delivery and policy evaluation all live above this crate.
//!
//! Like the library this one grew out of, it is zero-copy wherever
//! possible: values that need no transformation borrow directly from the
//! input buffer as `Cow<str>`, and only allocate when folding, decoding or
//! case-normalization actually rewrites bytes. Parsing never fails outright;
//! malformed input degrades according to [`ParseFlags`] instead of
//! propagating an error.
//!
//! ## Supported character sets
//!
//! All Unicode (UTF-*) and single-byte character sets are handled
//! internally; legacy multi-byte encodings (Shift-JIS, Big5, EUC-JP, EUC-KR,
//! ISO-2022-JP, GBK, GB18030) are decoded via the optional
//! [encoding_rs](https://crates.io/crates/encoding_rs) dependency, enabled
//! by the `full_encoding` feature (on by default).

#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::{Hash, Hasher as StdHasher};

pub mod core;
pub mod decoders;
pub mod hash;
pub mod parsers;

pub use core::builder::HeaderParser;

/// One `Name: Value` line (possibly folded) from the header block.
///
/// `raw` spans the header from the first byte of its name through the last
/// byte of its (possibly multi-line) value, excluding the terminating
/// newline of the final line — this is what [`hash::HeaderHasher`] and any
/// downstream signature verifier need byte-exact access to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header<'x> {
    pub name: HeaderName<'x>,
    /// The decoded UTF-8 value: unfolded, NUL-elided, RFC 2047-decoded.
    /// Always valid UTF-8 — invalid byte sequences are replaced by U+FFFD
    /// on the way in (§3, §4.2 state 4).
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub decoded: Cow<'x, str>,
    /// Byte range of the raw, still-folded value (between `:` and the
    /// terminating newline), kept alongside `decoded` per Design Note (a):
    /// some callers need the exact wire bytes as well as the decoded form.
    pub raw_value: (usize, usize),
    pub flags: HeaderLineFlags,
    /// Position in the header block at which parsing of this header began
    /// (the first byte of the name).
    pub offset_field: usize,
    pub offset_start: usize,
    pub offset_end: usize,
    /// Insertion order, dense in `[0, header_count)`.
    pub order: usize,
}

/// Flags recorded while tokenizing a single header line (§4.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderLineFlags {
    pub tab_separated: bool,
    pub empty_separator: bool,
}

impl<'x> Header<'x> {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn value(&self) -> &str {
        self.decoded.as_ref()
    }

    pub fn into_owned(self) -> Header<'static> {
        Header {
            name: self.name.into_owned(),
            decoded: self.decoded.into_owned().into(),
            raw_value: self.raw_value,
            flags: self.flags,
            offset_field: self.offset_field,
            offset_start: self.offset_start,
            offset_end: self.offset_end,
            order: self.order,
        }
    }
}

/// The well-known header names the Special-Field Recognizer dispatches on
/// (§4.3), plus every other header preserved verbatim under `Other`.
///
/// This intentionally does not enumerate the full MIME header set a
/// general-purpose message parser would need — this crate stops at the
/// header layer, so only the names SFR or the Header Tokenizer itself cares
/// about get a dedicated variant.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderName<'x> {
    From,
    To,
    Cc,
    Bcc,
    Subject,
    MessageId,
    ReturnPath,
    DeliveredTo,
    Received,
    Date,
    Sender,
    InReplyTo,
    ContentType,
    ContentTransferEncoding,
    References,
    #[cfg_attr(feature = "serde", serde(borrow))]
    Other(Cow<'x, str>),
}

impl<'x> HeaderName<'x> {
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::From => "from",
            HeaderName::To => "to",
            HeaderName::Cc => "cc",
            HeaderName::Bcc => "bcc",
            HeaderName::Subject => "subject",
            HeaderName::MessageId => "message-id",
            HeaderName::ReturnPath => "return-path",
            HeaderName::DeliveredTo => "delivered-to",
            HeaderName::Received => "received",
            HeaderName::Date => "date",
            HeaderName::Sender => "sender",
            HeaderName::InReplyTo => "in-reply-to",
            HeaderName::ContentType => "content-type",
            HeaderName::ContentTransferEncoding => "content-transfer-encoding",
            HeaderName::References => "references",
            HeaderName::Other(name) => name.as_ref(),
        }
    }

    pub fn into_owned(self) -> HeaderName<'static> {
        match self {
            HeaderName::Other(name) => HeaderName::Other(name.into_owned().into()),
            HeaderName::From => HeaderName::From,
            HeaderName::To => HeaderName::To,
            HeaderName::Cc => HeaderName::Cc,
            HeaderName::Bcc => HeaderName::Bcc,
            HeaderName::Subject => HeaderName::Subject,
            HeaderName::MessageId => HeaderName::MessageId,
            HeaderName::ReturnPath => HeaderName::ReturnPath,
            HeaderName::DeliveredTo => HeaderName::DeliveredTo,
            HeaderName::Received => HeaderName::Received,
            HeaderName::Date => HeaderName::Date,
            HeaderName::Sender => HeaderName::Sender,
            HeaderName::InReplyTo => HeaderName::InReplyTo,
            HeaderName::ContentType => HeaderName::ContentType,
            HeaderName::ContentTransferEncoding => HeaderName::ContentTransferEncoding,
            HeaderName::References => HeaderName::References,
        }
    }

    /// True for headers RFC 5322 permits at most one of — a hint for
    /// downstream validators; the Tokenizer stores every occurrence
    /// regardless (§4.3).
    pub fn is_unique(&self) -> bool {
        !matches!(self, HeaderName::Other(_))
    }
}

impl PartialEq for HeaderName<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HeaderName::Other(a), HeaderName::Other(b)) => a.eq_ignore_ascii_case(b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Hash for HeaderName<'_> {
    fn hash<H: StdHasher>(&self, state: &mut H) {
        match self {
            HeaderName::Other(name) => {
                for b in name.as_bytes() {
                    b.to_ascii_lowercase().hash(state);
                }
            }
            _ => self.as_str().hash(state),
        }
    }
}

/// Structured value produced by a field parser (`parsers::fields`) from a
/// [`Header::decoded`] string — the common return shape the Special-Field
/// Recognizer matches on to fill in [`ParseResult`]'s typed slots (§4.3).
/// Not stored on `Header` itself: the header's own value is always the
/// plain decoded text per §3.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderValue<'x> {
    Address(Addr<'x>),
    AddressList(Vec<Addr<'x>>),
    Group(Group<'x>),
    GroupList(Vec<Group<'x>>),
    #[cfg_attr(feature = "serde", serde(borrow))]
    Text(Cow<'x, str>),
    TextList(Vec<Cow<'x, str>>),
    DateTime(DateTime),
    Empty,
}

impl<'x> Default for HeaderValue<'x> {
    fn default() -> Self {
        HeaderValue::Empty
    }
}

impl<'x> HeaderValue<'x> {
    pub fn is_empty(&self) -> bool {
        matches!(self, HeaderValue::Empty)
    }

    pub fn unwrap_text(self) -> Cow<'x, str> {
        match self {
            HeaderValue::Text(s) => s,
            _ => panic!("HeaderValue::unwrap_text called on non-Text value"),
        }
    }

    pub fn into_text_list(self) -> Option<Vec<Cow<'x, str>>> {
        match self {
            HeaderValue::Text(s) => Some(vec![s]),
            HeaderValue::TextList(l) => Some(l),
            HeaderValue::Empty => None,
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s.as_ref()),
            HeaderValue::TextList(l) => l.last().map(|s| s.as_ref()),
            _ => None,
        }
    }

    pub fn unwrap_address(self) -> Vec<Addr<'x>> {
        match self {
            HeaderValue::Address(a) => vec![a],
            HeaderValue::AddressList(l) => l,
            HeaderValue::Group(g) => g.addresses,
            HeaderValue::GroupList(l) => l.into_iter().flat_map(|g| g.addresses).collect(),
            _ => Vec::new(),
        }
    }

    pub fn into_owned(self) -> HeaderValue<'static> {
        match self {
            HeaderValue::Address(a) => HeaderValue::Address(a.into_owned()),
            HeaderValue::AddressList(l) => {
                HeaderValue::AddressList(l.into_iter().map(Addr::into_owned).collect())
            }
            HeaderValue::Group(g) => HeaderValue::Group(g.into_owned()),
            HeaderValue::GroupList(l) => {
                HeaderValue::GroupList(l.into_iter().map(Group::into_owned).collect())
            }
            HeaderValue::Text(s) => HeaderValue::Text(s.into_owned().into()),
            HeaderValue::TextList(l) => {
                HeaderValue::TextList(l.into_iter().map(|s| s.into_owned().into()).collect())
            }
            HeaderValue::DateTime(d) => HeaderValue::DateTime(d),
            HeaderValue::Empty => HeaderValue::Empty,
        }
    }
}

/// A single mailbox: an optional display name and an optional address
/// string. Grounded on the teacher's own `Addr` (`core/address.rs`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Addr<'x> {
    #[cfg_attr(feature = "serde", serde(default, borrow))]
    pub name: Option<Cow<'x, str>>,
    #[cfg_attr(feature = "serde", serde(default, borrow))]
    pub address: Option<Cow<'x, str>>,
}

impl<'x> Addr<'x> {
    pub fn new(name: Option<&'x str>, address: &'x str) -> Self {
        Self {
            name: name.map(Cow::Borrowed),
            address: Some(Cow::Borrowed(address)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn into_owned(self) -> Addr<'static> {
        Addr {
            name: self.name.map(|s| Cow::Owned(s.into_owned())),
            address: self.address.map(|s| Cow::Owned(s.into_owned())),
        }
    }
}

/// A named group of mailboxes, e.g. `Undisclosed-Recipients: a@b, c@d;`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group<'x> {
    #[cfg_attr(feature = "serde", serde(default, borrow))]
    pub name: Option<Cow<'x, str>>,
    pub addresses: Vec<Addr<'x>>,
}

impl<'x> Group<'x> {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn into_owned(self) -> Group<'static> {
        Group {
            name: self.name.map(|s| Cow::Owned(s.into_owned())),
            addresses: self.addresses.into_iter().map(Addr::into_owned).collect(),
        }
    }
}

/// RFC 5322 §3.3 date-time, already broken into fields plus an epoch-second
/// form for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub tz_before_gmt: bool,
    pub tz_hour: u8,
    pub tz_minute: u8,
}

impl DateTime {
    /// Seconds since the Unix epoch, or `i64::MIN` if this value could not
    /// be parsed into a calendar date at all (the sentinel §4.4/§6 refer to
    /// as `timestamp`'s failure case).
    pub fn to_epoch(&self) -> i64 {
        if self.year == 0 {
            return i64::MIN;
        }
        let days = days_since_epoch(self.year as i64, self.month as i64, self.day as i64);
        let mut secs = days * 86400
            + self.hour as i64 * 3600
            + self.minute as i64 * 60
            + self.second as i64;
        let tz_offset = self.tz_hour as i64 * 3600 + self.tz_minute as i64 * 60;
        secs -= if self.tz_before_gmt {
            -tz_offset
        } else {
            tz_offset
        };
        secs
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_since_epoch(year: i64, month: i64, day: i64) -> i64 {
    const DAYS_IN_MONTH: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut days: i64 = 0;
    if year >= 1970 {
        for y in 1970..year {
            days += if is_leap_year(y) { 366 } else { 365 };
        }
    } else {
        for y in year..1970 {
            days -= if is_leap_year(y) { 366 } else { 365 };
        }
    }
    for m in 0..(month - 1).max(0) {
        days += DAYS_IN_MONTH[m as usize];
        if m == 1 && is_leap_year(year) {
            days += 1;
        }
    }
    days + (day - 1)
}

/// The SMTP transport variant announced by a Received header's `with` part
/// (§4.4, Step 4 transport table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceivedProtocol {
    #[default]
    Unknown,
    Smtp,
    Esmtp,
    Esmtpa,
    Esmtps,
    Esmtpsa,
    Lmtp,
    Imap,
    Http,
    Local,
}

/// Flags set by the `with` transport table (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceivedFlags {
    pub authenticated: bool,
    pub ssl: bool,
}

/// A parsed `Received:` header (§3 `ReceivedHeader`, §4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceivedHeader {
    pub protocol: ReceivedProtocol,
    pub flags: ReceivedFlags,
    pub real_ip: Option<String>,
    pub from_ip: Option<String>,
    pub addr: Option<std::net::IpAddr>,
    pub real_hostname: Option<String>,
    pub from_hostname: Option<String>,
    pub by_hostname: Option<String>,
    pub for_mbox: Option<String>,
    pub timestamp: i64,
}

impl ReceivedHeader {
    pub fn new() -> Self {
        Self {
            timestamp: i64::MIN,
            ..Default::default()
        }
    }
}

/// Dominant newline style observed while tokenizing the header block
/// (§4.2, newline-majority vote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NewlineStyle {
    #[default]
    Lf,
    Cr,
    CrLf,
}

/// Task-level flags raised during parsing (§7). Never a hard failure —
/// these are the only externally observable side channel for malformed
/// input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseFlags {
    pub broken_headers: bool,
    pub bad_unicode: bool,
}

/// Two synchronized views over the same `Header` objects (§3 `Header Table`):
/// a per-name index preserving arrival order, and the global arrival-order
/// sequence.
#[derive(Debug, Clone, Default)]
pub struct HeaderTable<'x> {
    by_name: HashMap<String, Vec<usize>>,
    headers: Vec<Header<'x>>,
}

impl<'x> HeaderTable<'x> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, header: Header<'x>) {
        let key = header.name.as_str().to_ascii_lowercase();
        self.by_name.entry(key).or_default().push(self.headers.len());
        self.headers.push(header);
    }

    /// The global, wire-arrival-order sequence of headers.
    pub fn headers(&self) -> &[Header<'x>] {
        &self.headers
    }

    /// All occurrences of `name` (case-insensitive), in arrival order.
    pub fn get_all(&self, name: &str) -> impl Iterator<Item = &Header<'x>> {
        let key = name.to_ascii_lowercase();
        self.by_name
            .get(&key)
            .into_iter()
            .flat_map(move |idxs| idxs.iter().map(move |&i| &self.headers[i]))
    }

    /// The first occurrence of `name` (case-insensitive), matching the
    /// "first occurrence wins" contract SFR uses for UNIQUE fields.
    pub fn get_first(&self, name: &str) -> Option<&Header<'x>> {
        self.get_all(name).next()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Task-level attributes set by SFR while walking the Header Table (§6):
/// the externally observable artifacts beyond the Header Table and the
/// Received list themselves.
#[derive(Debug, Clone, Default)]
pub struct ParseResult<'x> {
    pub headers: HeaderTable<'x>,
    pub received: Vec<ReceivedHeader>,
    pub subject: Option<Cow<'x, str>>,
    pub message_id: Option<Cow<'x, str>>,
    pub from_mime: Option<Vec<Addr<'x>>>,
    pub rcpt_mime: Vec<Addr<'x>>,
    pub from_envelope: Option<Addr<'x>>,
    pub deliver_to: Option<Cow<'x, str>>,
    pub nlines_type: Option<NewlineStyle>,
    pub headers_hash: Option<String>,
    pub flags: ParseFlags,
}
