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

//! RFC 5322 address-list parsing (To/Cc/Bcc/From) and the narrower RFC 5321
//! path extraction used for `Return-Path`.
//!
//! Unlike the teacher's `parse_address`, this operates on an already-decoded
//! `&str` (RFC 2047 encoded words have already been expanded by the Header
//! Tokenizer before SFR ever calls this), so the `=?`-sniffing branch the
//! teacher interleaves into its scanner has no counterpart here.

use std::borrow::Cow;

use crate::{Addr, Group, HeaderValue};

#[derive(PartialEq, Clone, Copy, Debug)]
enum AddressState {
    Address,
    Name,
    Quote,
    Comment,
}

struct AddressParser<'x> {
    data: &'x [u8],

    token_start: usize,
    token_end: usize,

    is_token_email: bool,
    is_token_start: bool,
    is_escaped: bool,

    name_tokens: Vec<Cow<'x, str>>,
    mail_tokens: Vec<Cow<'x, str>>,
    comment_tokens: Vec<Cow<'x, str>>,

    state: AddressState,
    state_stack: Vec<AddressState>,

    addresses: Vec<Addr<'x>>,
    group_name: Option<Cow<'x, str>>,
    group_comment: Option<Cow<'x, str>>,
    result: Vec<Group<'x>>,
}

impl<'x> AddressParser<'x> {
    fn add_token(&mut self, add_trail_space: bool) {
        if self.token_start > 0 {
            let token = String::from_utf8_lossy(&self.data[self.token_start - 1..self.token_end]);
            let mut add_space = false;
            let list = match self.state {
                AddressState::Address => &mut self.mail_tokens,
                AddressState::Name => {
                    if self.is_token_email {
                        &mut self.mail_tokens
                    } else {
                        add_space = true;
                        &mut self.name_tokens
                    }
                }
                AddressState::Quote => &mut self.name_tokens,
                AddressState::Comment => {
                    add_space = true;
                    &mut self.comment_tokens
                }
            };

            if add_space && !list.is_empty() {
                list.push(" ".into());
            }

            list.push(token);

            if add_trail_space {
                list.push(" ".into());
            }

            self.token_start = 0;
            self.is_token_email = false;
            self.is_token_start = true;
            self.is_escaped = false;
        }
    }

    fn add_address(&mut self) {
        let has_mail = !self.mail_tokens.is_empty();
        let has_name = !self.name_tokens.is_empty();
        let has_comment = !self.comment_tokens.is_empty();

        self.addresses.push(if has_mail && has_name && has_comment {
            Addr {
                name: Some(
                    format!(
                        "{} ({})",
                        concat_tokens(&mut self.name_tokens),
                        concat_tokens(&mut self.comment_tokens)
                    )
                    .into(),
                ),
                address: concat_tokens(&mut self.mail_tokens).into(),
            }
        } else if has_name && has_mail {
            Addr {
                name: concat_tokens(&mut self.name_tokens).into(),
                address: concat_tokens(&mut self.mail_tokens).into(),
            }
        } else if has_mail && has_comment {
            Addr {
                name: concat_tokens(&mut self.comment_tokens).into(),
                address: concat_tokens(&mut self.mail_tokens).into(),
            }
        } else if has_mail {
            Addr {
                name: None,
                address: concat_tokens(&mut self.mail_tokens).into(),
            }
        } else if has_name && has_comment {
            Addr {
                name: concat_tokens(&mut self.comment_tokens).into(),
                address: concat_tokens(&mut self.name_tokens).into(),
            }
        } else if has_name {
            Addr {
                name: concat_tokens(&mut self.name_tokens).into(),
                address: None,
            }
        } else if has_comment {
            Addr {
                name: concat_tokens(&mut self.comment_tokens).into(),
                address: None,
            }
        } else {
            return;
        });
    }

    fn add_group_details(&mut self) {
        if !self.name_tokens.is_empty() {
            self.group_name = concat_tokens(&mut self.name_tokens).into();
        }

        if !self.comment_tokens.is_empty() {
            self.group_comment = concat_tokens(&mut self.comment_tokens).into();
        }

        if !self.mail_tokens.is_empty() {
            if self.group_name.is_none() {
                self.group_name = concat_tokens(&mut self.mail_tokens).into();
            } else {
                self.group_name = Some(
                    (self.group_name.as_ref().unwrap().as_ref().to_owned()
                        + " "
                        + concat_tokens(&mut self.mail_tokens).as_ref())
                    .into(),
                );
            }
        }
    }

    fn add_group(&mut self) {
        let has_name = self.group_name.is_some();
        let has_comment = self.group_comment.is_some();
        let has_addresses = !self.addresses.is_empty();

        self.result
            .push(if has_name && has_addresses && has_comment {
                Group {
                    name: Some(
                        format!(
                            "{} ({})",
                            self.group_name.take().unwrap(),
                            self.group_comment.take().unwrap()
                        )
                        .into(),
                    ),
                    addresses: std::mem::take(&mut self.addresses),
                }
            } else if has_addresses && has_name {
                Group {
                    name: self.group_name.take(),
                    addresses: std::mem::take(&mut self.addresses),
                }
            } else if has_addresses {
                Group {
                    name: self.group_comment.take(),
                    addresses: std::mem::take(&mut self.addresses),
                }
            } else if has_name {
                Group {
                    name: self.group_name.take(),
                    addresses: Vec::new(),
                }
            } else {
                return;
            });
    }
}

/// RFC 5322 address-list extraction (§6 `parse_email_addresses_mime`):
/// handles bare mailboxes, `"Display Name" <addr>` forms, comments and
/// named groups (`Group: a@b, c@d;`).
///
/// Takes the decoded value by-value: when it is the Tokenizer's zero-copy
/// `Cow::Borrowed` fast path, addresses are sliced straight out of the
/// original buffer; when the Tokenizer already had to allocate (folding or
/// an encoded word), the result is owned too — there's no buffer left to
/// borrow from past this call.
pub fn parse_email_addresses_mime(text: Cow<'_, str>) -> HeaderValue<'_> {
    match text {
        Cow::Borrowed(s) => parse_mime_str(s),
        Cow::Owned(s) => parse_mime_str(&s).into_owned(),
    }
}

fn parse_mime_str(text: &str) -> HeaderValue<'_> {
    let data = text.as_bytes();
    let mut parser = AddressParser {
        data,
        token_start: 0,
        token_end: 0,

        is_token_email: false,
        is_token_start: true,
        is_escaped: false,

        name_tokens: Vec::with_capacity(3),
        mail_tokens: Vec::with_capacity(3),
        comment_tokens: Vec::with_capacity(3),

        state: AddressState::Name,
        state_stack: Vec::with_capacity(5),

        addresses: Vec::new(),
        group_name: None,
        group_comment: None,
        result: Vec::new(),
    };

    let len = data.len();
    let mut pos = 0usize;

    while pos < len {
        let ch = data[pos];
        pos += 1;

        match ch {
            b'\n' => break,
            b'\\' if parser.state != AddressState::Name && !parser.is_escaped => {
                if parser.token_start > 0 {
                    if parser.state == AddressState::Quote {
                        parser.token_end = pos - 1;
                    }
                    parser.add_token(false);
                }
                parser.is_escaped = true;
                continue;
            }
            b',' if parser.state == AddressState::Name => {
                parser.add_token(false);
                parser.add_address();
                continue;
            }
            b'<' if parser.state == AddressState::Name => {
                parser.is_token_email = false;
                parser.add_token(false);
                parser.state_stack.push(AddressState::Name);
                parser.state = AddressState::Address;
                continue;
            }
            b'>' if parser.state == AddressState::Address => {
                parser.add_token(false);
                parser.state = parser.state_stack.pop().unwrap_or(AddressState::Name);
                continue;
            }
            b'"' if !parser.is_escaped => match parser.state {
                AddressState::Name => {
                    parser.state_stack.push(AddressState::Name);
                    parser.state = AddressState::Quote;
                    parser.add_token(false);
                    continue;
                }
                AddressState::Quote => {
                    parser.add_token(false);
                    parser.state = parser.state_stack.pop().unwrap_or(AddressState::Name);
                    continue;
                }
                _ => (),
            },
            b'@' if parser.state == AddressState::Name => {
                parser.is_token_email = true;
            }
            b' ' | b'\t' => {
                if !parser.is_token_start {
                    parser.is_token_start = true;
                }
                if parser.is_escaped {
                    parser.is_escaped = false;
                }
                if parser.state == AddressState::Quote {
                    if parser.token_start == 0 {
                        parser.token_start = pos;
                        parser.token_end = parser.token_start;
                    } else {
                        parser.token_end = pos;
                    }
                }
                continue;
            }
            b'\r' => continue,
            b'(' if parser.state != AddressState::Quote && !parser.is_escaped => {
                parser.state_stack.push(parser.state);
                if parser.state != AddressState::Comment {
                    parser.add_token(false);
                    parser.state = AddressState::Comment;
                    continue;
                }
            }
            b')' if parser.state == AddressState::Comment && !parser.is_escaped => {
                let new_state = parser.state_stack.pop().unwrap_or(AddressState::Name);
                if parser.state != new_state {
                    parser.add_token(false);
                    parser.state = new_state;
                    continue;
                }
            }
            b':' if parser.state == AddressState::Name && !parser.is_escaped => {
                parser.add_group();
                parser.add_token(false);
                parser.add_group_details();
                continue;
            }
            b';' if parser.state == AddressState::Name => {
                parser.add_token(false);
                parser.add_address();
                parser.add_group();
                continue;
            }
            _ => (),
        }

        if parser.is_escaped {
            parser.is_escaped = false;
        }
        if parser.is_token_start {
            parser.is_token_start = false;
        }
        if parser.token_start == 0 {
            parser.token_start = pos;
            parser.token_end = parser.token_start;
        } else {
            parser.token_end = pos;
        }
    }

    parser.add_address();

    if parser.group_name.is_some() || !parser.result.is_empty() {
        parser.add_group();
        if parser.result.len() == 1 && parser.result[0].name.is_none() {
            HeaderValue::AddressList(parser.result.pop().unwrap().addresses)
        } else {
            HeaderValue::GroupList(parser.result)
        }
    } else {
        match parser.addresses.len() {
            0 => HeaderValue::Empty,
            1 => HeaderValue::Address(parser.addresses.pop().unwrap()),
            _ => HeaderValue::AddressList(parser.addresses),
        }
    }
}

/// RFC 5321 path extraction for `Return-Path` (§6
/// `parse_email_address_smtp`): an angle-bracketed address with no display
/// name and no group structure, e.g. `<bounce@example.com>` or the empty
/// `<>` null reverse-path.
pub fn parse_email_address_smtp(text: Cow<'_, str>) -> Option<Addr<'_>> {
    match text {
        Cow::Borrowed(s) => {
            let inner = s.trim().strip_prefix('<').and_then(|s| s.strip_suffix('>'))?;
            let inner = inner.trim();
            (!inner.is_empty()).then(|| Addr {
                name: None,
                address: Some(Cow::Borrowed(inner)),
            })
        }
        Cow::Owned(s) => {
            let inner = s.trim().strip_prefix('<').and_then(|s| s.strip_suffix('>'))?;
            let inner = inner.trim();
            (!inner.is_empty()).then(|| Addr {
                name: None,
                address: Some(Cow::Owned(inner.to_string())),
            })
        }
    }
}

fn concat_tokens<'x>(tokens: &mut Vec<Cow<'x, str>>) -> Cow<'x, str> {
    if tokens.len() == 1 {
        tokens.pop().unwrap()
    } else {
        let result = tokens.concat();
        tokens.clear();
        result.into()
    }
}

pub fn parse_address_local_part(addr: &str) -> Option<&str> {
    let bytes = addr.as_bytes();
    let mut iter = bytes.iter().enumerate();
    while let Some((pos, &ch)) = iter.next() {
        if ch == b'@' {
            return if pos > 0 && iter.next().is_some() {
                std::str::from_utf8(bytes.get(..pos)?).ok()
            } else {
                None
            };
        } else if !ch.is_ascii() {
            return None;
        }
    }
    None
}

pub fn parse_address_domain(addr: &str) -> Option<&str> {
    let bytes = addr.as_bytes();
    for (pos, &ch) in bytes.iter().enumerate() {
        if ch == b'@' {
            return if pos > 0 && pos + 1 < bytes.len() {
                std::str::from_utf8(bytes.get(pos + 1..)?).ok()
            } else {
                None
            };
        } else if !ch.is_ascii() {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{parse_email_address_smtp, parse_email_addresses_mime};
    use crate::HeaderValue;
    use std::borrow::Cow;

    #[test]
    fn single_bare_mailbox() {
        match parse_email_addresses_mime(Cow::Borrowed("jdoe@example.com")) {
            HeaderValue::Address(a) => assert_eq!(a.address(), Some("jdoe@example.com")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn display_name_and_mailbox() {
        match parse_email_addresses_mime(Cow::Borrowed("John Doe <jdoe@example.com>")) {
            HeaderValue::Address(a) => {
                assert_eq!(a.name(), Some("John Doe"));
                assert_eq!(a.address(), Some("jdoe@example.com"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn quoted_display_name_list() {
        match parse_email_addresses_mime(Cow::Borrowed(
            "\"Doe, John\" <jdoe@example.com>, jane@example.com",
        )) {
            HeaderValue::AddressList(list) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list[0].name(), Some("Doe, John"));
                assert_eq!(list[1].address(), Some("jane@example.com"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn named_group() {
        match parse_email_addresses_mime(Cow::Borrowed("Undisclosed: a@b, c@d;")) {
            HeaderValue::AddressList(list) => {
                assert_eq!(list.len(), 2);
            }
            HeaderValue::GroupList(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].name(), Some("Undisclosed"));
                assert_eq!(groups[0].addresses.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn smtp_path_strips_brackets() {
        let addr = parse_email_address_smtp(Cow::Borrowed("<bounce@example.com>")).unwrap();
        assert_eq!(addr.address(), Some("bounce@example.com"));
        assert!(addr.name().is_none());
    }

    #[test]
    fn smtp_null_path_is_none() {
        assert!(parse_email_address_smtp(Cow::Borrowed("<>")).is_none());
    }
}
