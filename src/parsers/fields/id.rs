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

//! `Message-ID` sanitization (§4.3, §10.5): strip one leading `<` and one
//! trailing `>`, then replace any remaining non-graphic, non-space ASCII
//! byte with `?`, matching `rspamd_mime_header_check_special`'s exact
//! substitution rule.

use std::borrow::Cow;

fn strip_brackets(s: &str) -> &str {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix('<').unwrap_or(trimmed);
    stripped.strip_suffix('>').unwrap_or(stripped)
}

fn needs_sanitizing(s: &str) -> bool {
    !s.bytes().all(|b| !b.is_ascii() || b.is_ascii_graphic() || b == b' ')
}

fn sanitize_str(s: &str) -> String {
    let mut owned = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() && !(c.is_ascii_graphic() || c == ' ') {
            owned.push('?');
        } else {
            owned.push(c);
        }
    }
    owned
}

/// Takes the decoded value by-value rather than `&str` so the `Borrowed`
/// case can hand back a slice of the *original* buffer instead of one
/// scoped to this call — SFR runs after the Header Tokenizer has already
/// produced a `Cow<'x, str>` per header, and only a by-value match lets the
/// `'x` lifetime survive the trip through this function.
pub fn sanitize_message_id(text: Cow<'_, str>) -> Cow<'_, str> {
    match text {
        Cow::Borrowed(s) => {
            let stripped = strip_brackets(s);
            if needs_sanitizing(stripped) {
                Cow::Owned(sanitize_str(stripped))
            } else {
                Cow::Borrowed(stripped)
            }
        }
        Cow::Owned(s) => {
            let stripped = strip_brackets(&s);
            if needs_sanitizing(stripped) {
                Cow::Owned(sanitize_str(stripped))
            } else {
                Cow::Owned(stripped.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_message_id;
    use std::borrow::Cow;

    #[test]
    fn strips_angle_brackets() {
        assert_eq!(
            sanitize_message_id(Cow::Borrowed("<1234.5678@example.com>")),
            "1234.5678@example.com"
        );
    }

    #[test]
    fn missing_brackets_pass_through() {
        assert_eq!(
            sanitize_message_id(Cow::Borrowed("bare-id@example.com")),
            "bare-id@example.com"
        );
    }

    #[test]
    fn control_bytes_become_question_marks() {
        assert_eq!(
            sanitize_message_id(Cow::Borrowed("<a\x01b@example.com>")),
            "a?b@example.com"
        );
    }
}
