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

//! Headers-Hash Finalizer (§4.5): absorbs every header name except
//! `Received` — trace headers are appended by each hop and would make the
//! hash non-reproducible across relays — into a running hash, producing a
//! hex-encoded digest published as `headers_hash`.

use crate::{Header, HeaderName};

pub struct HeaderHasher {
    hasher: blake3::Hasher,
}

impl HeaderHasher {
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
        }
    }

    pub fn update(&mut self, header: &Header<'_>) {
        if matches!(header.name, HeaderName::Received) {
            return;
        }
        self.hasher.update(header.name().to_ascii_lowercase().as_bytes());
    }

    pub fn finalize(&self) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

impl Default for HeaderHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience one-shot entry point over a whole header sequence, in
/// insertion order.
pub fn headers_hash<'x>(headers: impl IntoIterator<Item = &'x Header<'x>>) -> String {
    let mut hasher = HeaderHasher::new();
    for header in headers {
        hasher.update(header);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::headers_hash;
    use crate::{Header, HeaderLineFlags, HeaderName};
    use std::borrow::Cow;

    fn header(name: HeaderName<'static>) -> Header<'static> {
        Header {
            name,
            decoded: Cow::Borrowed(""),
            raw_value: (0, 0),
            flags: HeaderLineFlags::default(),
            offset_field: 0,
            offset_start: 0,
            offset_end: 0,
            order: 0,
        }
    }

    #[test]
    fn same_names_same_hash_regardless_of_value() {
        let a = [header(HeaderName::From), header(HeaderName::Subject)];
        let b = [header(HeaderName::From), header(HeaderName::Subject)];
        assert_eq!(headers_hash(a.iter()), headers_hash(b.iter()));
    }

    #[test]
    fn received_is_excluded() {
        let with_received = [header(HeaderName::From), header(HeaderName::Received)];
        let without = [header(HeaderName::From)];
        assert_eq!(headers_hash(with_received.iter()), headers_hash(without.iter()));
    }

    #[test]
    fn name_case_is_ignored() {
        let lower = [header(HeaderName::Other(Cow::Borrowed("x-custom")))];
        let upper = [header(HeaderName::Other(Cow::Borrowed("X-CUSTOM")))];
        assert_eq!(headers_hash(lower.iter()), headers_hash(upper.iter()));
    }

    #[test]
    fn order_matters() {
        let ab = [header(HeaderName::From), header(HeaderName::To)];
        let ba = [header(HeaderName::To), header(HeaderName::From)];
        assert_ne!(headers_hash(ab.iter()), headers_hash(ba.iter()));
    }
}
