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

//! Legacy single-byte charset decoders.
//!
//! Every label here (besides `ibm850`) is a WHATWG-registered legacy
//! encoding, so the actual conversion table lives in `encoding_rs` — the
//! same dependency `multi_byte.rs` already uses for the multi-byte sets,
//! gated the same way behind `full_encoding`. `ibm850` has no WHATWG label
//! at all (DOS code page 850 never made it into the browser encoding
//! standard), so it keeps a small hand-rolled table like the teacher would
//! for a charset the ecosystem doesn't cover.

#[cfg(feature = "full_encoding")]
use encoding_rs::*;

#[cfg(feature = "full_encoding")]
fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let mut decoder = encoding.new_decoder();
    let mut result = String::with_capacity(bytes.len() * 2);
    if let (CoderResult::OutputFull, _, _) = decoder.decode_to_string(bytes, &mut result, true) {
        debug_assert!(false, "String full while decoding.")
    }
    result.shrink_to_fit();
    result
}

#[cfg(not(feature = "full_encoding"))]
fn decode_with(_encoding: (), bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

macro_rules! single_byte_decoder {
    ($name:ident, $enc:ident) => {
        pub fn $name(bytes: &[u8]) -> String {
            #[cfg(feature = "full_encoding")]
            {
                decode_with($enc, bytes)
            }
            #[cfg(not(feature = "full_encoding"))]
            {
                decode_with((), bytes)
            }
        }
    };
}

single_byte_decoder!(decoder_iso8859_1, WINDOWS_1252);
single_byte_decoder!(decoder_iso8859_5, ISO_8859_5);
single_byte_decoder!(decoder_iso8859_6, ISO_8859_6);
single_byte_decoder!(decoder_iso8859_7, ISO_8859_7);
single_byte_decoder!(decoder_iso8859_8, ISO_8859_8);
single_byte_decoder!(decoder_windows_1250, WINDOWS_1250);
single_byte_decoder!(decoder_windows_1251, WINDOWS_1251);
single_byte_decoder!(decoder_windows_1252, WINDOWS_1252);
single_byte_decoder!(decoder_windows_1253, WINDOWS_1253);
single_byte_decoder!(decoder_windows_1254, WINDOWS_1254);
single_byte_decoder!(decoder_windows_1255, WINDOWS_1255);
single_byte_decoder!(decoder_windows_1256, WINDOWS_1256);
single_byte_decoder!(decoder_windows_1257, WINDOWS_1257);
single_byte_decoder!(decoder_windows_1258, WINDOWS_1258);
single_byte_decoder!(decoder_macintosh, MACINTOSH);
single_byte_decoder!(decoder_koi8_r, KOI8_R);
single_byte_decoder!(decoder_koi8_u, KOI8_U);
// ISO-8859-11 has no WHATWG label (Thai never made it into the browser
// encoding standard); it agrees with windows-874 on the printable range.
single_byte_decoder!(decoder_iso8859_11, WINDOWS_874);

/// DOS code page 850 (Western European). Not a WHATWG-registered label, so
/// there's no `encoding_rs` constant to borrow; upper half is a fixed
/// 128-entry table, lower half is ASCII.
pub fn decoder_ibm850(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len());
    for &b in bytes {
        if b < 0x80 {
            result.push(b as char);
        } else {
            result.push(IBM850_HIGH[(b - 0x80) as usize]);
        }
    }
    result
}

#[rustfmt::skip]
static IBM850_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
    '\u{00AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}',
];

#[cfg(test)]
mod tests {
    #[test]
    fn ibm850_roundtrip() {
        assert_eq!(super::decoder_ibm850(b"\x9b\x9c\x9d\x9e"), "ø£Ø×");
    }
}
