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

pub mod multi_byte;
pub mod single_byte;
pub mod utf;

pub type DecoderFnc = fn(&[u8]) -> String;

/// Resolves a (case-insensitive, charset-name) label to a decode function,
/// implementing the `transcode()` collaborator §6 asks for. `None` means
/// the charset is unrecognized; the caller then falls back to a lossy
/// UTF-8 interpretation of the raw bytes (§4.1 token-closure failure mode).
pub fn charset_decoder(charset: &[u8]) -> Option<DecoderFnc> {
    // RFC 2231 allows a `*lang` suffix on the charset token (e.g.
    // `iso-8859-1*en`); only the part before `*` names the charset.
    let charset = charset
        .split(|&b| b == b'*')
        .next()
        .unwrap_or(charset)
        .trim_ascii();

    let mut lower = [0u8; 32];
    if charset.is_empty() || charset.len() > lower.len() {
        return None;
    }
    for (dst, &src) in lower.iter_mut().zip(charset) {
        *dst = src.to_ascii_lowercase();
    }
    let name = &lower[..charset.len()];

    Some(match name {
        b"utf-8" | b"utf8" | b"us-ascii" | b"ascii" => utf::decoder_utf8,
        b"utf-7" | b"utf7" => utf::decoder_utf7,
        b"utf-16" => utf::decoder_utf16,
        b"utf-16le" => utf::decoder_utf16_le,
        b"utf-16be" => utf::decoder_utf16_be,
        b"iso-8859-1" | b"iso8859-1" | b"latin1" => single_byte::decoder_iso8859_1,
        b"iso-8859-5" | b"iso8859-5" => single_byte::decoder_iso8859_5,
        b"iso-8859-6" | b"iso8859-6" => single_byte::decoder_iso8859_6,
        b"iso-8859-7" | b"iso8859-7" => single_byte::decoder_iso8859_7,
        b"iso-8859-8" | b"iso8859-8" => single_byte::decoder_iso8859_8,
        b"iso-8859-11" | b"iso8859-11" => single_byte::decoder_iso8859_11,
        b"windows-1250" | b"cp1250" => single_byte::decoder_windows_1250,
        b"windows-1251" | b"cp1251" => single_byte::decoder_windows_1251,
        b"windows-1252" | b"cp1252" => single_byte::decoder_windows_1252,
        b"windows-1253" | b"cp1253" => single_byte::decoder_windows_1253,
        b"windows-1254" | b"cp1254" => single_byte::decoder_windows_1254,
        b"windows-1255" | b"cp1255" => single_byte::decoder_windows_1255,
        b"windows-1256" | b"cp1256" => single_byte::decoder_windows_1256,
        b"windows-1257" | b"cp1257" => single_byte::decoder_windows_1257,
        b"windows-1258" | b"cp1258" => single_byte::decoder_windows_1258,
        b"macintosh" | b"mac" => single_byte::decoder_macintosh,
        b"ibm850" | b"cp850" => single_byte::decoder_ibm850,
        b"koi8-r" | b"koi8r" => single_byte::decoder_koi8_r,
        b"koi8-u" | b"koi8u" => single_byte::decoder_koi8_u,
        #[cfg(feature = "full_encoding")]
        b"shift_jis" | b"shift-jis" | b"sjis" => multi_byte::decoder_shift_jis,
        #[cfg(feature = "full_encoding")]
        b"big5" => multi_byte::decoder_big5,
        #[cfg(feature = "full_encoding")]
        b"euc-jp" | b"eucjp" => multi_byte::decoder_euc_jp,
        #[cfg(feature = "full_encoding")]
        b"euc-kr" | b"euckr" => multi_byte::decoder_euc_kr,
        #[cfg(feature = "full_encoding")]
        b"iso-2022-jp" => multi_byte::decoder_iso2022_jp,
        #[cfg(feature = "full_encoding")]
        b"gbk" => multi_byte::decoder_gbk,
        #[cfg(feature = "full_encoding")]
        b"gb18030" | b"gb2312" => multi_byte::decoder_gb18030,
        #[cfg(feature = "full_encoding")]
        b"windows-874" | b"cp874" => multi_byte::decoder_windows874,
        #[cfg(feature = "full_encoding")]
        b"ibm866" | b"cp866" => multi_byte::decoder_ibm866,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::charset_decoder;

    #[test]
    fn decode_charset() {
        let inputs = [
            ("iso-8859-1", b"\xe1\xe9\xed\xf3\xfa".to_vec(), "áéíóú"),
            ("iso-8859-5", b"\xbf\xe0\xd8\xd2\xd5\xe2, \xdc\xd8\xe0".to_vec(), "Привет, мир"),
            ("iso-8859-6", b"\xe5\xd1\xcd\xc8\xc7 \xc8\xc7\xe4\xd9\xc7\xe4\xe5".to_vec(),"مرحبا بالعالم"),
            ("iso-8859-8", b"\xf9\xec\xe5\xed \xf2\xe5\xec\xed".to_vec(),"שלום עולם"),
            ("windows-1251", b"\xcf\xf0\xe8\xe2\xe5\xf2, \xec\xe8\xf0".to_vec(),"Привет, мир"),
            ("windows-1252", b"\xa1El \xf1and\xfa comi\xf3 \xf1oquis!".to_vec(),"¡El ñandú comió ñoquis!"),
            ("macintosh", b"\x87\x8e\x92\x97\x9c".to_vec(),"áéíóú"),
            ("ibm850", b"\x9b\x9c\x9d\x9e".to_vec(),"ø£Ø×"),
            ("koi8-r", b"\xf0\xd2\xc9\xd7\xc5\xd4, \xcd\xc9\xd2".to_vec(),"Привет, мир"),
            ("koi8-u", b"\xf0\xd2\xc9\xd7\xa6\xd4 \xf3\xd7\xa6\xd4".to_vec(),"Привіт Світ"),
            ("utf-7", b"+ZYeB9FH6ckh5Pg-, 1980.".to_vec(),"文致出版社, 1980."),
            ("utf-16le", b"\xcf0\xed0\xfc0\xfb0\xef0\xfc0\xeb0\xc90".to_vec(),"ハロー・ワールド"),
            ("utf-16be", b"0\xcf0\xed0\xfc0\xfb0\xef0\xfc0\xeb0\xc9".to_vec(),"ハロー・ワールド"),
            ("utf-16", b"\xff\xfe\xe1\x00\xe9\x00\xed\x00\xf3\x00\xfa\x00".to_vec(),"áéíóú"),
            ("utf-16", b"\xfe\xff\x00\xe1\x00\xe9\x00\xed\x00\xf3\x00\xfa".to_vec(),"áéíóú"),

            #[cfg(feature = "full_encoding")]
            ("shift_jis", b"\x83n\x83\x8D\x81[\x81E\x83\x8F\x81[\x83\x8B\x83h".to_vec(),"ハロー・ワールド"),
            #[cfg(feature = "full_encoding")]
            ("big5", b"\xa7A\xa6n\xa1A\xa5@\xac\xc9".to_vec(),"你好，世界"),
            #[cfg(feature = "full_encoding")]
            ("euc-jp", b"\xa5\xcf\xa5\xed\xa1\xbc\xa1\xa6\xa5\xef\xa1\xbc\xa5\xeb\xa5\xc9".to_vec(),"ハロー・ワールド"),
            #[cfg(feature = "full_encoding")]
            ("euc-kr", b"\xbe\xc8\xb3\xe7\xc7\xcf\xbc\xbc\xbf\xe4 \xbc\xbc\xb0\xe8".to_vec(),"안녕하세요 세계"),
            #[cfg(feature = "full_encoding")]
            ("iso-2022-jp", b"\x1b$B%O%m!<!&%o!<%k%I\x1b(B".to_vec(),"ハロー・ワールド"),
            #[cfg(feature = "full_encoding")]
            ("gbk", b"\xc4\xe3\xba\xc3\xa3\xac\xca\xc0\xbd\xe7".to_vec(),"你好，世界"),
        ];

        for input in inputs {
            let decoder = charset_decoder(input.0.as_bytes())
                .unwrap_or_else(|| panic!("Failed to find decoder for {}", input.0));

            assert_eq!(decoder(&input.1), input.2);
        }
    }

    #[test]
    fn unknown_charset_returns_none() {
        assert!(charset_decoder(b"totally-made-up-9000").is_none());
    }
}
