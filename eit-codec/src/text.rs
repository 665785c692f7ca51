//! DVB text field decoding (ETSI EN 300 468 annex A).
//!
//! A text field may begin with a control byte that selects the character
//! table; without one the legacy default Latin table applies. Decoding is
//! total: control bytes without a known table degrade to a byte-for-byte
//! Latin-1 interpretation instead of failing.

use encoding_rs::Encoding;

/// Decode a raw EIT text field into a Unicode string.
pub fn decode_text(raw: &[u8]) -> String {
    let Some((&first, rest)) = raw.split_first() else {
        return String::new();
    };
    if first >= 0x20 {
        // No control byte; the default Latin table covers the whole field.
        return latin1(raw);
    }
    match encoding_for(first) {
        Some(encoding) => encoding.decode(rest).0.into_owned(),
        None => latin1(rest),
    }
}

/// Character table selected by a leading control byte.
fn encoding_for(code: u8) -> Option<&'static Encoding> {
    use encoding_rs::*;
    match code {
        0x01 => Some(ISO_8859_5),    // Cyrillic
        0x02 => Some(ISO_8859_6),    // Arabic
        0x03 => Some(ISO_8859_7),    // Greek
        0x04 => Some(ISO_8859_8),    // Hebrew
        0x05 => Some(WINDOWS_1254),  // ISO 8859-9, Latin no. 5
        0x06 => Some(ISO_8859_10),   // Latin no. 6
        0x07 => Some(WINDOWS_874),   // ISO 8859-11, Thai
        0x09 => Some(ISO_8859_13),   // Latin no. 7
        0x0A => Some(ISO_8859_14),   // Latin no. 8, Celtic
        0x0B => Some(ISO_8859_15),   // Latin no. 9
        0x11 => Some(UTF_16BE),      // ISO 10646 basic multilingual plane
        0x12 => Some(EUC_KR),        // KS X 1001, Korean
        0x13 => Some(GBK),           // GB 2312, simplified Chinese
        0x14 => Some(BIG5),          // Traditional Chinese
        0x15 => Some(UTF_8),
        _ => None,
    }
}

/// Byte-for-byte Latin-1, the DVB default table.
fn latin1(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}
