//! Digest Module
//!
//! Content-addressed catalog keys: a readable slug prefix plus a CRC-32 checksum.

use deunicode::deunicode_char;

/// CRC-32 (IEEE 802.3, reflected polynomial 0xEDB88320) lookup table.
const CRC32_TABLE: [u32; 256] = build_crc32_table();

const fn build_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// CRC-32 of the UTF-8 bytes of `s`.
pub fn crc32(s: &str) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in s.as_bytes() {
        crc = CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}

/// Lowercase ASCII identifier; every run of other characters becomes one `_`.
///
/// Accented and non-Latin letters are transliterated first (`café` gives `cafe`).
/// CJK scripts and symbols are left out of the slug entirely.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for c in text.chars() {
        let ascii = if c.is_alphabetic() && !c.is_ascii() && !is_cjk(c) {
            deunicode_char(c)
        } else {
            None
        };
        let mut push = |c: char| {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        };
        match ascii {
            Some(ascii) => ascii.chars().for_each(&mut push),
            None => push(c),
        }
    }
    slug
}

fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x11FF
            | 0x2E80..=0x9FFF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7FF
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFFEF
            | 0x20000..=0x3FFFF
    )
}

/// Derive the catalog key for `text`.
///
/// The slug is truncated to `max_length`; the checksum runs over
/// `"<length>:<text>"` where length counts UTF-16 code units.
pub fn generate_key(text: &str, max_length: usize) -> String {
    let slug: String = slugify(text).chars().take(max_length).collect();
    let length = text.encode_utf16().count();
    let checksum = crc32(&format!("{}:{}", length, text));
    format!("{}_{:08x}", slug, checksum)
}
