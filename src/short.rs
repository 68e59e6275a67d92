//! Short code derivation.
//!
//! The code is a pure function of the original URL's bytes: the xxh3
//! 128-bit digest, hex encoded, truncated to 8 characters. Distinct URLs
//! that share a truncated digest are not disambiguated; that collision
//! window is an accepted limitation of the 8-character format.

use xxhash_rust::xxh3::xxh3_128;

/// Length of a generated short code, in hex characters.
pub const CODE_LENGTH: usize = 8;

/// Derive the short code for a URL. Total and deterministic; the empty
/// input is defined but unreachable in practice since handlers reject
/// empty URLs before storage is involved.
pub fn code(url: &[u8]) -> String {
    let digest = xxh3_128(url);
    let mut hex = format!("{:032x}", digest);
    hex.truncate(CODE_LENGTH);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_deterministic() {
        let url = b"https://example.com/some/long/path?q=1";
        assert_eq!(code(url), code(url));
    }

    #[test]
    fn test_code_length_and_alphabet() {
        for url in ["https://example.com", "http://a", ""] {
            let c = code(url.as_bytes());
            assert_eq!(c.len(), CODE_LENGTH);
            assert!(c.chars().all(|ch| ch.is_ascii_hexdigit()));
            assert_eq!(c, c.to_lowercase());
        }
    }

    #[test]
    fn test_distinct_urls_get_distinct_codes() {
        let a = code(b"https://example.com/a");
        let b = code(b"https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_code_depends_on_exact_bytes() {
        assert_ne!(
            code(b"https://example.com"),
            code(b"https://example.com/")
        );
    }
}
