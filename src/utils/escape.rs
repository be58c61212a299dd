//! URL path escaping.
//!
//! Percent-encodes a string the way a pathname is turned into a URL path:
//! ASCII letters, digits, `_`, `.`, `-`, `~` and `/` pass through, every
//! other byte of the UTF-8 encoding becomes `%XX` with uppercase hex.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-' | b'~' | b'/')
}

/// Escape `input` for use inside a URL path
///
/// # Examples
/// ```
/// use ringsub::utils::escape::escape_path;
///
/// assert_eq!(escape_path("a=b:c d"), "a%3Db%3Ac%20d");
/// ```
pub fn escape_path(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if is_unreserved(byte) {
            escaped.push(byte as char);
        } else {
            escaped.push('%');
            escaped.push(HEX[(byte >> 4) as usize] as char);
            escaped.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_pass_through() {
        assert_eq!(escape_path("abcXYZ019_.-~/"), "abcXYZ019_.-~/");
        assert_eq!(escape_path(""), "");
    }

    #[test]
    fn test_link_characters_are_escaped() {
        assert_eq!(
            escape_path("--fpgalink=n01:acl0:ch0-n00:acl2:ch1 "),
            "--fpgalink%3Dn01%3Aacl0%3Ach0-n00%3Aacl2%3Ach1%20"
        );
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(escape_path("é"), "%C3%A9");
        assert_eq!(escape_path("%"), "%25");
    }
}
