///! Search-key codec
///!
///! The generator derives each search key from the display label:
///! lowercase it, keep `[a-z0-9]`, and write every other byte as
///! `_xx` (lowercase hex). `Equipment_elDependent` becomes
///! `equipment_5feldependent`.

/// Encode a display label into its search key.
pub fn encode_key(label: &str) -> String {
    let lowered = label.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for byte in lowered.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            other => {
                out.push('_');
                out.push_str(&format!("{:02x}", other));
            }
        }
    }
    out
}

/// Decode a search key back to lowercase text.
///
/// Malformed escapes are kept verbatim and invalid UTF-8 from decoded
/// bytes is replaced, never fatal. The result feeds fuzzy matching and
/// display, not validation.
pub fn decode_key(key: &str) -> String {
    let mut bytes = Vec::with_capacity(key.len());
    let src: Vec<char> = key.chars().collect();
    let mut i = 0;

    while i < src.len() {
        if src[i] == '_' {
            let pair: String = src[i + 1..].iter().take(2).collect();
            if pair.len() == 2 && pair.chars().all(|c| c.is_ascii_hexdigit()) {
                if let Ok(byte) = u8::from_str_radix(&pair, 16) {
                    bytes.push(byte);
                    i += 3;
                    continue;
                }
            }
        }
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(src[i].encode_utf8(&mut buf).as_bytes());
        i += 1;
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// The letter a key is grouped under: first character of the decoded
/// key. This is what the shard ordinal maps to through the manifest's
/// letter string.
pub fn key_letter(key: &str) -> Option<char> {
    decode_key(key).chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_identifier() {
        assert_eq!(encode_key("Eccentricity"), "eccentricity");
        assert_eq!(encode_key("flip_map"), "flip_5fmap");
    }

    #[test]
    fn test_encode_mixed_case_with_underscore() {
        assert_eq!(encode_key("Equipment_elDependent"), "equipment_5feldependent");
        assert_eq!(encode_key("Flux_B"), "flux_5fb");
    }

    #[test]
    fn test_encode_operator_and_tilde() {
        assert_eq!(encode_key("operator="), "operator_3d");
        assert_eq!(encode_key("~Scan"), "_7escan");
    }

    #[test]
    fn test_encode_multibyte() {
        // One escaped byte per UTF-8 byte
        assert_eq!(encode_key("é"), "_c3_a9");
    }

    #[test]
    fn test_decode_inverts_encode() {
        for label in ["eccentricity", "flip_map", "operator=", "~scan", "é"] {
            assert_eq!(decode_key(&encode_key(label)), label);
        }
    }

    #[test]
    fn test_decode_malformed_escape_kept() {
        assert_eq!(decode_key("a_zz"), "a_zz");
        assert_eq!(decode_key("a_"), "a_");
    }

    #[test]
    fn test_key_letter() {
        assert_eq!(key_letter("eccentricity"), Some('e'));
        assert_eq!(key_letter("_7escan"), Some('~'));
        assert_eq!(key_letter(""), None);
    }
}
