///! HTML entity decoding for labels and qualifiers
///!
///! The generator entity-escapes display text inside the JS tables
///! (`&amp;`, `&lt;`, `&#160;`, ...). The model keeps the raw text so
///! files can be re-emitted byte-compatibly; comparisons and display
///! go through this decoder.

/// Decode the HTML entities Doxygen emits into index tables.
///
/// Unknown or malformed entities are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match rest.find(';') {
            // Entities are short; a far-away ';' means this '&' is literal
            Some(end) if end <= 10 => {
                let entity = &rest[1..end];
                match decode_one(entity) {
                    Some(decoded) => {
                        out.push(decoded);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_one(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_entities("Eci(const DateTime &amp;dt)"),
            "Eci(const DateTime &dt)"
        );
        assert_eq!(decode_entities("vector&lt; double &gt;"), "vector< double >");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("a&#160;b"), "a\u{a0}b");
        assert_eq!(decode_entities("&#x41;"), "A");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("a & b"), "a & b");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_entities("FindPosition(double tsince) const "),
                   "FindPosition(double tsince) const ");
    }
}
