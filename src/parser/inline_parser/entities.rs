//! Entity and numeric character references, and backslash unescaping.

const MAX_ENTITY_NAME: usize = 31;

/// Try to decode a character reference. `input` starts just after the `&`.
///
/// Returns the decoded text and the number of bytes consumed, including
/// the closing `;`.
pub(crate) fn try_parse_entity(input: &str) -> Option<(String, usize)> {
    let bytes = input.as_bytes();

    if let Some(rest) = input.strip_prefix('#') {
        let (radix, digits_start) = match rest.as_bytes().first() {
            Some(b'x' | b'X') => (16, 2),
            _ => (10, 1),
        };
        let max_digits = if radix == 16 { 6 } else { 7 };
        let digits = bytes[digits_start..]
            .iter()
            .take_while(|b| match radix {
                16 => b.is_ascii_hexdigit(),
                _ => b.is_ascii_digit(),
            })
            .count();
        if digits == 0 || digits > max_digits || bytes.get(digits_start + digits) != Some(&b';')
        {
            return None;
        }
        let value = u32::from_str_radix(&input[digits_start..digits_start + digits], radix).ok()?;
        let decoded = match char::from_u32(value) {
            Some('\0') | None => char::REPLACEMENT_CHARACTER,
            Some(c) => c,
        };
        return Some((decoded.to_string(), digits_start + digits + 1));
    }

    let name_len = bytes
        .iter()
        .take(MAX_ENTITY_NAME + 1)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 || name_len > MAX_ENTITY_NAME || bytes.get(name_len) != Some(&b';') {
        return None;
    }
    let reference = format!("&{};", &input[..name_len]);
    let decoded = html_escape::decode_html_entities(&reference);
    // Legacy references without `;` decode as a prefix and leave text behind.
    if decoded == reference || decoded.chars().count() > 2 {
        return None;
    }
    Some((decoded.into_owned(), name_len + 1))
}

/// Resolves backslash escapes and character references in link
/// destinations, titles and info strings.
pub(crate) fn unescape_string(input: &str) -> String {
    if !input.contains(['\\', '&']) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(i) = rest.find(['\\', '&']) {
        out.push_str(&rest[..i]);
        let after = &rest[i + 1..];
        if rest.as_bytes()[i] == b'\\' {
            match after.as_bytes().first() {
                Some(b) if b.is_ascii_punctuation() => {
                    out.push(*b as char);
                    rest = &after[1..];
                }
                _ => {
                    out.push('\\');
                    rest = after;
                }
            }
        } else if let Some((decoded, len)) = try_parse_entity(after) {
            out.push_str(&decoded);
            rest = &after[len..];
        } else {
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Resolves character references only; backslashes are kept.
pub(crate) fn unescape_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        let after = &rest[i + 1..];
        match try_parse_entity(after) {
            Some((decoded, len)) => {
                out.push_str(&decoded);
                rest = &after[len..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(try_parse_entity("amp;"), Some(("&".to_string(), 4)));
        assert_eq!(try_parse_entity("copy; x"), Some(("©".to_string(), 5)));
        assert_eq!(try_parse_entity("nbsp"), None);
        assert_eq!(try_parse_entity("madeup;"), None);
        assert_eq!(try_parse_entity("copyx;"), None);
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(try_parse_entity("#35;"), Some(("#".to_string(), 4)));
        assert_eq!(try_parse_entity("#X22;"), Some(("\"".to_string(), 5)));
        assert_eq!(try_parse_entity("#0;"), Some(("\u{FFFD}".to_string(), 3)));
        assert_eq!(try_parse_entity("#87654321;"), None);
        assert_eq!(try_parse_entity("#;"), None);
    }

    #[test]
    fn test_unescape_string() {
        assert_eq!(unescape_string(r"\*foo\* &amp; \q"), r"*foo* & \q");
        assert_eq!(unescape_string("f&ouml;&ouml;"), "föö");
        assert_eq!(unescape_string("plain"), "plain");
    }

    #[test]
    fn test_unescape_entities_keeps_backslashes() {
        assert_eq!(unescape_entities(r"a\&amp;b"), r"a\&b");
    }
}
