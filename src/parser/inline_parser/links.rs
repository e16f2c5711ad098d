//! Link label, destination and title scanners.
//!
//! Shared by inline links and reference definitions. Positions are byte
//! offsets into the input; every scanner returns the offset just past what
//! it matched.

use super::entities::unescape_string;

pub(crate) const MAX_LINK_LABEL_LENGTH: usize = 999;
const MAX_DESTINATION_PARENS: usize = 32;

fn is_space_char(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Number of whitespace bytes (line endings included) starting at `pos`.
pub(crate) fn scan_spacechars(input: &str, pos: usize) -> usize {
    input
        .as_bytes()
        .get(pos..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| is_space_char(b)).count())
}

/// `[label]` starting at `pos`. Returns the end and the trimmed label text.
pub(crate) fn scan_link_label(input: &str, pos: usize) -> Option<(usize, &str)> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 1;
    let mut length = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'[' => return None,
            b']' => {
                let label = input[pos + 1..i].trim_matches(|c: char| c.is_ascii() && is_space_char(c as u8));
                return Some((i + 1, label));
            }
            b'\\' => {
                i += 1;
                length += 1;
                if bytes.get(i).is_some_and(u8::is_ascii_punctuation) {
                    i += 1;
                    length += 1;
                }
            }
            _ => {
                i += 1;
                length += 1;
            }
        }
        if length > MAX_LINK_LABEL_LENGTH {
            return None;
        }
    }
    None
}

/// Link destination at `pos`, either `<...>` or a run without spaces and
/// with balanced parentheses. Returns the end and the unescaped URL.
pub(crate) fn scan_link_destination(input: &str, pos: usize) -> Option<(usize, String)> {
    let bytes = input.as_bytes();

    if bytes.get(pos) == Some(&b'<') {
        let mut i = pos + 1;
        loop {
            match bytes.get(i)? {
                b'>' => {
                    i += 1;
                    break;
                }
                b'\\' => i += 2,
                b'\n' | b'<' => return None,
                _ => i += 1,
            }
        }
        if i >= bytes.len() {
            return None;
        }
        let url = unescape_string(&input[pos + 1..i - 1]);
        return Some((i, url));
    }

    let mut i = pos;
    let mut parens = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
            b'(' => {
                parens += 1;
                if parens > MAX_DESTINATION_PARENS {
                    return None;
                }
                i += 1;
            }
            b')' => {
                if parens == 0 {
                    break;
                }
                parens -= 1;
                i += 1;
            }
            b if is_space_char(b) || b.is_ascii_control() => break,
            _ => i += 1,
        }
    }
    if i >= bytes.len() || parens != 0 {
        return None;
    }
    Some((i, unescape_string(&input[pos..i])))
}

/// Link title at `pos` in `"..."`, `'...'` or `(...)` form. Returns the
/// end and the unescaped title.
pub(crate) fn scan_link_title(input: &str, pos: usize) -> Option<(usize, String)> {
    let bytes = input.as_bytes();
    let close = match bytes.get(pos)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = pos + 1;
    while let Some(&b) = bytes.get(i) {
        if b == b'\\' && bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) {
            i += 2;
        } else if b == close {
            return Some((i + 1, unescape_string(&input[pos + 1..i])));
        } else if close == b')' && b == b'(' {
            return None;
        } else {
            i += 1;
        }
    }
    None
}

/// Case-folds a label and collapses its internal whitespace so that
/// equivalent labels compare equal. `None` for labels with no content.
pub(crate) fn normalize_label(label: &str) -> Option<String> {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.to_lowercase().to_uppercase())
}
