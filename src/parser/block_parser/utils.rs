//! Byte-level helpers shared by the block scanners.

/// Byte at `pos`, or 0 past the end of the line.
pub(crate) fn peek(line: &str, pos: usize) -> u8 {
    line.as_bytes().get(pos).copied().unwrap_or(0)
}

pub(crate) fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

pub(crate) fn is_line_end(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Whitespace as the block grammar sees it: space, tab, line feed, form
/// feed, vertical tab and carriage return.
pub(crate) fn is_markdown_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Length of `bytes[..end]` once trailing whitespace is removed.
pub(crate) fn rtrim_len(bytes: &[u8], mut end: usize) -> usize {
    while end > 0 && is_markdown_space(bytes[end - 1]) {
        end -= 1;
    }
    end
}

/// True if `text` holds nothing but whitespace.
pub(crate) fn is_blank(text: &str) -> bool {
    text.bytes().all(is_markdown_space)
}

/// Drops trailing blank lines, and the line break ending the last
/// non-blank line.
pub(crate) fn remove_trailing_blank_lines(content: &mut String) {
    let bytes = content.as_bytes();
    let mut i = bytes.len();
    while i > 0 && is_markdown_space(bytes[i - 1]) {
        i -= 1;
    }
    if i == 0 {
        content.clear();
        return;
    }
    if let Some(nl) = bytes[i..].iter().position(|&b| is_line_end(b)) {
        content.truncate(i + nl);
    }
}

/// Splits `input` into lines on `\n`, `\r\n` or `\r`, without terminators.
/// A trailing terminator does not produce an extra empty line.
pub(crate) fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = input;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(end) => {
                let line = &rest[..end];
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_mixed_terminators() {
        let lines: Vec<_> = split_lines("a\nb\r\nc\rd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_trailing_newline() {
        let lines: Vec<_> = split_lines("a\n\nb\n").collect();
        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn test_remove_trailing_blank_lines() {
        let mut content = String::from("code\n  \n\n");
        remove_trailing_blank_lines(&mut content);
        assert_eq!(content, "code");

        let mut blank = String::from("\n  \n");
        remove_trailing_blank_lines(&mut blank);
        assert_eq!(blank, "");
    }

    #[test]
    fn test_peek_past_end() {
        assert_eq!(peek("ab", 1), b'b');
        assert_eq!(peek("ab", 5), 0);
    }
}
