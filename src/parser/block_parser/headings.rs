//! ATX and setext heading scanners.

use super::utils::{is_line_end, is_space_or_tab, rtrim_len};

/// Try to parse an ATX heading opener (`#` to `######`) at `pos`.
///
/// Returns the level and the number of bytes the marker and its trailing
/// spaces occupy.
pub(crate) fn try_parse_atx_heading(line: &str, pos: usize) -> Option<(u8, usize)> {
    let bytes = line.as_bytes().get(pos..)?;
    let level = bytes.iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }

    match bytes.get(level) {
        Some(&b) if is_space_or_tab(b) => {
            let spaces = bytes[level..]
                .iter()
                .take_while(|&&b| is_space_or_tab(b))
                .count();
            Some((level as u8, level + spaces))
        }
        Some(&b) if is_line_end(b) => Some((level as u8, level)),
        None => Some((level as u8, level)),
        _ => None,
    }
}

/// Try to parse a setext underline at `pos`: `=` gives level 1, `-` level 2.
pub(crate) fn try_parse_setext_underline(line: &str, pos: usize) -> Option<u8> {
    let bytes = line.as_bytes().get(pos..)?;
    let marker = *bytes.first()?;
    let level = match marker {
        b'=' => 1,
        b'-' => 2,
        _ => return None,
    };

    let run = bytes.iter().take_while(|&&b| b == marker).count();
    let rest = &bytes[run..];
    let spaces = rest.iter().take_while(|&&b| is_space_or_tab(b)).count();
    match rest.get(spaces) {
        None => Some(level),
        Some(&b) if is_line_end(b) => Some(level),
        _ => None,
    }
}

/// End of the heading text once the optional closing `#` sequence and
/// surrounding whitespace are removed.
pub(crate) fn chop_trailing_hashes(line: &str) -> usize {
    let bytes = line.as_bytes();
    let end = rtrim_len(bytes, bytes.len());
    let mut n = end;
    while n > 0 && bytes[n - 1] == b'#' {
        n -= 1;
    }
    if n != end && n > 0 && is_space_or_tab(bytes[n - 1]) {
        rtrim_len(bytes, n - 1)
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atx_levels() {
        assert_eq!(try_parse_atx_heading("# foo\n", 0), Some((1, 2)));
        assert_eq!(try_parse_atx_heading("###   bar\n", 0), Some((3, 6)));
        assert_eq!(try_parse_atx_heading("#\n", 0), Some((1, 1)));
        assert_eq!(try_parse_atx_heading("####### foo\n", 0), None);
    }

    #[test]
    fn test_atx_requires_space() {
        assert_eq!(try_parse_atx_heading("#5 bolt\n", 0), None);
        assert_eq!(try_parse_atx_heading("#hashtag\n", 0), None);
    }

    #[test]
    fn test_setext_underline() {
        assert_eq!(try_parse_setext_underline("===\n", 0), Some(1));
        assert_eq!(try_parse_setext_underline("---  \n", 0), Some(2));
        assert_eq!(try_parse_setext_underline("= =\n", 0), None);
        assert_eq!(try_parse_setext_underline("--- a\n", 0), None);
    }

    #[test]
    fn test_chop_trailing_hashes() {
        let line = "# foo ##\n";
        assert_eq!(&line[..chop_trailing_hashes(line)], "# foo");

        let line = "# foo#\n";
        assert_eq!(&line[..chop_trailing_hashes(line)], "# foo#");

        let line = "### b ###   \n";
        assert_eq!(&line[..chop_trailing_hashes(line)], "### b");
    }
}
