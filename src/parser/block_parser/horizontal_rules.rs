//! Thematic break scanning.

use super::utils::{is_line_end, is_space_or_tab};

/// Try to parse a thematic break: three or more matching `*`, `-` or `_`,
/// optionally separated by spaces or tabs.
///
/// On failure returns the position where scanning stopped. No break can
/// start before that position on the same line, which lets the caller skip
/// rescanning nested containers.
pub(crate) fn try_parse_thematic_break(line: &str, pos: usize) -> Result<usize, usize> {
    let bytes = line.as_bytes();
    let Some(&marker) = bytes.get(pos) else {
        return Err(pos);
    };
    if !matches!(marker, b'*' | b'-' | b'_') {
        return Err(pos);
    }

    let mut count = 0;
    let mut i = pos;
    while let Some(&b) = bytes.get(i) {
        if b == marker {
            count += 1;
        } else if !is_space_or_tab(b) {
            break;
        }
        i += 1;
    }

    let at_end = bytes.get(i).is_none_or(|&b| is_line_end(b));
    if count >= 3 && at_end {
        Ok(i - pos)
    } else {
        Err(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rules() {
        assert!(try_parse_thematic_break("***\n", 0).is_ok());
        assert!(try_parse_thematic_break("- - -\n", 0).is_ok());
        assert!(try_parse_thematic_break("_____________\n", 0).is_ok());
    }

    #[test]
    fn test_not_a_rule() {
        assert!(try_parse_thematic_break("--\n", 0).is_err());
        assert!(try_parse_thematic_break("*-*\n", 0).is_err());
        assert!(try_parse_thematic_break("+++\n", 0).is_err());
    }

    #[test]
    fn test_failure_reports_stop_position() {
        assert_eq!(try_parse_thematic_break("- - a\n", 0), Err(4));
    }
}
