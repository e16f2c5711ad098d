//! List marker scanning.

use super::horizontal_rules::try_parse_thematic_break;
use super::utils::{is_markdown_space, is_space_or_tab, peek};
use crate::tree::{ListData, ListDelimType, ListType};

/// Ordered list numbers are limited to nine digits.
const MAX_ORDERED_DIGITS: usize = 9;

/// Try to parse a list marker at `pos`.
///
/// Returns the marker width and the list data it implies; `padding` and
/// `marker_offset` are left for the caller. When the marker would interrupt
/// a paragraph, ordered lists must start at 1 and the item must not be
/// empty.
pub(crate) fn try_parse_list_marker(
    line: &str,
    pos: usize,
    interrupts_paragraph: bool,
) -> Option<(usize, ListData)> {
    let marker = peek(line, pos);

    let (end, data) = if matches!(marker, b'*' | b'-' | b'+') {
        if try_parse_thematic_break(line, pos).is_ok() {
            return None;
        }
        let data = ListData {
            list_type: ListType::Bullet,
            bullet_char: marker,
            ..ListData::default()
        };
        (pos + 1, data)
    } else if marker.is_ascii_digit() {
        let digits = line.as_bytes()[pos..]
            .iter()
            .take(MAX_ORDERED_DIGITS)
            .take_while(|b| b.is_ascii_digit())
            .count();
        let start = line[pos..pos + digits].parse::<usize>().ok()?;
        if interrupts_paragraph && start != 1 {
            return None;
        }
        let delimiter = match peek(line, pos + digits) {
            b'.' => ListDelimType::Period,
            b')' => ListDelimType::Paren,
            _ => return None,
        };
        let data = ListData {
            list_type: ListType::Ordered,
            delimiter: Some(delimiter),
            start,
            ..ListData::default()
        };
        (pos + digits + 1, data)
    } else {
        return None;
    };

    if !is_markdown_space(peek(line, end)) {
        return None;
    }
    if interrupts_paragraph {
        let mut i = end;
        while is_space_or_tab(peek(line, i)) {
            i += 1;
        }
        if peek(line, i) == b'\n' {
            return None;
        }
    }

    Some((end - pos, data))
}

/// Whether an item with marker data `item` continues a list with `list`.
pub(crate) fn lists_match(list: &ListData, item: &ListData) -> bool {
    list.list_type == item.list_type
        && list.delimiter == item.delimiter
        && list.bullet_char == item.bullet_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_markers() {
        let (width, data) = try_parse_list_marker("- foo\n", 0, false).unwrap();
        assert_eq!(width, 1);
        assert_eq!(data.list_type, ListType::Bullet);
        assert_eq!(data.bullet_char, b'-');
        assert!(try_parse_list_marker("-foo\n", 0, false).is_none());
        assert!(try_parse_list_marker("* * *\n", 0, false).is_none());
    }

    #[test]
    fn test_ordered_markers() {
        let (width, data) = try_parse_list_marker("123) foo\n", 0, false).unwrap();
        assert_eq!(width, 4);
        assert_eq!(data.start, 123);
        assert_eq!(data.delimiter, Some(ListDelimType::Paren));
        assert!(try_parse_list_marker("1234567890. no\n", 0, false).is_none());
        assert!(try_parse_list_marker("1.foo\n", 0, false).is_none());
    }

    #[test]
    fn test_interrupting_paragraph() {
        assert!(try_parse_list_marker("2. foo\n", 0, true).is_none());
        assert!(try_parse_list_marker("1. foo\n", 0, true).is_some());
        assert!(try_parse_list_marker("-\n", 0, true).is_none());
        assert!(try_parse_list_marker("-\n", 0, false).is_some());
    }

    #[test]
    fn test_lists_match() {
        let dash = try_parse_list_marker("- a\n", 0, false).unwrap().1;
        let plus = try_parse_list_marker("+ a\n", 0, false).unwrap().1;
        assert!(lists_match(&dash, &dash.clone()));
        assert!(!lists_match(&dash, &plus));
    }
}
