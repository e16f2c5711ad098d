//! Fenced code block scanning.

use super::utils::{is_line_end, is_space_or_tab};

/// Try to parse an opening code fence at `pos`.
///
/// Returns the fence length. A backtick fence is rejected when its info
/// string contains a backtick.
pub(crate) fn try_parse_fence_open(line: &str, pos: usize) -> Option<usize> {
    let bytes = line.as_bytes().get(pos..)?;
    let fence_char = *bytes.first()?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let length = bytes.iter().take_while(|&&b| b == fence_char).count();
    if length < 3 {
        return None;
    }
    if fence_char == b'`' {
        let info = &bytes[length..];
        let info_end = info.iter().position(|&b| is_line_end(b)).unwrap_or(info.len());
        if info[..info_end].contains(&b'`') {
            return None;
        }
    }
    Some(length)
}

/// Try to parse a closing code fence at `pos`: a run of three or more fence
/// characters followed only by spaces or tabs.
pub(crate) fn try_parse_fence_close(line: &str, pos: usize) -> Option<usize> {
    let bytes = line.as_bytes().get(pos..)?;
    let fence_char = *bytes.first()?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let length = bytes.iter().take_while(|&&b| b == fence_char).count();
    if length < 3 {
        return None;
    }
    let rest = &bytes[length..];
    let spaces = rest.iter().take_while(|&&b| is_space_or_tab(b)).count();
    match rest.get(spaces) {
        None => Some(length),
        Some(&b) if is_line_end(b) => Some(length),
        _ => None,
    }
}
