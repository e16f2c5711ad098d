//! Parsing for inline code spans (`code`).

/// Backtick runs longer than this never open a code span.
const MAX_BACKTICKS: usize = 1000;

/// Remembers where backtick runs of each length were last seen, so that an
/// opener with no possible closer is rejected without rescanning the rest
/// of the block.
pub(super) struct BacktickCache {
    scanned: bool,
    last_run_start: Vec<usize>,
}

impl BacktickCache {
    pub(super) fn new() -> Self {
        Self {
            scanned: false,
            last_run_start: Vec::new(),
        }
    }

    fn record(&mut self, length: usize, start: usize) {
        if length <= MAX_BACKTICKS {
            if self.last_run_start.is_empty() {
                self.last_run_start = vec![0; MAX_BACKTICKS + 1];
            }
            self.last_run_start[length] = start;
        }
    }

    fn cannot_close(&self, length: usize, after_open: usize) -> bool {
        length > MAX_BACKTICKS
            || (self.scanned
                && self.last_run_start.get(length).copied().unwrap_or(0) <= after_open)
    }
}

/// Try to parse a code span whose opening run starts at `start`.
/// Returns the end of the closing run and the normalized content.
pub(super) fn try_parse_code_span(
    input: &str,
    start: usize,
    cache: &mut BacktickCache,
) -> Option<(usize, String)> {
    let bytes = input.as_bytes();
    let open_len = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    let after_open = start + open_len;
    if open_len == 0 || cache.cannot_close(open_len, after_open) {
        return None;
    }

    let mut pos = after_open;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'`') {
        let run_start = pos + offset;
        let run_len = bytes[run_start..].iter().take_while(|&&b| b == b'`').count();
        pos = run_start + run_len;
        cache.record(run_len, run_start);
        if run_len == open_len {
            return Some((pos, normalize_code(&input[after_open..run_start])));
        }
    }

    cache.scanned = true;
    None
}

/// Line endings become spaces; one space is stripped from each side when
/// both are present and the content is not all spaces.
fn normalize_code(raw: &str) -> String {
    let mut code = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if code.len() >= 2
        && code.starts_with(' ')
        && code.ends_with(' ')
        && code.bytes().any(|b| b != b' ')
    {
        code.pop();
        code.remove(0);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_span(input: &str) -> Option<(usize, String)> {
        try_parse_code_span(input, 0, &mut BacktickCache::new())
    }

    #[test]
    fn test_simple_code_span() {
        assert_eq!(code_span("`foo` bar"), Some((5, "foo".to_string())));
    }

    #[test]
    fn test_double_backticks_with_inner_backtick() {
        assert_eq!(code_span("`` foo ` bar ``"), Some((15, "foo ` bar".to_string())));
    }

    #[test]
    fn test_space_stripping() {
        assert_eq!(code_span("` `` `"), Some((6, "``".to_string())));
        assert_eq!(code_span("`  `"), Some((4, "  ".to_string())));
        assert_eq!(code_span("` a`"), Some((4, " a".to_string())));
    }

    #[test]
    fn test_line_endings_become_spaces() {
        assert_eq!(code_span("``\nfoo\nbar  \nbaz\n``"), Some((19, "foo bar   baz".to_string())));
    }

    #[test]
    fn test_unmatched_run() {
        assert_eq!(code_span("```foo``"), None);
    }

    #[test]
    fn test_cache_rejects_after_full_scan() {
        let input = "`a ``b";
        let mut cache = BacktickCache::new();
        assert_eq!(try_parse_code_span(input, 0, &mut cache), None);
        assert!(cache.scanned);
        assert_eq!(try_parse_code_span(input, 3, &mut cache), None);
    }
}
