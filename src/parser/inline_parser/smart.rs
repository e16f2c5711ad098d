//! Smart punctuation for dashes and ellipses. Quotes go through the
//! delimiter stack in `emphasis`.

const EM_DASH: &str = "\u{2014}";
const EN_DASH: &str = "\u{2013}";
pub(super) const ELLIPSIS: &str = "\u{2026}";

/// Replacement for a run of `count` hyphens (at least two). Runs that
/// divide evenly use a single dash width; otherwise em dashes come first
/// and one or two en dashes make up the rest.
pub(super) fn dashes(count: usize) -> String {
    let (em, en) = if count % 3 == 0 {
        (count / 3, 0)
    } else if count % 2 == 0 {
        (0, count / 2)
    } else if count % 3 == 2 {
        ((count - 2) / 3, 1)
    } else {
        ((count - 4) / 3, 2)
    };
    let mut out = String::with_capacity((em + en) * EM_DASH.len());
    out.extend(std::iter::repeat_n(EM_DASH, em));
    out.extend(std::iter::repeat_n(EN_DASH, en));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_runs() {
        assert_eq!(dashes(2), "\u{2013}");
        assert_eq!(dashes(3), "\u{2014}");
        assert_eq!(dashes(4), "\u{2013}\u{2013}");
        assert_eq!(dashes(5), "\u{2014}\u{2013}");
        assert_eq!(dashes(6), "\u{2014}\u{2014}");
        assert_eq!(dashes(7), "\u{2014}\u{2013}\u{2013}");
        assert_eq!(dashes(10), "\u{2013}\u{2013}\u{2013}\u{2013}\u{2013}");
        assert_eq!(dashes(11), "\u{2014}\u{2014}\u{2014}\u{2013}");
    }
}
