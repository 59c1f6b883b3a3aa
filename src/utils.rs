//! Utility functions for switch values and channel lists.
//!
//! # Example
//!
//! ```
//! use kulgad::utils::{compress_ranges, parse_switch, switch_label};
//!
//! assert_eq!(parse_switch("ON"), Some(true));
//! assert_eq!(parse_switch("0"), Some(false));
//! assert_eq!(switch_label(true), "on");
//!
//! assert_eq!(compress_ranges(&[0, 1, 2, 3, 4, 7, 10, 11, 12]), "0-4,7,10-12");
//! ```

/// Parses a switch word into a boolean.
///
/// Accepts `on`/`off`, `true`/`false` and `1`/`0`, case-insensitively.
/// Returns `None` for anything else.
///
/// # Example
///
/// ```
/// use kulgad::utils::parse_switch;
///
/// assert_eq!(parse_switch("on"), Some(true));
/// assert_eq!(parse_switch("False"), Some(false));
/// assert_eq!(parse_switch("maybe"), None);
/// ```
pub fn parse_switch(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Returns the label used for a switch value on the console.
#[inline]
pub fn switch_label(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Formats ascending channel numbers as a compact list.
///
/// Consecutive runs become `A-B`, isolated channels stay single, and
/// pieces are joined with commas. Input must be sorted and duplicate-free;
/// the output then parses back to the same channels.
pub fn compress_ranges(channels: &[u8]) -> String {
    let mut out = String::new();
    let mut iter = channels.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(&next) = iter.peek() {
            if u16::from(next) != u16::from(end) + 1 {
                break;
            }
            end = next;
            iter.next();
        }

        if !out.is_empty() {
            out.push(',');
        }
        if start == end {
            out.push_str(&start.to_string());
        } else {
            out.push_str(&format!("{}-{}", start, end));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch_aliases() {
        for word in ["on", "ON", "true", "True", "1"] {
            assert_eq!(parse_switch(word), Some(true), "{}", word);
        }
        for word in ["off", "Off", "false", "FALSE", "0"] {
            assert_eq!(parse_switch(word), Some(false), "{}", word);
        }
    }

    #[test]
    fn test_parse_switch_rejects_other_words() {
        assert_eq!(parse_switch(""), None);
        assert_eq!(parse_switch("-on"), None);
        assert_eq!(parse_switch("yes"), None);
    }

    #[test]
    fn test_switch_label() {
        assert_eq!(switch_label(true), "on");
        assert_eq!(switch_label(false), "off");
    }

    #[test]
    fn test_compress_ranges_empty() {
        assert_eq!(compress_ranges(&[]), "");
    }

    #[test]
    fn test_compress_ranges_singles_and_runs() {
        assert_eq!(compress_ranges(&[5]), "5");
        assert_eq!(compress_ranges(&[1, 3, 5]), "1,3,5");
        assert_eq!(compress_ranges(&[1, 2]), "1-2");
        assert_eq!(compress_ranges(&[0, 1, 2, 9, 254, 255]), "0-2,9,254-255");
    }

    #[test]
    fn test_compress_ranges_full_span() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(compress_ranges(&all), "0-255");
    }
}
