//! Channel specification parsing.
//!
//! A channel specification is the textual way of naming which relay channels
//! an operation applies to. [`ChannelSet`] turns it into a canonical,
//! sorted, duplicate-free list of channel numbers.
//!
//! # Grammar
//!
//! ```text
//! spec  := "all" | token ("," token)*
//! token := NUMBER | NUMBER "-" NUMBER
//! ```
//!
//! - `all` (any case) must be the entire specification and expands to every
//!   channel up to the bound
//! - ranges may be written in either direction, `5-3` is the same as `3-5`
//! - whitespace is rejected; see [`strip_whitespace`] for an explicit opt-in
//!
//! # Example
//!
//! ```
//! use kulgad::ChannelSet;
//!
//! let set = ChannelSet::parse("10-12,7,0-4").unwrap();
//! assert_eq!(set.as_slice(), &[0, 1, 2, 3, 4, 7, 10, 11, 12]);
//! assert_eq!(set.to_string(), "0-4,7,10-12");
//!
//! assert_eq!(ChannelSet::parse("all").unwrap().len(), 256);
//! assert!(ChannelSet::parse("256").is_err());
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ParseError;
use crate::utils::compress_ranges;

/// Highest channel number a device exposes.
pub const MAX_CHANNEL: u8 = 255;

/// Keyword selecting every channel.
const ALL_KEYWORD: &str = "all";

/// Canonical set of channel numbers.
///
/// Always strictly ascending without duplicates. Built once by parsing and
/// never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChannelSet {
    channels: Vec<u8>,
}

impl ChannelSet {
    /// Parses a specification using the default bound of [`MAX_CHANNEL`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first offending piece.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::ChannelSet;
    ///
    /// let set = ChannelSet::parse("3,1,2").unwrap();
    /// assert_eq!(set.as_slice(), &[1, 2, 3]);
    /// ```
    pub fn parse(spec: &str) -> Result<Self, ParseError> {
        Self::parse_with_limit(spec, MAX_CHANNEL)
    }

    /// Parses a specification, accepting channels `0..=max`.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::ChannelSet;
    ///
    /// let set = ChannelSet::parse_with_limit("all", 15).unwrap();
    /// assert_eq!(set.len(), 16);
    /// assert!(ChannelSet::parse_with_limit("16", 15).is_err());
    /// ```
    pub fn parse_with_limit(spec: &str, max: u8) -> Result<Self, ParseError> {
        let mut channels = Vec::new();
        collect_spec(spec, max, &mut channels)?;
        Ok(Self::from_unsorted(channels))
    }

    /// Parses several specifications and merges them into one set.
    ///
    /// Fails on the first invalid specification. An empty list of
    /// specifications fails with [`ParseError::NoChannels`].
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::ChannelSet;
    ///
    /// let set = ChannelSet::parse_many(["1,2", "7-9", "2"], 255).unwrap();
    /// assert_eq!(set.as_slice(), &[1, 2, 7, 8, 9]);
    /// ```
    pub fn parse_many<I, S>(specs: I, max: u8) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut channels = Vec::new();
        let mut seen_any = false;
        for spec in specs {
            seen_any = true;
            collect_spec(spec.as_ref(), max, &mut channels)?;
        }
        if !seen_any {
            return Err(ParseError::NoChannels);
        }
        Ok(Self::from_unsorted(channels))
    }

    /// Returns the set of every channel `0..=max`.
    pub fn all(max: u8) -> Self {
        Self {
            channels: (0..=max).collect(),
        }
    }

    /// Builds a set from arbitrary channel numbers, sorting and deduplicating.
    pub fn from_channels<I: IntoIterator<Item = u8>>(channels: I) -> Self {
        Self::from_unsorted(channels.into_iter().collect())
    }

    fn from_unsorted(mut channels: Vec<u8>) -> Self {
        channels.sort_unstable();
        channels.dedup();
        Self { channels }
    }

    /// Returns the channels as an ascending slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.channels
    }

    /// Iterates over the channels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels.iter().copied()
    }

    /// Number of channels in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns true if the set has no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Returns true if `channel` is part of the set.
    pub fn contains(&self, channel: u8) -> bool {
        self.channels.binary_search(&channel).is_ok()
    }
}

impl fmt::Display for ChannelSet {
    /// Writes the canonical form, e.g. `0-4,7,10-12`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&compress_ranges(&self.channels))
    }
}

impl FromStr for ChannelSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a ChannelSet {
    type Item = u8;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter().copied()
    }
}

/// Removes every whitespace character from a specification.
///
/// Parsing rejects whitespace by default. Callers that want to accept input
/// like `"1, 2, 7 - 9"` run this first, as a separate step.
///
/// # Example
///
/// ```
/// use kulgad::{strip_whitespace, ChannelSet};
///
/// assert!(ChannelSet::parse("1, 2").is_err());
/// let set = ChannelSet::parse(&strip_whitespace("1, 2, 7 - 9")).unwrap();
/// assert_eq!(set.as_slice(), &[1, 2, 7, 8, 9]);
/// ```
pub fn strip_whitespace(spec: &str) -> String {
    spec.chars().filter(|c| !c.is_whitespace()).collect()
}

fn collect_spec(spec: &str, max: u8, out: &mut Vec<u8>) -> Result<(), ParseError> {
    if spec.is_empty() {
        return Err(ParseError::NoChannels);
    }

    if spec.eq_ignore_ascii_case(ALL_KEYWORD) {
        out.extend(0..=max);
        return Ok(());
    }

    for (position, piece) in spec.split(',').enumerate() {
        if piece.is_empty() {
            return Err(ParseError::EmptyToken {
                spec: spec.to_string(),
                position,
            });
        }
        if piece.chars().any(char::is_whitespace) {
            return Err(ParseError::Whitespace {
                token: piece.to_string(),
            });
        }

        match piece.split_once('-') {
            None => out.push(parse_single(piece, max)?),
            Some((low, high)) => out.extend(parse_range(piece, low, high, max)?),
        }
    }

    Ok(())
}

fn parse_single(piece: &str, max: u8) -> Result<u8, ParseError> {
    if !is_all_digits(piece) {
        return Err(ParseError::invalid_channel(piece));
    }
    bounded(piece, max)
}

fn parse_range(
    piece: &str,
    low: &str,
    high: &str,
    max: u8,
) -> Result<RangeInclusive<u8>, ParseError> {
    if !is_all_digits(low) || !is_all_digits(high) {
        return Err(ParseError::invalid_range(piece));
    }

    // Both bounds are checked before expansion.
    let a = bounded(low, max)?;
    let b = bounded(high, max)?;
    Ok(a.min(b)..=a.max(b))
}

fn bounded(digits: &str, max: u8) -> Result<u8, ParseError> {
    digits
        .parse::<u32>()
        .ok()
        .and_then(|value| u8::try_from(value).ok())
        .filter(|&channel| channel <= max)
        .ok_or_else(|| ParseError::out_of_range(digits, max))
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(spec: &str) -> Vec<u8> {
        ChannelSet::parse(spec).unwrap().as_slice().to_vec()
    }

    #[test]
    fn test_parse_all() {
        let set = ChannelSet::parse("all").unwrap();
        assert_eq!(set.len(), 256);
        assert_eq!(set.as_slice().first(), Some(&0));
        assert_eq!(set.as_slice().last(), Some(&255));
        assert_eq!(set, ChannelSet::all(MAX_CHANNEL));
    }

    #[test]
    fn test_parse_all_case_insensitive() {
        assert_eq!(ChannelSet::parse("ALL").unwrap().len(), 256);
        assert_eq!(ChannelSet::parse("All").unwrap().len(), 256);
    }

    #[test]
    fn test_all_is_not_substring_matched() {
        for spec in ["ball", "allison", "all,3", "3,all"] {
            let err = ChannelSet::parse(spec).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidChannel { .. }),
                "{}: {:?}",
                spec,
                err
            );
        }
    }

    #[test]
    fn test_parse_single_and_list() {
        assert_eq!(parse("7"), vec![7]);
        assert_eq!(parse("3,1,2"), vec![1, 2, 3]);
        assert_eq!(parse("0,255"), vec![0, 255]);
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(parse("5-3"), vec![3, 4, 5]);
        assert_eq!(parse("4-4"), vec![4]);
        assert_eq!(parse("0-4,7,10-12"), vec![0, 1, 2, 3, 4, 7, 10, 11, 12]);
    }

    #[test]
    fn test_parse_deduplicates() {
        assert_eq!(parse("1,1,2-4,3"), vec![1, 2, 3, 4]);
        assert_eq!(parse("10-12,11-13"), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_parse_leading_zeros() {
        assert_eq!(parse("007,010-011"), vec![7, 10, 11]);
    }

    #[test]
    fn test_output_is_strictly_ascending() {
        for spec in ["9,3,3,200-190,0", "255,0-2,128", "all"] {
            let set = ChannelSet::parse(spec).unwrap();
            assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]), "{}", spec);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            ChannelSet::parse("256").unwrap_err(),
            ParseError::out_of_range("256", 255)
        );
        assert_eq!(
            ChannelSet::parse("7-300").unwrap_err(),
            ParseError::out_of_range("300", 255)
        );
        assert_eq!(
            ChannelSet::parse("300-7").unwrap_err(),
            ParseError::out_of_range("300", 255)
        );
    }

    #[test]
    fn test_out_of_range_huge_number() {
        let err = ChannelSet::parse("99999999999999999999").unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));
    }

    #[test]
    fn test_negative_number_is_invalid_range() {
        assert_eq!(
            ChannelSet::parse("-1").unwrap_err(),
            ParseError::invalid_range("-1")
        );
    }

    #[test]
    fn test_empty_spec() {
        assert_eq!(ChannelSet::parse("").unwrap_err(), ParseError::NoChannels);
    }

    #[test]
    fn test_empty_tokens() {
        assert_eq!(
            ChannelSet::parse(",").unwrap_err(),
            ParseError::EmptyToken {
                spec: ",".to_string(),
                position: 0
            }
        );
        assert_eq!(
            ChannelSet::parse("3,,5").unwrap_err(),
            ParseError::EmptyToken {
                spec: "3,,5".to_string(),
                position: 1
            }
        );
        assert!(matches!(
            ChannelSet::parse("3,").unwrap_err(),
            ParseError::EmptyToken { position: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_ranges() {
        for spec in ["3-", "-5", "-", "1-2-3", "a-3", "3-b"] {
            assert_eq!(
                ChannelSet::parse(spec).unwrap_err(),
                ParseError::invalid_range(spec),
                "{}",
                spec
            );
        }
    }

    #[test]
    fn test_invalid_channels() {
        assert_eq!(
            ChannelSet::parse("1,x").unwrap_err(),
            ParseError::invalid_channel("x")
        );
        assert_eq!(
            ChannelSet::parse("+3").unwrap_err(),
            ParseError::invalid_channel("+3")
        );
        assert_eq!(
            ChannelSet::parse("1.5").unwrap_err(),
            ParseError::invalid_channel("1.5")
        );
    }

    #[test]
    fn test_whitespace_rejected() {
        assert_eq!(
            ChannelSet::parse("1, 2").unwrap_err(),
            ParseError::Whitespace {
                token: " 2".to_string()
            }
        );
        assert!(matches!(
            ChannelSet::parse("3 - 5").unwrap_err(),
            ParseError::Whitespace { .. }
        ));
        assert!(matches!(
            ChannelSet::parse(" all").unwrap_err(),
            ParseError::Whitespace { .. }
        ));
    }

    #[test]
    fn test_strip_whitespace_then_parse() {
        assert_eq!(strip_whitespace(" 1,\t2 , 7 - 9\n"), "1,2,7-9");
        let set = ChannelSet::parse(&strip_whitespace(" 1,\t2 , 7 - 9\n")).unwrap();
        assert_eq!(set.as_slice(), &[1, 2, 7, 8, 9]);
        assert_eq!(strip_whitespace("   "), "");
    }

    #[test]
    fn test_parse_with_limit() {
        let set = ChannelSet::parse_with_limit("all", 7).unwrap();
        assert_eq!(set.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            ChannelSet::parse_with_limit("0-8", 7).unwrap_err(),
            ParseError::out_of_range("8", 7)
        );
    }

    #[test]
    fn test_parse_many() {
        let set = ChannelSet::parse_many(["12,3", "15", "1-2"], MAX_CHANNEL).unwrap();
        assert_eq!(set.as_slice(), &[1, 2, 3, 12, 15]);

        let err = ChannelSet::parse_many(["1", "2,,3"], MAX_CHANNEL).unwrap_err();
        assert!(matches!(err, ParseError::EmptyToken { .. }));

        let empty: [&str; 0] = [];
        assert_eq!(
            ChannelSet::parse_many(empty, MAX_CHANNEL).unwrap_err(),
            ParseError::NoChannels
        );
    }

    #[test]
    fn test_canonical_string_is_idempotent() {
        for spec in ["3,1,2", "0-4,7,10-12", "200-190,5,6,7", "all", "255"] {
            let set = ChannelSet::parse(spec).unwrap();
            let reparsed: ChannelSet = set.to_string().parse().unwrap();
            assert_eq!(reparsed, set, "{}", spec);
        }
    }

    #[test]
    fn test_contains_and_iter() {
        let set = ChannelSet::from_channels([9, 2, 2, 4]);
        assert!(set.contains(2));
        assert!(!set.contains(3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 4, 9]);
        assert_eq!((&set).into_iter().count(), 3);
    }
}
