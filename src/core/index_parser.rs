//! Parsing of user-provided entry indices.
//!
//! [`IndexParser`] turns input like `"1 3-5,8"` into either a flat index list or
//! the list of ranges the user typed. The CLI keeps the ranges so a range can be
//! applied as an anchor click followed by a shift-click.
//!
//! # Public API
//! - [`IndexParser`]: Parsing and bounds validation
//! - [`IndexRange`]: One inclusive range; single indices have `start == end`
//!
//! # Supported Formats
//! - **Single indices**: `1`, `3`, `5`
//! - **Space or comma separated**: `1 3 5`, `1,3,5`
//! - **Ranges**: `3-6` (3, 4, 5 and 6)
//! - **Mixed**: `1 3-5,8`

use crate::core::error::{Result, VcsError};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

pub struct IndexParser;

impl IndexParser {
    /// Parse into ranges, in input order
    pub fn parse_ranges(input: &str) -> Result<Vec<IndexRange>> {
        let mut ranges = Vec::new();

        for part in input.split([' ', ',']).map(str::trim).filter(|s| !s.is_empty()) {
            if part.contains('-') {
                let bounds: Vec<&str> = part.split('-').collect();
                if bounds.len() != 2 {
                    return Err(VcsError::invalid_range_format(part));
                }

                let start: usize = bounds[0]
                    .parse()
                    .map_err(|_| VcsError::invalid_range_number(bounds[0]))?;
                let end: usize = bounds[1]
                    .parse()
                    .map_err(|_| VcsError::invalid_range_number(bounds[1]))?;

                if start > end {
                    return Err(VcsError::invalid_range_order(start, end));
                }
                ranges.push(IndexRange { start, end });
            } else {
                let index: usize = part.parse().map_err(|_| VcsError::invalid_number(part))?;
                ranges.push(IndexRange::single(index));
            }
        }

        Ok(ranges)
    }

    /// Parse into a sorted list of distinct indices
    pub fn parse(input: &str) -> Result<Vec<usize>> {
        let indices: BTreeSet<usize> = Self::parse_ranges(input)?
            .iter()
            .flat_map(IndexRange::indices)
            .collect();
        Ok(indices.into_iter().collect())
    }

    pub fn validate(indices: &[usize], max_index: usize) -> Result<()> {
        if max_index == 0 {
            return Err(VcsError::NoFilesAvailable);
        }

        for &index in indices {
            if index == 0 {
                return Err(VcsError::ZeroIndex);
            }
            if index > max_index {
                return Err(VcsError::index_out_of_range(index, max_index));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_format() -> Result<()> {
        let result = IndexParser::parse("1 3-5,8")?;
        assert_eq!(result, vec![1, 3, 4, 5, 8]);
        Ok(())
    }

    #[test]
    fn test_parse_duplicates_removed() -> Result<()> {
        let result = IndexParser::parse("3,1,1-2")?;
        assert_eq!(result, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_parse_ranges_keeps_input_order() -> Result<()> {
        let ranges = IndexParser::parse_ranges("8 3-5,1")?;
        assert_eq!(
            ranges,
            vec![
                IndexRange::single(8),
                IndexRange { start: 3, end: 5 },
                IndexRange::single(1),
            ]
        );
        assert!(ranges[0].is_single());
        assert!(!ranges[1].is_single());
        Ok(())
    }

    #[test]
    fn test_parse_empty_input() -> Result<()> {
        assert!(IndexParser::parse("")?.is_empty());
        assert!(IndexParser::parse("   ")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_invalid_number() {
        let result = IndexParser::parse("abc");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid number: 'abc'"));
    }

    #[test]
    fn test_parse_invalid_range() {
        let result = IndexParser::parse("5-3");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("start (5) must be <= end (3)"));
    }

    #[test]
    fn test_parse_malformed_range() {
        let result = IndexParser::parse("1-2-3");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid range format"));
    }

    #[test]
    fn test_validate() {
        assert!(IndexParser::validate(&[1, 2, 3], 5).is_ok());
        assert!(IndexParser::validate(&[1, 2, 6], 5)
            .unwrap_err()
            .to_string()
            .contains("Index 6 is out of range (1-5 available)"));
        assert!(matches!(IndexParser::validate(&[0], 5), Err(VcsError::ZeroIndex)));
        assert!(matches!(IndexParser::validate(&[1], 0), Err(VcsError::NoFilesAvailable)));
    }
}
