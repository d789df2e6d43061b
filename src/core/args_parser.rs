//! Command argument parsing with validation.
//!
//! [`ArgsParser`] joins the index arguments clap collected, parses them with
//! [`IndexParser`] and checks them against the number of displayed entries.

use crate::core::{
    error::{Result, VcsError},
    index_parser::{IndexParser, IndexRange},
};

pub struct ArgsParser;

impl ArgsParser {
    /// Parse arguments such as `["1", "3-5,8"]` into validated ranges (1-based)
    pub fn parse_ranges(args: &[String], entry_count: usize) -> Result<Vec<IndexRange>> {
        if args.is_empty() {
            return Err(VcsError::NoIndicesProvided);
        }

        let ranges = IndexParser::parse_ranges(&args.join(" "))
            .map_err(|e| VcsError::invalid_index_format(e.to_string()))?;
        if ranges.is_empty() {
            return Err(VcsError::NoValidIndices);
        }

        let flat: Vec<usize> = ranges.iter().flat_map(IndexRange::indices).collect();
        IndexParser::validate(&flat, entry_count)?;
        Ok(ranges)
    }

    /// Parse arguments into a sorted, deduplicated index list (1-based)
    pub fn parse_indices(args: &[String], entry_count: usize) -> Result<Vec<usize>> {
        let ranges = Self::parse_ranges(args, entry_count)?;
        let mut indices: Vec<usize> = ranges.iter().flat_map(IndexRange::indices).collect();
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}
