use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

// @module: SRT block splitting, parsing and reassembly

// @const: Separator between SRT blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

// @const: Sequence line, timestamp line, then everything else as text
static BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(\d+)\n([\d:,]+ --> [\d:,]+)\n(.*)").unwrap()
});

// @struct: Single subtitle block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    // @field: Sequence number exactly as written in the source
    pub sequence_number: String,

    // @field: "start --> end" line exactly as written in the source
    pub timestamp_range: String,

    // @field: Text lines, trimmed
    pub original_text: String,
}

impl SubtitleBlock {
    /// Creates a new subtitle block
    pub fn new(
        sequence_number: impl Into<String>,
        timestamp_range: impl Into<String>,
        original_text: impl Into<String>,
    ) -> Self {
        SubtitleBlock {
            sequence_number: sequence_number.into(),
            timestamp_range: timestamp_range.into(),
            original_text: original_text.into(),
        }
    }

    /// Render the block with replacement text, keeping number and timing verbatim
    pub fn render_with_text(&self, text: &str) -> String {
        format!("{}\n{}\n{}", self.sequence_number, self.timestamp_range, text)
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.sequence_number)?;
        writeln!(f, "{}", self.timestamp_range)?;
        write!(f, "{}", self.original_text)
    }
}

/// Split raw SRT content into block candidates.
///
/// The whole input is trimmed first, then cut on blank lines. Nothing is
/// validated here; an empty input yields a single empty candidate.
pub fn split_into_blocks(content: &str) -> Vec<&str> {
    content.trim().split(BLOCK_SEPARATOR).collect()
}

/// Parse one block candidate.
///
/// Returns `None` when the candidate does not start with a numeric line
/// followed by a `-->` timestamp line; such blocks are skipped, not errors.
pub fn parse_block(raw: &str) -> Option<SubtitleBlock> {
    let captures = BLOCK_REGEX.captures(raw)?;
    Some(SubtitleBlock {
        sequence_number: captures[1].to_string(),
        timestamp_range: captures[2].to_string(),
        original_text: captures[3].trim().to_string(),
    })
}

/// One blank-line separated candidate and its parse result
#[derive(Debug, Clone)]
pub struct BlockCandidate<'a> {
    // @field: Zero-based position among all candidates
    pub index: usize,

    // @field: Candidate text as split from the source
    pub raw: &'a str,

    // @field: Parsed block, `None` when the candidate is skipped
    pub block: Option<SubtitleBlock>,
}

/// Split and parse `content`, yielding every candidate in source order.
///
/// Candidates that do not parse are logged and yielded with `block: None`.
pub fn parse_candidates(content: &str) -> impl Iterator<Item = BlockCandidate<'_>> {
    split_into_blocks(content)
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let block = parse_block(raw);
            if block.is_none() {
                debug!("Skipping malformed subtitle block #{}", index + 1);
            }
            BlockCandidate { index, raw, block }
        })
}

/// Result of parsing a whole file
#[derive(Debug, Default)]
pub struct ParsedSubtitles {
    /// Blocks that matched, in source order
    pub blocks: Vec<SubtitleBlock>,

    /// Source-order indices of the candidates that were skipped
    pub skipped: Vec<usize>,
}

/// Parse every block of an SRT string, recording which candidates were skipped
pub fn parse_srt_string(content: &str) -> ParsedSubtitles {
    let mut parsed = ParsedSubtitles::default();

    for candidate in parse_candidates(content) {
        match candidate.block {
            Some(block) => parsed.blocks.push(block),
            None => parsed.skipped.push(candidate.index),
        }
    }

    parsed
}

/// Join rendered blocks back into SRT content
pub fn join_blocks<S: AsRef<str>>(rendered: &[S]) -> String {
    rendered
        .iter()
        .map(|block| block.as_ref())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
