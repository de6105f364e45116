//! Overlapping sliding-window text chunking.
//!
//! Overlap matters because embeddings operate on fixed windows; without it
//! a sentence cut midstream loses the context on either side of the cut.

use crate::types::{ChunkRecord, Result, RetrievalError};

/// Splits document text into overlapping fixed-size character windows.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker, validating its parameters up front.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidConfiguration`] when `chunk_size`
    /// is zero or `chunk_overlap` is not strictly smaller than it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RetrievalError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// The configured window size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The configured overlap between adjacent windows.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into overlapping chunks attributed to `source_file`.
    ///
    /// Offsets are character offsets, so slicing never splits a code
    /// point. Every character is covered by at least one chunk and
    /// adjacent chunks overlap by exactly `chunk_overlap` characters,
    /// except possibly the final chunk, which may be shorter.
    ///
    /// When `page_lengths` holds the per-page character counts of the
    /// source document, each chunk is attributed to the 1-based page it
    /// starts on. A chunk may span a page boundary; attribution is a
    /// best-effort starting-page heuristic.
    pub fn split(
        &self,
        text: &str,
        source_file: &str,
        page_lengths: Option<&[usize]>,
    ) -> Vec<ChunkRecord> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let step = self.chunk_size - self.chunk_overlap;

        let mut records = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < total {
            let end = (start + self.chunk_size).min(total);
            let page = page_lengths
                .filter(|pages| !pages.is_empty())
                .map(|pages| infer_page(start, pages));

            records.push(ChunkRecord {
                text: chars[start..end].iter().collect(),
                source_file: source_file.to_string(),
                chunk_index,
                start,
                end,
                page,
            });

            start += step;
            chunk_index += 1;
        }

        records
    }
}

/// Map a chunk's starting offset to the 1-based page whose cumulative
/// character length first exceeds it. Offsets past the final page
/// attribute to the last page.
fn infer_page(start: usize, page_lengths: &[usize]) -> usize {
    let mut cumulative = 0;
    for (idx, len) in page_lengths.iter().enumerate() {
        cumulative += len;
        if start < cumulative {
            return idx + 1;
        }
    }
    page_lengths.len()
}
