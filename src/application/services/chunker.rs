use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("no valid chunks")]
    NoChunks,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub max_chunk_size: usize,
    pub overlap: usize,
    pub min_chunk_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
            overlap: 200,
            min_chunk_size: 100,
        }
    }
}

/// Splits normalized text into bounded, overlapping segments, preferring
/// natural boundaries: sentence terminator, then paragraph break, then
/// word boundary, then a hard cut at the size cap.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

impl TextChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn split(&self, text: &str) -> Result<Vec<String>, ChunkingError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChunkingError::NoChunks);
        }

        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        if len <= self.config.max_chunk_size {
            return Ok(vec![trimmed.to_string()]);
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < len {
            let mut end = (start + self.config.max_chunk_size).min(len);
            if end < len {
                end = self.boundary(&chars, start, end);
            }

            let slice: String = chars[start..end].iter().collect();
            let piece = slice.trim();
            if piece.chars().count() >= self.config.min_chunk_size {
                chunks.push(piece.to_string());
            }

            if end >= len {
                break;
            }
            // `max` guarantees forward progress even when overlap >= max size.
            start = (start + 1).max(end.saturating_sub(self.config.overlap));
        }

        if chunks.is_empty() {
            return Err(ChunkingError::NoChunks);
        }
        Ok(chunks)
    }

    /// Best cut position in `(start, end]`, searching backward from the
    /// size cap. Boundaries closer than `min_chunk_size` to the start are
    /// ignored so a chunk is never degenerate.
    fn boundary(&self, chars: &[char], start: usize, end: usize) -> usize {
        let floor = start + self.config.min_chunk_size;
        if floor >= end {
            return end;
        }

        for i in (floor..end).rev() {
            if matches!(chars[i], '.' | '!' | '?') {
                return i + 1;
            }
        }
        for i in (floor..end).rev() {
            if chars[i] == '\n' {
                return i + 1;
            }
        }
        for i in (floor..end).rev() {
            if chars[i] == ' ' {
                return i + 1;
            }
        }
        end
    }
}
