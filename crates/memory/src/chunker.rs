//! Fixed-size character windows with overlap.
//!
//! Boundaries are pure character offsets: words and sentences may be split.
//! The same text and parameters always produce the same chunks.

use {pdfqa_config::ChunkingConfig, tracing::warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows.
    pub overlap: usize,
    /// Hard cap on emitted chunks.
    pub max_chunks: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        ChunkingConfig::default().into()
    }
}

impl From<ChunkingConfig> for ChunkParams {
    fn from(cfg: ChunkingConfig) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            overlap: cfg.overlap,
            max_chunks: cfg.max_chunks,
        }
    }
}

impl ChunkParams {
    /// Distance between window starts. Never zero, so chunking terminates
    /// even when `overlap >= chunk_size`.
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap).max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOutput {
    pub chunks: Vec<String>,
    /// Set when `max_chunks` stopped chunking before the end of the text.
    pub truncated: bool,
}

/// Split `text` into trimmed, non-empty windows of `chunk_size` characters,
/// each starting `step()` characters after the previous one.
pub fn chunk_text(text: &str, params: &ChunkParams) -> ChunkOutput {
    let mut out = ChunkOutput::default();
    if text.is_empty() {
        return out;
    }

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = bounds.len() - 1;
    let step = params.step();

    let mut start = 0;
    while start < total_chars {
        let end = start.saturating_add(params.chunk_size).min(total_chars);
        let window = text[bounds[start]..bounds[end]].trim();

        if !window.is_empty() {
            if out.chunks.len() >= params.max_chunks {
                warn!(
                    max_chunks = params.max_chunks,
                    total_chars, "chunk cap reached, truncating document"
                );
                out.truncated = true;
                break;
            }
            out.chunks.push(window.to_string());
        }

        start = start.saturating_add(step);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(chunk_size: usize, overlap: usize) -> ChunkParams {
        ChunkParams {
            chunk_size,
            overlap,
            max_chunks: 10_000,
        }
    }

    /// Text without whitespace so trimming never changes a window.
    fn dense_text(len: usize) -> String {
        (0..len)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect()
    }

    #[test]
    fn test_empty_text() {
        let out = chunk_text("", &ChunkParams::default());
        assert!(out.chunks.is_empty());
        assert!(!out.truncated);
    }

    #[test]
    fn test_short_text_single_chunk() {
        let out = chunk_text("  hello world  ", &ChunkParams::default());
        assert_eq!(out.chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_default_params_on_2500_chars() {
        let text = dense_text(2500);
        let out = chunk_text(&text, &ChunkParams::default());

        assert_eq!(out.chunks.len(), 4);
        assert_eq!(out.chunks[0].chars().count(), 1000);
        assert_eq!(out.chunks[1].chars().count(), 1000);
        assert_eq!(out.chunks[2].chars().count(), 900);
        assert_eq!(out.chunks[3].chars().count(), 100);
        assert_eq!(&out.chunks[1][..200], &out.chunks[0][800..]);
    }

    #[test]
    fn test_chunk_count_is_windows_over_step() {
        for len in [1, 799, 800, 801, 1000, 1600, 2500, 4001] {
            let text = dense_text(len);
            let p = params(1000, 200);
            let expected = len.div_ceil(p.step());
            assert_eq!(chunk_text(&text, &p).chunks.len(), expected, "len {len}");
        }
    }

    #[test]
    fn test_reconstructs_original_text() {
        let text = dense_text(3333);
        let p = params(500, 120);
        let chunks = chunk_text(&text, &p).chunks;

        let step = p.step();
        let (last, rest) = chunks.split_last().unwrap();
        let mut rebuilt: String = rest.iter().map(|c| &c[..step]).collect();
        rebuilt.push_str(last);
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_overlap_not_smaller_than_size_terminates() {
        let text = dense_text(50);
        let out = chunk_text(&text, &params(10, 10));
        assert_eq!(out.chunks.len(), 50);

        let out = chunk_text(&text, &params(10, 500));
        assert_eq!(out.chunks.len(), 50);
        assert_eq!(out.chunks[45], text[45..].to_string());
    }

    #[test]
    fn test_whitespace_windows_are_dropped() {
        let text = format!("{}{}", "x".repeat(10), " ".repeat(30));
        let out = chunk_text(&text, &params(10, 0));
        assert_eq!(out.chunks, vec!["x".repeat(10)]);
    }

    #[test]
    fn test_multibyte_chars_count_as_one() {
        let text = "é".repeat(25);
        let out = chunk_text(&text, &params(10, 0));
        assert_eq!(out.chunks.len(), 3);
        assert_eq!(out.chunks[0], "é".repeat(10));
        assert_eq!(out.chunks[2], "é".repeat(5));
    }

    #[test]
    fn test_cap_truncates() {
        let text = dense_text(100);
        let p = ChunkParams {
            chunk_size: 10,
            overlap: 0,
            max_chunks: 3,
        };
        let out = chunk_text(&text, &p);
        assert_eq!(out.chunks.len(), 3);
        assert!(out.truncated);

        let p = ChunkParams {
            max_chunks: 10,
            ..p
        };
        let out = chunk_text(&text, &p);
        assert_eq!(out.chunks.len(), 10);
        assert!(!out.truncated);
    }

    #[test]
    fn test_huge_chunk_size_does_not_overflow() {
        let text = dense_text(30);
        let p = ChunkParams {
            chunk_size: usize::MAX,
            overlap: 0,
            max_chunks: 10,
        };
        let out = chunk_text(&text, &p);
        assert_eq!(out.chunks, vec![text]);

        let p = ChunkParams {
            chunk_size: usize::MAX,
            overlap: 5,
            max_chunks: 10,
        };
        assert_eq!(chunk_text(&dense_text(30), &p).chunks.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(100);
        let p = params(120, 30);
        assert_eq!(chunk_text(&text, &p), chunk_text(&text, &p));
    }
}
