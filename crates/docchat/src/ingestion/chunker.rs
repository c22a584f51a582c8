//! Fixed-size overlapping window chunker

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Chunk, Document};

/// Splits documents into overlapping character windows.
///
/// A window of `window` chars slides with step `window - overlap`, so
/// consecutive chunks from one document share exactly `overlap` chars and no
/// boundary is lost between them. The final short remainder is emitted as one
/// last chunk; empty documents produce no chunks.
pub struct Chunker {
    window: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, enforcing `0 < overlap < window`
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window: config.window,
            overlap: config.overlap,
        })
    }

    /// Split documents into chunks, preserving document order and
    /// intra-document position order
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for document in documents {
            self.split_document(document, &mut chunks);
        }
        chunks
    }

    fn split_document(&self, document: &Document, out: &mut Vec<Chunk>) {
        // Window arithmetic is over chars, not bytes, so multi-byte text
        // chunks at the same boundaries as ASCII.
        let chars: Vec<char> = document.text.chars().collect();
        if chars.is_empty() {
            return;
        }

        let step = self.window - self.overlap;
        let mut start = 0;
        let mut seq = 0u32;

        loop {
            let end = (start + self.window).min(chars.len());
            out.push(Chunk {
                source: document.source.clone(),
                page: document.page,
                text: chars[start..end].iter().collect(),
                char_start: start,
                char_end: end,
                seq,
            });

            if end == chars.len() {
                break;
            }
            start += step;
            seq += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(window: usize, overlap: usize) -> Chunker {
        Chunker::new(&ChunkingConfig { window, overlap }).unwrap()
    }

    fn doc(text: &str) -> Document {
        Document::new("test.txt", text)
    }

    /// Expected count: ceil((L - O) / (W - O)) for L > W, else 1 (0 for L = 0)
    fn expected_count(len: usize, window: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= window {
            1
        } else {
            (len - overlap).div_ceil(window - overlap)
        }
    }

    #[test]
    fn empty_document_produces_no_chunks() {
        assert!(chunker(1000, 200).split(&[doc("")]).is_empty());
    }

    #[test]
    fn short_document_is_one_chunk() {
        let chunks = chunker(1000, 200).split(&[doc("three short sentences here")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "three short sentences here");
        assert_eq!(chunks[0].char_start, 0);
    }

    #[test]
    fn chunk_count_matches_formula() {
        let cases = [
            (0, 1000, 200),
            (1, 1000, 200),
            (999, 1000, 200),
            (1000, 1000, 200),
            (1001, 1000, 200),
            (1800, 1000, 200),
            (1801, 1000, 200),
            (5000, 1000, 200),
            (5432, 100, 37),
        ];
        for (len, window, overlap) in cases {
            let text: String = std::iter::repeat('x').take(len).collect();
            let chunks = chunker(window, overlap).split(&[doc(&text)]);
            assert_eq!(
                chunks.len(),
                expected_count(len, window, overlap),
                "len={len} window={window} overlap={overlap}"
            );
        }
    }

    #[test]
    fn consecutive_chunks_overlap_exactly() {
        let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = chunker(1000, 200).split(&[doc(&text)]);

        for pair in chunks.windows(2) {
            let head = &pair[0];
            let tail = &pair[1];
            assert_eq!(head.char_end - tail.char_start, 200);
            let head_chars: Vec<char> = head.text.chars().collect();
            let tail_chars: Vec<char> = tail.text.chars().collect();
            assert_eq!(&head_chars[head_chars.len() - 200..], &tail_chars[..200]);
        }
    }

    #[test]
    fn char_windows_not_byte_windows() {
        let text: String = std::iter::repeat('é').take(150).collect();
        let chunks = chunker(100, 20).split(&[doc(&text)]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 100);
        assert_eq!(chunks[1].text.chars().count(), 70);
    }

    #[test]
    fn ordering_preserves_documents_then_positions() {
        let long: String = std::iter::repeat('a').take(250).collect();
        let docs = [
            Document::new("first.txt", long.clone()),
            Document::new("second.txt", "short"),
        ];
        let chunks = chunker(100, 20).split(&docs);

        let labels: Vec<(String, u32)> =
            chunks.iter().map(|c| (c.source.clone(), c.seq)).collect();
        assert_eq!(
            labels,
            vec![
                ("first.txt".to_string(), 0),
                ("first.txt".to_string(), 1),
                ("first.txt".to_string(), 2),
                ("second.txt".to_string(), 0),
            ]
        );
    }
}
