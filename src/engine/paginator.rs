//! Paginator - splits a CharacterStream into page-sized chunks
//!
//! Capacity counts demonstration cells only: with alternate rows skipped a
//! page of `rows` rows holds `columns * ceil(rows / 2)` characters.

use super::config::LayoutConfig;
use tracing::debug;

/// Characters placed on one page, in cell order
pub type PageChunk = Vec<String>;

/// Number of pages a stream of `len` characters needs. Zero for an empty stream.
pub fn page_count(len: usize, config: &LayoutConfig) -> usize {
    if len == 0 {
        return 0;
    }
    let capacity = config.page_capacity();
    len.div_ceil(capacity).max(1)
}

/// Partition the stream into page chunks
///
/// The final chunk is padded with its last character when `fill_last_page`
/// is set and it is shorter than the page capacity.
pub fn paginate(stream: &[String], config: &LayoutConfig) -> Vec<PageChunk> {
    let capacity = config.page_capacity();
    let total = page_count(stream.len(), config);

    let mut chunks: Vec<PageChunk> = stream
        .chunks(capacity)
        .take(total)
        .map(|chunk| chunk.to_vec())
        .collect();

    if config.fill_last_page {
        if let Some(last_chunk) = chunks.last_mut() {
            if let Some(last_char) = last_chunk.last().cloned() {
                last_chunk.resize(capacity, last_char);
            }
        }
    }

    debug!(
        characters = stream.len(),
        capacity,
        pages = chunks.len(),
        "paginated character stream"
    );
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stream::build_stream;

    fn config(columns: u32, rows: u32) -> LayoutConfig {
        LayoutConfig {
            columns,
            rows,
            fill_last_page: false,
            skip_alternate_rows: false,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_two_page_split() {
        let stream = build_stream("AB", 3);
        let chunks = paginate(&stream, &config(5, 1));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], vec!["A", "A", "A", "B", "B"]);
        assert_eq!(chunks[1], vec!["B"]);
    }

    #[test]
    fn test_fill_last_page_pads_with_last_char() {
        let stream = build_stream("AB", 3);
        let cfg = LayoutConfig {
            fill_last_page: true,
            ..config(5, 1)
        };
        let chunks = paginate(&stream, &cfg);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], vec!["B"; 5]);
    }

    #[test]
    fn test_fill_leaves_full_last_page_alone() {
        let stream = build_stream("ABCDE", 1);
        let cfg = LayoutConfig {
            fill_last_page: true,
            ..config(5, 1)
        };
        let chunks = paginate(&stream, &cfg);
        assert_eq!(chunks, vec![vec!["A", "B", "C", "D", "E"]]);
    }

    #[test]
    fn test_empty_stream_has_no_pages() {
        let cfg = LayoutConfig {
            fill_last_page: true,
            ..config(5, 3)
        };
        assert!(paginate(&[], &cfg).is_empty());
        assert_eq!(page_count(0, &cfg), 0);
    }

    #[test]
    fn test_skip_rows_halves_capacity() {
        let cfg = LayoutConfig {
            skip_alternate_rows: true,
            ..config(4, 5)
        };
        let stream = build_stream("一二三四五六七八九十甲乙丙", 1);
        let chunks = paginate(&stream, &cfg);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 12);
        assert_eq!(chunks[1], vec!["丙"]);
    }

    #[test]
    fn test_total_length_is_preserved_without_fill() {
        for len in 1..40 {
            let stream: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let chunks = paginate(&stream, &config(3, 4));
            let total: usize = chunks.iter().map(Vec::len).sum();
            assert_eq!(total, len);
            assert_eq!(chunks.len(), len.div_ceil(12));
            let flattened: Vec<String> = chunks.concat();
            assert_eq!(flattened, stream);
        }
    }

    #[test]
    fn test_total_length_covers_stream_with_fill() {
        let cfg = LayoutConfig {
            fill_last_page: true,
            ..config(3, 4)
        };
        for len in 1..40 {
            let stream: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let chunks = paginate(&stream, &cfg);
            let total: usize = chunks.iter().map(Vec::len).sum();
            assert!(total >= len);
            assert!(chunks.iter().all(|c| c.len() == 12));
        }
    }

    #[test]
    fn test_chunk_boundaries_are_stable() {
        let stream = build_stream("天地玄黄宇宙洪荒", 2);
        let cfg = config(3, 2);
        assert_eq!(paginate(&stream, &cfg), paginate(&stream, &cfg));
    }
}
