//! Streaming emulation.
//!
//! The upstream API returns one complete text blob; this module re-slices an
//! already resolved completion into fixed-size character chunks with a short
//! cooperative sleep between emissions. Presentation pacing only; the full
//! text exists before the first chunk is emitted.

use futures::Stream;
use sai_types::{CompletionResult, StreamChunk};
use std::pin::Pin;
use std::time::Duration;

/// Pause between chunk emissions.
const CHUNK_PACING: Duration = Duration::from_millis(1);

/// Re-expose a resolved completion as an ordered chunk sequence.
///
/// Slices are `chunk_size` characters (UTF-8 safe, a code point is never
/// split). `is_final` is true only on the last chunk, which also carries the
/// finish reason; the full usage payload rides on every chunk. Empty text
/// yields an empty stream. Finite and not restartable.
pub fn chunk_stream(
    result: CompletionResult,
    chunk_size: usize,
) -> Pin<Box<dyn Stream<Item = StreamChunk> + Send>> {
    let slices = split_chars(&result.text, chunk_size);
    let total = slices.len();

    Box::pin(async_stream::stream! {
        for (index, text) in slices.into_iter().enumerate() {
            tokio::time::sleep(CHUNK_PACING).await;
            let is_final = index + 1 == total;
            yield StreamChunk {
                text,
                index,
                is_final,
                finish_reason: is_final.then_some(result.finish_reason),
                usage: result.usage.clone(),
            };
        }
    })
}

/// Split a string into slices of at most `size` characters.
fn split_chars(text: &str, size: usize) -> Vec<String> {
    debug_assert!(size > 0);
    let mut slices = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == size {
            slices.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        slices.push(current);
    }
    slices
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use sai_types::{FinishReason, UsageHeaders};

    fn result(text: &str) -> CompletionResult {
        CompletionResult {
            text: text.to_string(),
            finish_reason: FinishReason::Stop,
            usage: UsageHeaders { prompt_tokens: 3, completion_tokens: 2, total_tokens: 5, ..UsageHeaders::default() },
        }
    }

    async fn collect(text: &str, size: usize) -> Vec<StreamChunk> {
        chunk_stream(result(text), size).collect().await
    }

    #[tokio::test]
    async fn test_reconcatenation_reproduces_text() {
        let text = "The quick brown fox jumps over the lazy dog, twice over.";
        let chunks = collect(text, 10).await;

        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[tokio::test]
    async fn test_exactly_one_final_chunk_and_it_is_last() {
        let chunks = collect("abcdefghij", 3).await;

        let finals: Vec<_> = chunks.iter().filter(|c| c.is_final).collect();
        assert_eq!(finals.len(), 1);
        assert!(chunks.last().unwrap().is_final);
    }

    #[tokio::test]
    async fn test_finish_reason_only_on_final_chunk() {
        let chunks = collect("abcdefghij", 4).await;

        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.finish_reason, None);
        }
        assert_eq!(chunks.last().unwrap().finish_reason, Some(FinishReason::Stop));
    }

    #[tokio::test]
    async fn test_indices_are_sequential_from_zero() {
        let chunks = collect("abcdefghijklmno", 4).await;
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, expected);
        }
    }

    #[tokio::test]
    async fn test_usage_attached_to_every_chunk() {
        let chunks = collect("abcdefgh", 3).await;
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert_eq!(chunk.usage.total_tokens, 5);
        }
    }

    #[tokio::test]
    async fn test_multibyte_text_never_splits_code_points() {
        let text = "héllo wörld 🚀 ünïcode résponse ça va très bien";
        let chunks = collect(text, 5).await;

        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, text);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 5);
        }
    }

    #[tokio::test]
    async fn test_empty_text_yields_no_chunks() {
        let chunks = collect("", 50).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_text_shorter_than_chunk_size_is_one_final_chunk() {
        let chunks = collect("short", 50).await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_final);
        assert_eq!(chunks[0].text, "short");
    }
}
