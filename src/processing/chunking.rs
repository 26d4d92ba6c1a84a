//! Character-budget chunking helpers.
//!
//! Callers express budgets in tokens; this module converts them to characters with a fixed
//! multiplier (`TOKEN_TO_CHARACTER_MULTIPLIER`) and splits text with `semchunk-rs`, which
//! prefers paragraph, line, sentence, and word boundaries in that order.
//!
//! - Prose: [`split_text`] chunks recursively and then applies a sliding overlap.
//! - Python: [`split_python_code`] first cuts at top-level `class`/`def` boundaries, packs
//!   whole blocks into chunks, and only falls back to recursive splitting for oversized blocks.
//!
//! Every returned chunk fits in the character budget, overlap included.

use semchunk_rs::Chunker;
use std::sync::Arc;

use super::types::ChunkingError;

type CharacterCounter = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// Approximate characters per token used to size chunks.
pub const TOKEN_TO_CHARACTER_MULTIPLIER: usize = 4;

/// Convert a token budget into a character budget.
pub fn character_budget(tokens: usize) -> usize {
    tokens.saturating_mul(TOKEN_TO_CHARACTER_MULTIPLIER)
}

/// Split prose into chunks of at most `chunk_size` characters.
///
/// `overlap` requests that each chunk after the first starts with up to `overlap` characters
/// from the end of the previous chunk. Returns an empty vector for whitespace-only input.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let counter = character_counter();
    let chunks = recursive_chunks(text, chunk_size, &counter);
    Ok(apply_overlap(chunks, chunk_size, overlap))
}

/// Split Python source, keeping top-level definitions together where they fit.
pub fn split_python_code(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let counter = character_counter();
    let mut chunks = Vec::new();
    let mut current = String::new();

    for block in python_blocks(text) {
        let block_size = counter.as_ref()(block);
        if block_size > chunk_size {
            flush(&mut current, &mut chunks);
            chunks.extend(recursive_chunks(block, chunk_size, &counter));
            continue;
        }
        if !current.is_empty() && counter.as_ref()(&current) + block_size > chunk_size {
            flush(&mut current, &mut chunks);
        }
        current.push_str(block);
    }
    flush(&mut current, &mut chunks);

    Ok(apply_overlap(chunks, chunk_size, overlap))
}

fn character_counter() -> CharacterCounter {
    Arc::new(|segment: &str| segment.chars().count())
}

fn recursive_chunks(text: &str, chunk_size: usize, counter: &CharacterCounter) -> Vec<String> {
    let counter_for_chunker = counter.clone();
    let chunker = Chunker::new(
        chunk_size,
        Box::new(move |segment: &str| counter_for_chunker.as_ref()(segment)),
    );
    chunker
        .chunk(text)
        .iter()
        .map(|chunk| chunk.trim())
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

fn flush(current: &mut String, chunks: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}

/// Cut source into blocks that each start at a top-level definition.
///
/// Decorators stay attached to the definition that follows them.
fn python_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut previous_was_decorator = false;

    for line in text.split_inclusive('\n') {
        let is_decorator = line.starts_with('@');
        let opens_definition = line.starts_with("class ")
            || line.starts_with("def ")
            || line.starts_with("async def ");
        if (is_decorator || opens_definition) && !previous_was_decorator && offset > start {
            blocks.push(&text[start..offset]);
            start = offset;
        }
        previous_was_decorator = is_decorator;
        offset += line.len();
    }
    if start < text.len() {
        blocks.push(&text[start..]);
    }
    blocks
}

/// Apply a character-limited overlap between the tail of the previous chunk and the current one.
///
/// The overlapped chunk is trimmed from the start so it never exceeds `chunk_size`.
fn apply_overlap(chunks: Vec<String>, chunk_size: usize, overlap: usize) -> Vec<String> {
    let effective_overlap = overlap.min(chunk_size.saturating_sub(1));
    if chunks.len() < 2 || effective_overlap == 0 {
        return chunks;
    }

    let mut overlapped = Vec::with_capacity(chunks.len());
    let mut iter = chunks.into_iter();
    let Some(mut previous) = iter.next() else {
        return overlapped;
    };
    overlapped.push(previous.clone());

    for current in iter {
        overlapped.push(build_overlapped_chunk(
            &previous,
            &current,
            effective_overlap,
            chunk_size,
        ));
        previous = current;
    }

    overlapped
}

fn build_overlapped_chunk(previous: &str, current: &str, overlap: usize, chunk_size: usize) -> String {
    let tail = tail_within_budget(previous, overlap);
    let mut combined = String::with_capacity(tail.len() + current.len() + 1);

    if !tail.is_empty() {
        combined.push_str(tail);
        if !ends_with_whitespace(tail) && !starts_with_whitespace(current) {
            combined.push(' ');
        }
    }

    combined.push_str(current);
    tail_within_budget(&combined, chunk_size).to_string()
}

/// Last `budget` characters of `text`, with leading whitespace trimmed.
fn tail_within_budget(text: &str, budget: usize) -> &str {
    let Some(last) = budget.checked_sub(1) else {
        return "";
    };
    let start = text
        .char_indices()
        .rev()
        .nth(last)
        .map_or(0, |(index, _)| index);
    text[start..].trim_start()
}

fn starts_with_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}

fn ends_with_whitespace(text: &str) -> bool {
    text.chars().next_back().is_some_and(char::is_whitespace)
}
