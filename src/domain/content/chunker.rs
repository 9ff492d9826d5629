const SENTENCE_BOUNDARY: &str = ". ";
const PARAGRAPH_BOUNDARY: &str = "\n\n";

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 50_000;
pub const DEFAULT_PARAGRAPH_THRESHOLD: usize = 250_000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 800;

/// A slice of source text sent to the backend in one call.
///
/// The first `overlap` bytes of `text` are context copied from the end of the
/// previous chunk; the rest is the chunk's own body.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub overlap: usize,
}

impl TextChunk {
    fn whole(text: String) -> Self {
        Self { text, overlap: 0 }
    }

    /// The chunk without its overlap prefix
    pub fn body(&self) -> &str {
        &self.text[self.overlap..]
    }
}

/// Splits oversized content into chunks that fit one generation call
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chunk_size: usize,
    paragraph_threshold: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CHUNK_SIZE,
            DEFAULT_PARAGRAPH_THRESHOLD,
            DEFAULT_CHUNK_OVERLAP,
        )
    }
}

impl Chunker {
    pub fn new(max_chunk_size: usize, paragraph_threshold: usize, overlap: usize) -> Self {
        Self {
            max_chunk_size,
            paragraph_threshold,
            overlap,
        }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Sentence chunking for ordinary documents, paragraph chunking with
    /// overlap once the document is above the paragraph threshold.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if text.len() > self.paragraph_threshold {
            tracing::debug!(
                text_length = text.len(),
                paragraph_threshold = self.paragraph_threshold,
                "Using paragraph chunking"
            );
            split_paragraphs(text, self.max_chunk_size, self.overlap)
        } else {
            split_sentences(text, self.max_chunk_size)
                .into_iter()
                .map(TextChunk::whole)
                .collect()
        }
    }
}

/// Split text on `". "` boundaries into chunks of at most `max_chunk_size` bytes.
///
/// Text that already fits is returned unchanged as a single chunk. A single
/// sentence longer than the limit is kept whole, so the bound is soft. The
/// chunks concatenate back to the input exactly.
pub fn split_sentences(text: &str, max_chunk_size: usize) -> Vec<String> {
    accumulate(text.split_inclusive(SENTENCE_BOUNDARY), text.len(), max_chunk_size)
}

/// Split text on blank-line paragraph boundaries, prefixing every chunk after
/// the first with the last `overlap` bytes of the previous chunk's body.
///
/// A paragraph longer than `max_chunk_size` (or text with no blank lines at
/// all) is broken further on sentence boundaries.
pub fn split_paragraphs(text: &str, max_chunk_size: usize, overlap: usize) -> Vec<TextChunk> {
    let pieces = text
        .split_inclusive(PARAGRAPH_BOUNDARY)
        .flat_map(|paragraph| {
            if paragraph.len() > max_chunk_size {
                paragraph.split_inclusive(SENTENCE_BOUNDARY).collect()
            } else {
                vec![paragraph]
            }
        });
    let bodies = accumulate(pieces, text.len(), max_chunk_size);

    let mut chunks: Vec<TextChunk> = Vec::with_capacity(bodies.len());
    for body in bodies {
        match chunks.last() {
            Some(previous) if overlap > 0 => {
                let context = tail(previous.body(), overlap);
                let mut text = String::with_capacity(context.len() + body.len());
                text.push_str(context);
                text.push_str(&body);
                chunks.push(TextChunk {
                    overlap: context.len(),
                    text,
                });
            }
            _ => chunks.push(TextChunk::whole(body)),
        }
    }

    chunks
}

fn accumulate<'a>(
    pieces: impl Iterator<Item = &'a str>,
    total_length: usize,
    max_chunk_size: usize,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    if total_length <= max_chunk_size {
        current.extend(pieces);
        return vec![current];
    }

    for piece in pieces {
        if !current.is_empty() && current.len() + piece.len() > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(piece);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Last `max_bytes` bytes of `text`, moved forward to the next char boundary
fn tail(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
