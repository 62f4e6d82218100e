//! Splits normalized text into bounded windows for embedding.
//!
//! Both strategies are deterministic and order-preserving: consecutive
//! non-overlapping windows of `max_tokens` units, last window possibly
//! shorter, empty input producing zero chunks.

use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::errors::AppError;
use tiktoken_rs::{cl100k_base, CoreBPE};

pub const DEFAULT_MAX_TOKENS: usize = 500;

pub struct Chunker {
    max_tokens: usize,
    mode: Mode,
}

enum Mode {
    Words,
    Tokens(CoreBPE),
}

impl Chunker {
    pub fn new(config: &ChunkingConfig) -> Result<Self, AppError> {
        let mode = match config.strategy {
            ChunkStrategy::Words => Mode::Words,
            ChunkStrategy::Tokens => Mode::Tokens(cl100k_base().map_err(AppError::Internal)?),
        };
        Ok(Self {
            max_tokens: config.max_tokens,
            mode,
        })
    }

    /// Word-window chunker with the default window size.
    pub fn words() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            mode: Mode::Words,
        }
    }

    pub fn split(&self, text: &str) -> Result<Vec<String>, AppError> {
        match &self.mode {
            Mode::Words => Ok(self.split_words(text)),
            Mode::Tokens(bpe) => self.split_tokens(bpe, text),
        }
    }

    fn split_words(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .chunks(self.max_tokens)
            .map(|window| window.join(" "))
            .collect()
    }

    /// Subword-accurate windows: tokenize once, window the token stream,
    /// detokenize each window back to text.
    ///
    /// BPE tokens are byte-level, so a window edge can fall inside a
    /// multi-byte character. Windows are decoded to bytes and any partial
    /// trailing sequence is carried into the next window, keeping every
    /// chunk valid UTF-8 and the concatenation byte-identical to the input.
    fn split_tokens(&self, bpe: &CoreBPE, text: &str) -> Result<Vec<String>, AppError> {
        let tokens = bpe.encode_with_special_tokens(text);
        let mut chunks = Vec::new();
        let mut carry: Vec<u8> = Vec::new();

        for window in tokens.chunks(self.max_tokens) {
            let decoded: Vec<u8> = bpe
                ._decode_native_and_split(window.to_vec())
                .flatten()
                .collect();

            let mut bytes = std::mem::take(&mut carry);
            bytes.extend(decoded);

            match String::from_utf8(bytes) {
                Ok(chunk) => {
                    if !chunk.is_empty() {
                        chunks.push(chunk);
                    }
                }
                Err(err) => {
                    let utf8_error = err.utf8_error();
                    let mut bytes = err.into_bytes();
                    if utf8_error.error_len().is_none() {
                        // Incomplete character at the window edge.
                        carry = bytes.split_off(utf8_error.valid_up_to());
                    }
                    if !bytes.is_empty() {
                        chunks.push(String::from_utf8_lossy(&bytes).into_owned());
                    }
                }
            }
        }

        if !carry.is_empty() {
            chunks.push(String::from_utf8_lossy(&carry).into_owned());
        }

        Ok(chunks)
    }
}
