//! Linguistic front-end for MeloTTS-style multilingual TTS.
//!
//! Converts raw text into the aligned sequences a downstream acoustic model
//! consumes: phoneme ids, tone ids, language ids and word-to-phoneme counts.
//!
//! Pipeline:
//! 1. Sentence segmentation (punctuation trie, bounded piece length)
//! 2. Text normalization (numbers, punctuation filtering)
//! 3. Grapheme-to-phoneme conversion (Mandarin tone sandhi + pinyin mapping,
//!    English pronunciation dictionary with neural fallback)
//! 4. Sequence assembly (symbol ids, tone offsets, blank interspersion)
//!
//! The neural pieces of the surrounding system (vocoder, BERT, neural G2P,
//! subword tokenizer) stay outside this crate and are consumed through the
//! [`SubwordTokenizer`] and [`G2pFallback`] traits.

pub mod config;
pub mod error;
pub mod frontend;
pub mod text;

pub use config::FrontendConfig;
pub use error::{Error, Result};
pub use frontend::{SentenceUnit, TtsFrontend};
pub use text::sequence::AssembledSequence;
pub use text::symbols::Language;
pub use text::{LanguageModule, PhonemeRun};

/// Subword tokenizer collaborator (WordPiece-style).
///
/// Continuation pieces carry a `##` prefix, e.g. `compiler` → `["comp",
/// "##iler"]`. Supplied by the BERT tokenizer runtime.
pub trait SubwordTokenizer {
    /// Split text into subword pieces.
    fn word_segment(&self, text: &str) -> Result<Vec<String>>;
}

/// Neural grapheme-to-phoneme fallback collaborator.
///
/// Consulted for English words absent from the pronunciation dictionary.
/// Returns CMU-style phonemes with trailing stress digits.
pub trait G2pFallback {
    /// Predict the phoneme sequence for a single word.
    fn infer(&self, word: &str) -> Result<Vec<String>>;
}
