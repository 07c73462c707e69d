//! Text processing: segmentation, normalization and grapheme-to-phoneme
//! conversion for the Mandarin-mixed-English and English pipelines.

pub mod chinese;
pub mod cmudict;
pub mod english;
pub mod jieba_seg;
pub mod normalize;
pub mod pinyin_map;
pub mod sentence;
pub mod sequence;
pub mod symbols;
pub mod tone_sandhi;

pub use chinese::ChineseMix;
pub use cmudict::CmuDict;
pub use english::{English, EnglishResolver};
pub use sentence::split_sentences;
pub use symbols::Language;

use crate::error::Result;
use crate::SubwordTokenizer;

/// Blank phoneme marking sentence boundaries and interspersed by the
/// assembler.
pub const BLANK: &str = "_";

/// Punctuation accepted after text filtering. Everything else is removed
/// during normalization.
pub(crate) const PUNCTUATIONS: &[char] = &[',', '.', '!', '?', ';', '-', '\''];

pub(crate) fn is_punctuation(c: char) -> bool {
    PUNCTUATIONS.contains(&c)
}

/// Aligned phoneme/tone/word2ph streams produced for one input segment.
///
/// `word2ph[i]` is the number of phoneme symbols the i-th alignment unit
/// (syllable, punctuation mark or subword bucket) expanded into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonemeRun {
    pub phones: Vec<String>,
    pub tones: Vec<i64>,
    pub word2ph: Vec<i32>,
}

impl PhonemeRun {
    /// A run holding a single sentence-boundary blank.
    pub fn blank_start() -> Self {
        Self {
            phones: vec![BLANK.to_string()],
            tones: vec![0],
            word2ph: vec![1],
        }
    }

    /// Append a sentence-boundary blank.
    pub fn push_blank(&mut self) {
        self.phones.push(BLANK.to_string());
        self.tones.push(0);
        self.word2ph.push(1);
    }

    /// Append another run.
    pub fn extend(&mut self, other: PhonemeRun) {
        self.phones.extend(other.phones);
        self.tones.extend(other.tones);
        self.word2ph.extend(other.word2ph);
    }
}

/// One language variant of the grapheme-to-phoneme pipeline.
///
/// New languages are added as new implementations, not by extending the
/// existing ones.
pub trait LanguageModule {
    /// Convert a normalized sentence into phoneme/tone/word2ph streams.
    fn g2p(&self, segment: &str, tokenizer: &dyn SubwordTokenizer) -> Result<PhonemeRun>;

    /// Normalize raw text for this language.
    fn text_normalize(&self, text: &str) -> String;

    /// Map a phoneme symbol to its id in this language's table.
    fn symbol_to_id(&self, symbol: &str) -> Result<i64>;

    /// The language this module implements.
    fn language(&self) -> Language;
}
