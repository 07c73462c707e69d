//! Phoneme symbol inventories and language constants.
//!
//! Symbol ids must match the embedding tables of the acoustic model
//! checkpoints, so the arrays below are ordered by id and never re-sorted.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{Error, Result};

pub const NUM_ZH_TONES: i64 = 6;
pub const NUM_JA_TONES: i64 = 1;

/// Supported front-end languages. `Zh` is Mandarin with embedded English
/// ("ZH_MIX_EN" in the upstream checkpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Zh,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Zh => "ZH",
            Language::En => "EN",
        }
    }

    /// Parse a language name; anything outside the recognized set is an
    /// error.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "ZH" => Ok(Language::Zh),
            "EN" => Ok(Language::En),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Language id fed to the acoustic model (1 is reserved for Japanese).
    pub fn id(self) -> i64 {
        match self {
            Language::En => 2,
            Language::Zh => 3,
        }
    }

    /// Offset added to this language's tones in the shared tone embedding
    /// (Japanese sits between the Chinese and English ranges).
    pub fn tone_start(self) -> i64 {
        match self {
            Language::Zh => 0,
            Language::En => NUM_ZH_TONES + NUM_JA_TONES,
        }
    }
}

/// Symbols of the ZH_MIX_EN model, ordered by id.
const ZH_SYMBOLS: &[&str] = &[
    "_", "AA", "E", "EE", "En", "N", "OO", "V", "a", "a,", "aa", "ae", "ah", "ai", "an", "ang",
    "ao", "aw", "ay", "b", "by", "c", "ch", "d", "dh", "dy", "e", "e,", "eh", "ei", "en", "eng",
    "er", "ey", "f", "g", "gy", "h", "hh", "hy", "i", "i0", "i,", "ia", "ian", "iang", "iao",
    "ie", "ih", "in", "ing", "iong", "ir", "iu", "iy", "j", "jh", "k", "ky", "l", "m", "my", "n",
    "ng", "ny", "o", "o,", "ong", "ou", "ow", "oy", "p", "py", "q", "r", "ry", "s", "sh", "t",
    "th", "ts", "ty", "u", "u,", "ua", "uai", "uan", "uang", "uh", "ui", "un", "uo", "uw", "v",
    "van", "ve", "vn", "w", "x", "y", "z", "zh", "zy", "!", "?", "…", ",", ".", "'", "-", "SP",
    "UNK",
];

/// Symbols of the EN model, ordered by id. The IPA and Hangul rows are
/// carried by the checkpoint's embedding table even though the CMU-style
/// pipeline never emits them.
const EN_SYMBOLS: &[&str] = &[
    "_", "\"", "(", ")", "*", "/", ":", "AA", "E", "EE", "En", "N", "OO", "Q", "V", "[", "\\",
    "]", "^", "a", "a:", "aa", "ae", "ah", "ai", "an", "ang", "ao", "aw", "ay", "b", "by", "c",
    "ch", "d", "dh", "dy", "e", "e:", "eh", "ei", "en", "eng", "er", "ey", "f", "g", "gy", "h",
    "hh", "hy", "i", "i0", "i:", "ia", "ian", "iang", "iao", "ie", "ih", "in", "ing", "iong",
    "ir", "iu", "iy", "j", "jh", "k", "ky", "l", "m", "my", "n", "ng", "ny", "o", "o:", "ong",
    "ou", "ow", "oy", "p", "py", "q", "r", "ry", "s", "sh", "t", "th", "ts", "ty", "u", "u:",
    "ua", "uai", "uan", "uang", "uh", "ui", "un", "uo", "uw", "v", "van", "ve", "vn", "w", "x",
    "y", "z", "zh", "zy", "~", "¡", "¿", "æ", "ç", "ð", "ø", "ŋ", "œ", "ɐ", "ɑ", "ɒ", "ɔ", "ɕ",
    "ə", "ɛ", "ɜ", "ɡ", "ɣ", "ɥ", "ɦ", "ɪ", "ɫ", "ɬ", "ɭ", "ɯ", "ɲ", "ɵ", "ɸ", "ɹ", "ɾ", "ʁ",
    "ʃ", "ʊ", "ʌ", "ʎ", "ʏ", "ʑ", "ʒ", "ʝ", "ʲ", "ˈ", "ˌ", "ː", "\u{0303}", "\u{0329}", "β",
    "θ", "ᄀ", "ᄁ", "ᄂ", "ᄃ", "ᄄ", "ᄅ", "ᄆ", "ᄇ", "ᄈ", "ᄉ", "ᄊ", "ᄋ", "ᄌ", "ᄍ", "ᄎ", "ᄏ",
    "ᄐ", "ᄑ", "ᄒ", "ᅡ", "ᅢ", "ᅣ", "ᅤ", "ᅥ", "ᅦ", "ᅧ", "ᅨ", "ᅩ", "ᅪ", "ᅫ", "ᅬ", "ᅭ", "ᅮ",
    "ᅯ", "ᅰ", "ᅱ", "ᅲ", "ᅳ", "ᅴ", "ᅵ", "ᆨ", "ᆫ", "ᆮ", "ᆯ", "ᆷ", "ᆸ", "ᆼ", "ㄸ", "!", "?",
    "…", ",", ".", "'", "-", "SP", "UNK",
];

lazy_static! {
    static ref ZH_SYMBOL_TO_ID: HashMap<&'static str, i64> = ZH_SYMBOLS
        .iter()
        .enumerate()
        .map(|(id, &sym)| (sym, id as i64))
        .collect();
    static ref EN_SYMBOL_TO_ID: HashMap<&'static str, i64> = EN_SYMBOLS
        .iter()
        .enumerate()
        .map(|(id, &sym)| (sym, id as i64))
        .collect();
}

/// Map a phoneme symbol to its id in `language`'s table. An absent symbol
/// is a hard error: it means the pipeline produced something the acoustic
/// model cannot embed.
pub fn symbol_to_id(language: Language, symbol: &str) -> Result<i64> {
    let table = match language {
        Language::Zh => &*ZH_SYMBOL_TO_ID,
        Language::En => &*EN_SYMBOL_TO_ID,
    };
    table
        .get(symbol)
        .copied()
        .ok_or_else(|| Error::missing_mapping("symbol table", symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zh_table_ids() {
        assert_eq!(symbol_to_id(Language::Zh, "_").unwrap(), 0);
        assert_eq!(symbol_to_id(Language::Zh, "AA").unwrap(), 1);
        assert_eq!(symbol_to_id(Language::Zh, "zh").unwrap(), 101);
        assert_eq!(symbol_to_id(Language::Zh, "UNK").unwrap(), 111);
    }

    #[test]
    fn en_table_ids() {
        assert_eq!(symbol_to_id(Language::En, "_").unwrap(), 0);
        assert_eq!(symbol_to_id(Language::En, "aa").unwrap(), 21);
        assert_eq!(symbol_to_id(Language::En, "UNK").unwrap(), 218);
    }

    #[test]
    fn unknown_symbol_is_error() {
        assert!(symbol_to_id(Language::Zh, "xx").is_err());
    }

    #[test]
    fn tables_have_no_duplicates() {
        assert_eq!(ZH_SYMBOLS.len(), ZH_SYMBOL_TO_ID.len());
        assert_eq!(EN_SYMBOLS.len(), EN_SYMBOL_TO_ID.len());
    }

    #[test]
    fn tone_offsets() {
        assert_eq!(Language::Zh.tone_start(), 0);
        assert_eq!(Language::En.tone_start(), 7);
        assert_eq!(Language::Zh.id(), 3);
        assert_eq!(Language::En.id(), 2);
    }
}
