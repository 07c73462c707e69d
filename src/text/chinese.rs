//! Chinese (Mandarin mixed with English) language module.
//!
//! jieba's tagged word stream is partitioned into Chinese runs and English
//! runs. Chinese runs go through pre-merge, tone sandhi and the pinyin
//! symbol map; English runs go through the English resolver with their
//! tones shifted into the English range.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use log::warn;
use pinyin::ToPinyin;

use crate::error::Result;
use crate::text::cmudict::CmuDict;
use crate::text::english::EnglishResolver;
use crate::text::jieba_seg::Segmenter;
use crate::text::normalize;
use crate::text::pinyin_map::{split_initial_final, PinyinSymbolMap};
use crate::text::symbols::{self, Language};
use crate::text::tone_sandhi;
use crate::text::{is_punctuation, LanguageModule, PhonemeRun};
use crate::SubwordTokenizer;

lazy_static! {
    /// Readings the pinyin table gets wrong for this pipeline.
    static ref PINYIN_CORRECTIONS: HashMap<char, &'static str> = [
        ('儿', "er2"),
        ('嗯', "en1"),
    ]
    .into_iter()
    .collect();
}

/// One unit of a word's pinyin encoding.
enum PinyinPiece {
    Syllable(String),
    Punct(char),
}

pub struct ChineseMix {
    segmenter: Segmenter,
    pinyin_map: PinyinSymbolMap,
    resolver: EnglishResolver,
}

impl ChineseMix {
    /// Load the pinyin symbol map and pronunciation dictionary from
    /// `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let pinyin_map = PinyinSymbolMap::load(&data_dir.join("opencpop-strict.txt"))?;
        let cmudict = CmuDict::load(&data_dir.join("cmudict_cache.txt"))?;
        Ok(Self {
            segmenter: Segmenter::new(),
            pinyin_map,
            resolver: EnglishResolver::new(cmudict),
        })
    }

    pub fn with_fallback(mut self, fallback: Box<dyn crate::G2pFallback>) -> Self {
        self.resolver = self.resolver.with_fallback(fallback);
        self
    }

    /// Convert a Chinese run (already tagged) into phonemes.
    fn chinese_g2p(&self, segments: Vec<(String, String)>) -> Result<PhonemeRun> {
        let merged = tone_sandhi::pre_merge_for_modify(segments);
        let mut run = PhonemeRun::default();
        for (word, tag) in &merged {
            if word.is_empty()
                || matches!(word.chars().next(), Some(' ' | '\n' | '\r' | '\t'))
            {
                continue;
            }
            let (initials, mut finals) = self.initials_finals(word);
            tone_sandhi::modified_tone(word, tag, &self.segmenter, &mut finals);
            debug_assert_eq!(initials.len(), finals.len());
            for (initial, final_part) in initials.iter().zip(finals.iter()) {
                if initial == final_part {
                    // punctuation passes through as its own symbol
                    run.word2ph.push(1);
                    run.phones.push(initial.clone());
                    run.tones.push(0);
                    continue;
                }
                let (phones, tone) = self.pinyin_map.to_phonemes(initial, final_part)?;
                if phones.is_empty() {
                    continue;
                }
                run.word2ph.push(phones.len() as i32);
                run.tones
                    .extend(std::iter::repeat(tone).take(phones.len()));
                run.phones.extend(phones);
            }
        }
        Ok(run)
    }

    /// Encode a word into parallel initial/final lists, punctuation kept as
    /// identical initial/final pairs.
    fn initials_finals(&self, word: &str) -> (Vec<String>, Vec<String>) {
        let mut initials = Vec::new();
        let mut finals = Vec::new();
        for piece in encode_pinyin(word) {
            match piece {
                PinyinPiece::Syllable(syllable) => {
                    let (initial, final_part) = split_initial_final(&syllable);
                    initials.push(initial);
                    finals.push(final_part);
                }
                PinyinPiece::Punct(p) => {
                    initials.push(p.to_string());
                    finals.push(p.to_string());
                }
            }
        }
        (initials, finals)
    }
}

/// Encode a word character by character: Chinese characters become pinyin
/// with a trailing tone digit, accepted punctuation passes through, and
/// anything else is dropped.
fn encode_pinyin(word: &str) -> Vec<PinyinPiece> {
    let mut pieces = Vec::new();
    for c in word.chars() {
        if let Some(syllable) = pinyin_for_char(c) {
            pieces.push(PinyinPiece::Syllable(syllable));
        } else if is_punctuation(c) {
            pieces.push(PinyinPiece::Punct(c));
        } else if !c.is_whitespace() {
            warn!("no pinyin for character {c:?}, dropped");
        }
    }
    pieces
}

/// Pinyin with a trailing tone digit for one character, e.g. 你 → `"ni3"`.
/// ü is folded to v; neutral-tone readings get an explicit 5.
fn pinyin_for_char(c: char) -> Option<String> {
    if let Some(&fixed) = PINYIN_CORRECTIONS.get(&c) {
        return Some(fixed.to_string());
    }
    let buf = c.to_string();
    let pinyin = buf.as_str().to_pinyin().flatten().next()?;
    let mut out = pinyin.with_tone_num_end().replace('ü', "v");
    if !out
        .chars()
        .last()
        .map(|d| d.is_ascii_digit())
        .unwrap_or(false)
    {
        out.push('5');
    }
    Some(out)
}

/// True for purely lowercase-ASCII words (jieba output for English is
/// already lowercased by normalization).
fn is_english(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase())
}

fn is_chinese_char(c: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&c)
}

impl LanguageModule for ChineseMix {
    fn g2p(&self, segment: &str, tokenizer: &dyn SubwordTokenizer) -> Result<PhonemeRun> {
        let mut run = PhonemeRun::blank_start();
        let mut pending: Vec<(String, String)> = Vec::new();
        for (word, tag) in self.segmenter.tag(segment) {
            // jieba splits multi-word English on spaces; the space tokens
            // carry no content
            if word == " " {
                continue;
            }
            if tag == "eng" || is_english(&word) {
                if !pending.is_empty() {
                    run.extend(self.chinese_g2p(std::mem::take(&mut pending))?);
                }
                let pieces = match tokenizer.word_segment(&word) {
                    Ok(pieces) => pieces,
                    Err(err) => {
                        warn!("subword tokenizer failed on {word:?}: {err}, word skipped");
                        continue;
                    }
                };
                let mut en_run = self.resolver.g2p_en(&word, &pieces);
                for tone in &mut en_run.tones {
                    *tone += Language::En.tone_start();
                }
                run.extend(en_run);
            } else {
                pending.push((word, tag));
            }
        }
        if !pending.is_empty() {
            run.extend(self.chinese_g2p(pending)?);
        }
        run.push_blank();
        Ok(run)
    }

    /// Spell numbers, lowercase ASCII, then keep only Chinese characters,
    /// ASCII letters, accepted punctuation and spaces.
    fn text_normalize(&self, text: &str) -> String {
        let text = normalize::normalize_numbers_zh(text);
        text.chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|&c| {
                is_chinese_char(c) || c.is_ascii_alphabetic() || is_punctuation(c) || c == ' '
            })
            .collect()
    }

    fn symbol_to_id(&self, symbol: &str) -> Result<i64> {
        symbols::symbol_to_id(Language::Zh, symbol)
    }

    fn language(&self) -> Language {
        Language::Zh
    }
}
