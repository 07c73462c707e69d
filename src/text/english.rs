//! English grapheme-to-phoneme resolution.
//!
//! Words are looked up as whole subword groups in the pronunciation
//! dictionary; out-of-vocabulary words go to the neural G2P fallback when
//! one is wired in. Phoneme counts are distributed evenly over a word's
//! subword pieces so the alignment stays piece-granular.

use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::text::cmudict::CmuDict;
use crate::text::normalize;
use crate::text::symbols::{self, Language};
use crate::text::{LanguageModule, PhonemeRun};
use crate::{G2pFallback, SubwordTokenizer};

/// Prefix marking a continuation piece in WordPiece output.
const CONTINUATION_MARKER: &str = "##";

/// Words at most this long whose pieces miss the dictionary are read as
/// abbreviations, letter by letter.
const ABBREVIATION_MAX_LEN: usize = 5;

/// Group subword pieces into whole-word groups, stripping the continuation
/// marker. An orphan continuation piece is dropped.
pub fn group_subword_pieces(pieces: &[String]) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    for piece in pieces {
        match piece.strip_prefix(CONTINUATION_MARKER) {
            Some(continuation) => match groups.last_mut() {
                Some(group) => group.push(continuation.to_string()),
                None => warn!("continuation piece {piece:?} has no preceding piece"),
            },
            None => groups.push(vec![piece.clone()]),
        }
    }
    groups
}

/// Strip the trailing stress digit from dictionary syllables: a digit
/// becomes tone digit+1, anything else tone 0.
pub fn refine_syllables(syllables: &[String]) -> (Vec<String>, Vec<i64>) {
    let mut phones = Vec::with_capacity(syllables.len());
    let mut tones = Vec::with_capacity(syllables.len());
    for syllable in syllables {
        match syllable.chars().last() {
            Some(d) if d.is_ascii_digit() => {
                phones.push(syllable[..syllable.len() - 1].to_string());
                tones.push(i64::from(d as u8 - b'0') + 1);
            }
            _ => {
                phones.push(syllable.clone());
                tones.push(0);
            }
        }
    }
    (phones, tones)
}

/// Distribute `n_phone` phonemes over `n_word` buckets as evenly as
/// possible: repeatedly increment the smallest bucket, first minimum
/// winning ties.
pub fn distribute_phone(n_phone: usize, n_word: usize) -> Vec<i32> {
    if n_word == 0 {
        return Vec::new();
    }
    if n_word == 1 {
        return vec![n_phone as i32];
    }
    let mut buckets = vec![0i32; n_word];
    for _ in 0..n_phone {
        let mut min_idx = 0;
        for (i, &b) in buckets.iter().enumerate() {
            if b < buckets[min_idx] {
                min_idx = i;
            }
        }
        buckets[min_idx] += 1;
    }
    buckets
}

struct GroupResult {
    phones: Vec<String>,
    tones: Vec<i64>,
    dict_missed: bool,
}

/// Dictionary plus optional neural fallback.
pub struct EnglishResolver {
    cmudict: CmuDict,
    fallback: Option<Box<dyn G2pFallback>>,
}

impl EnglishResolver {
    pub fn new(cmudict: CmuDict) -> Self {
        Self {
            cmudict,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn G2pFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn resolve_group(&self, word: &str) -> GroupResult {
        if let Some(syllables) = self.cmudict.find(word) {
            let (phones, tones) = refine_syllables(syllables);
            return GroupResult {
                phones,
                tones,
                dict_missed: false,
            };
        }
        if let Some(fallback) = &self.fallback {
            match fallback.infer(word) {
                Ok(syllables) if !syllables.is_empty() => {
                    let (phones, tones) = refine_syllables(&syllables);
                    return GroupResult {
                        phones,
                        tones,
                        dict_missed: true,
                    };
                }
                Ok(_) => warn!("g2p fallback returned nothing for {word:?}"),
                Err(err) => warn!("g2p fallback failed for {word:?}: {err}"),
            }
        } else {
            warn!("pronunciation dictionary has no entry for {word:?}");
        }
        GroupResult {
            phones: Vec::new(),
            tones: Vec::new(),
            dict_missed: true,
        }
    }

    /// Resolve one word given its subword pieces. Phoneme counts are
    /// distributed over each group's piece count; short words whose pieces
    /// miss the dictionary are spelled out letter by letter.
    pub fn g2p_en(&self, word: &str, pieces: &[String]) -> PhonemeRun {
        let mut run = PhonemeRun::default();
        let mut dict_missed = false;
        for group in group_subword_pieces(pieces) {
            let joined: String = group.concat();
            let result = self.resolve_group(&joined);
            dict_missed |= result.dict_missed;
            run.word2ph
                .extend(distribute_phone(result.phones.len(), group.len()));
            run.phones.extend(result.phones);
            run.tones.extend(result.tones);
        }

        // abbreviation heuristic: a short word the dictionary does not
        // know is usually pronounced letter by letter
        if dict_missed && word.chars().count() <= ABBREVIATION_MAX_LEN {
            run = PhonemeRun::default();
            let mut phone_len = 0;
            for letter in word.chars() {
                if let Some(syllables) = self.cmudict.find(&letter.to_string()) {
                    let (phones, tones) = refine_syllables(syllables);
                    phone_len += phones.len();
                    run.phones.extend(phones);
                    run.tones.extend(tones);
                }
            }
            if !run.phones.is_empty() {
                info!("{word:?} treated as an abbreviation, spelled letter by letter");
            }
            run.word2ph = distribute_phone(phone_len, pieces.len());
        }
        run
    }
}

/// English language module: the resolver applied to whole sentences.
pub struct English {
    resolver: EnglishResolver,
}

impl English {
    /// Load the pronunciation dictionary from `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let cmudict = CmuDict::load(&data_dir.join("cmudict_cache.txt"))?;
        Ok(Self {
            resolver: EnglishResolver::new(cmudict),
        })
    }

    pub fn with_fallback(mut self, fallback: Box<dyn G2pFallback>) -> Self {
        self.resolver = self.resolver.with_fallback(fallback);
        self
    }
}

impl LanguageModule for English {
    fn g2p(&self, segment: &str, tokenizer: &dyn SubwordTokenizer) -> Result<PhonemeRun> {
        let pieces = tokenizer
            .word_segment(segment)
            .map_err(|err| Error::collaborator("subword tokenizer", err.to_string()))?;
        let mut run = PhonemeRun::blank_start();
        for group in group_subword_pieces(&pieces) {
            let joined: String = group.concat();
            let result = self.resolver.resolve_group(&joined);
            if result.dict_missed && result.phones.is_empty() {
                continue;
            }
            run.word2ph
                .extend(distribute_phone(result.phones.len(), group.len()));
            run.phones.extend(result.phones);
            run.tones.extend(result.tones);
        }
        run.push_blank();
        Ok(run)
    }

    fn text_normalize(&self, text: &str) -> String {
        normalize::normalize_english(text)
    }

    fn symbol_to_id(&self, symbol: &str) -> Result<i64> {
        symbols::symbol_to_id(Language::En, symbol)
    }

    fn language(&self) -> Language {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn test_dict() -> CmuDict {
        CmuDict::parse(
            "compiler:k ah0 m p ay1 l er0\n\
             hello:hh ah0 l ow1\n\
             world:w er1 l d\n\
             a:ey1\nb:b iy1\nc:s iy1\nd:d iy1\ne:iy1\n",
        )
    }

    #[test]
    fn groups_continuation_pieces() {
        let groups = group_subword_pieces(&pieces(&["comp", "##iler", "is"]));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec!["comp".to_string(), "iler".to_string()]);
        assert_eq!(groups[1], vec!["is".to_string()]);
    }

    #[test]
    fn orphan_continuation_dropped() {
        let groups = group_subword_pieces(&pieces(&["##iler"]));
        assert!(groups.is_empty());
    }

    #[test]
    fn refine_strips_stress() {
        let (phones, tones) = refine_syllables(&pieces(&["ay1", "l", "er0"]));
        assert_eq!(phones, vec!["ay", "l", "er"]);
        assert_eq!(tones, vec![2, 0, 1]);
    }

    #[test]
    fn distribute_balanced() {
        assert_eq!(distribute_phone(7, 1), vec![7]);
        assert_eq!(distribute_phone(7, 2), vec![4, 3]);
        assert_eq!(distribute_phone(6, 3), vec![2, 2, 2]);
        assert_eq!(distribute_phone(0, 2), vec![0, 0]);
    }

    #[test]
    fn distribute_properties() {
        for n_phone in 0..20 {
            for n_word in 1..8 {
                let buckets = distribute_phone(n_phone, n_word);
                assert_eq!(buckets.len(), n_word);
                assert_eq!(buckets.iter().sum::<i32>() as usize, n_phone);
                let max = buckets.iter().max().copied().unwrap_or(0);
                let min = buckets.iter().min().copied().unwrap_or(0);
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn dictionary_hit_distributes_over_pieces() {
        let resolver = EnglishResolver::new(test_dict());
        let run = resolver.g2p_en("compiler", &pieces(&["comp", "##iler"]));
        // 7 phonemes over 2 pieces
        assert_eq!(run.phones.len(), 7);
        assert_eq!(run.word2ph, vec![4, 3]);
        assert_eq!(run.word2ph.iter().sum::<i32>() as usize, run.phones.len());
    }

    #[test]
    fn short_oov_word_spelled_out() {
        let resolver = EnglishResolver::new(test_dict());
        let run = resolver.g2p_en("abc", &pieces(&["abc"]));
        // a + b + c = ey1 / b iy1 / s iy1
        assert_eq!(run.phones, vec!["ey", "b", "iy", "s", "iy"]);
        assert_eq!(run.word2ph, vec![5]);
    }

    #[test]
    fn long_oov_word_stays_empty_without_fallback() {
        let resolver = EnglishResolver::new(test_dict());
        let run = resolver.g2p_en("xylophones", &pieces(&["xylophones"]));
        assert!(run.phones.is_empty());
        assert_eq!(run.word2ph, vec![0]);
    }

    struct FixedFallback;

    impl crate::G2pFallback for FixedFallback {
        fn infer(&self, _word: &str) -> crate::Result<Vec<String>> {
            Ok(pieces(&["t", "eh1", "s", "t"]))
        }
    }

    #[test]
    fn fallback_used_on_miss() {
        let resolver = EnglishResolver::new(test_dict()).with_fallback(Box::new(FixedFallback));
        let run = resolver.g2p_en("testphrase", &pieces(&["testphrase"]));
        assert_eq!(run.phones, vec!["t", "eh", "s", "t"]);
        assert_eq!(run.tones, vec![0, 2, 0, 0]);
    }

    struct SpaceTokenizer;

    impl crate::SubwordTokenizer for SpaceTokenizer {
        fn word_segment(&self, text: &str) -> crate::Result<Vec<String>> {
            Ok(text.split_whitespace().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn english_module_wraps_with_blanks() {
        let module = English {
            resolver: EnglishResolver::new(test_dict()),
        };
        let run = module.g2p("hello world", &SpaceTokenizer).unwrap();
        assert_eq!(run.phones.first().map(String::as_str), Some("_"));
        assert_eq!(run.phones.last().map(String::as_str), Some("_"));
        assert_eq!(
            run.word2ph.iter().sum::<i32>() as usize,
            run.phones.len()
        );
    }
}
