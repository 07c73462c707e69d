//! Pinyin initial/final splitting and the pinyin → phoneme-symbol table.
//!
//! The table file (`opencpop-strict.txt`) is newline-delimited
//! `key<TAB>symbol symbol …`, keyed by the toneless pinyin spelling.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};

/// Multi-spelling finals rewritten before the symbol lookup.
const FINAL_VARIANTS: &[(&str, &str)] = &[("uei", "ui"), ("iou", "iu"), ("uen", "un")];

/// Single-letter initials. `y` and `w` are kept as initials, unlike
/// pypinyin's default scheme.
const SIMPLE_INITIALS: &[char] = &[
    'b', 'p', 'm', 'f', 'd', 't', 'n', 'l', 'g', 'k', 'h', 'j', 'q', 'x', 'r', 'z', 'c', 's',
    'y', 'w',
];

/// Two-letter initials, checked before the simple set.
const COMPOUND_INITIALS: &[&str] = &["zh", "ch", "sh"];

/// Split a romanized syllable into `(initial, final)`, e.g. `"bian1"` →
/// `("b", "ian1")`. Vowel-initial syllables get an empty initial.
pub fn split_initial_final(syllable: &str) -> (String, String) {
    if syllable.is_empty() {
        return (String::new(), String::new());
    }
    if syllable.len() > 2 && syllable.is_char_boundary(2) {
        let head = &syllable[..2];
        if COMPOUND_INITIALS.contains(&head) {
            return (head.to_string(), syllable[2..].to_string());
        }
    }
    let mut chars = syllable.chars();
    if let Some(first) = chars.next() {
        if SIMPLE_INITIALS.contains(&first) {
            return (first.to_string(), chars.as_str().to_string());
        }
    }
    (String::new(), syllable.to_string())
}

pub struct PinyinSymbolMap {
    map: HashMap<String, Vec<String>>,
}

impl PinyinSymbolMap {
    /// Load the symbol table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::data_file_not_found(path));
        }
        let text = fs::read_to_string(path)?;
        let map = Self::parse(&text);
        info!("loaded pinyin symbol map with {} keys", map.map.len());
        Ok(map)
    }

    /// Parse symbol-table text.
    pub fn parse(text: &str) -> Self {
        let map = text
            .lines()
            .filter_map(|line| {
                let (key, symbols) = line.split_once('\t')?;
                let symbols: Vec<String> =
                    symbols.split_whitespace().map(|s| s.to_string()).collect();
                Some((key.to_string(), symbols))
            })
            .collect();
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolve a split syllable to its phoneme symbols and tone.
    ///
    /// `final_with_tone` must end in a tone digit 1–5; the dictionaries
    /// guarantee this, so anything else is a malformed-input error. A key
    /// absent from the table is not fatal: it is logged and an empty symbol
    /// list is returned, shortening the output.
    pub fn to_phonemes(&self, initial: &str, final_with_tone: &str) -> Result<(Vec<String>, i64)> {
        let mut final_part = final_with_tone.to_string();
        let tone = match final_part.pop() {
            Some(c @ '1'..='5') => i64::from(c as u8 - b'0'),
            _ => {
                return Err(Error::MalformedInput(format!(
                    "final {final_with_tone:?} does not end in a tone digit 1-5"
                )))
            }
        };
        let final_key = FINAL_VARIANTS
            .iter()
            .find(|(from, _)| *from == final_part)
            .map(|(_, to)| *to)
            .unwrap_or(final_part.as_str());
        let key = format!("{initial}{final_key}");
        match self.map.get(&key) {
            Some(symbols) => Ok((symbols.clone(), tone)),
            None => {
                warn!("pinyin {key:?} not in symbol map");
                Ok((Vec::new(), tone))
            }
        }
    }
}
