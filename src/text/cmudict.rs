//! CMU-style pronunciation dictionary cache.
//!
//! File format, one entry per line:
//!
//! ```text
//! word:syl1 syl2 syl3,alt1 alt2
//! ```
//!
//! Syllables carry CMU phonemes with a trailing stress digit on vowels.
//! Comma-separated pronunciation variants are flattened into one sequence,
//! matching the cache files shipped with the upstream models.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};

pub struct CmuDict {
    entries: HashMap<String, Vec<String>>,
}

impl CmuDict {
    /// Load a dictionary cache from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::data_file_not_found(path));
        }
        let text = fs::read_to_string(path)?;
        let dict = Self::parse(&text);
        info!("loaded pronunciation dictionary with {} entries", dict.len());
        Ok(dict)
    }

    /// Parse dictionary-cache text.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            let syllables: Vec<String> = rest
                .split(',')
                .flat_map(|segment| segment.split_whitespace())
                .map(|s| s.to_string())
                .collect();
            entries.insert(key.to_string(), syllables);
        }
        Self { entries }
    }

    /// Look up the phoneme syllables for a word.
    pub fn find(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
