//! Sentence segmentation.
//!
//! A longest-prefix-match trie maps punctuation and whitespace sequences to
//! small integer codes: the ASCII value of a half-width splitter, a literal
//! replacement character, [`CODE_SPACE`] for whitespace, or [`CODE_DROP`]
//! for marks that are erased. Scanning with the trie both normalizes
//! punctuation and decides where sentences end; short pieces are then
//! re-merged up to a minimum visible length.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Entries folding to a single space (whitespace runs).
const CODE_SPACE: i32 = 3;
/// Entries erased from the text (also fold to a space while scanning).
const CODE_DROP: i32 = 0;

/// Punctuation table. Full-width marks map onto their half-width splitter
/// codes; 、：· split like commas; ellipses split like periods; dashes
/// become literal hyphens; quotes and brackets are dropped.
const TRIE_ENTRIES: &[(&str, i32)] = &[
    ("，", ',' as i32),
    (",", ',' as i32),
    ("。", '.' as i32),
    (".", '.' as i32),
    ("！", '!' as i32),
    ("!", '!' as i32),
    ("？", '?' as i32),
    ("?", '?' as i32),
    ("；", ';' as i32),
    (";", ';' as i32),
    ("、", ',' as i32),
    ("：", ',' as i32),
    ("·", ',' as i32),
    ("……", '.' as i32),
    ("…", '.' as i32),
    ("——", '-' as i32),
    ("—", '-' as i32),
    ("～", '-' as i32),
    ("~", '-' as i32),
    ("-", '-' as i32),
    ("\u{2018}", '\'' as i32),
    ("\u{2019}", '\'' as i32),
    ("'", '\'' as i32),
    ("\u{201C}", CODE_DROP),
    ("\u{201D}", CODE_DROP),
    ("\"", CODE_DROP),
    ("（", CODE_DROP),
    ("）", CODE_DROP),
    ("(", CODE_DROP),
    (")", CODE_DROP),
    ("【", CODE_DROP),
    ("】", CODE_DROP),
    ("[", CODE_DROP),
    ("]", CODE_DROP),
    ("《", CODE_DROP),
    ("》", CODE_DROP),
    ("<", CODE_DROP),
    (">", CODE_DROP),
    ("\n", CODE_SPACE),
    ("\t", CODE_SPACE),
    ("\r", CODE_SPACE),
];

/// Sentence-terminating codes.
fn is_splitter(code: i32) -> bool {
    matches!(
        u8::try_from(code).map(char::from),
        Ok(',' | '.' | '!' | '?' | ';')
    )
}

#[derive(Default)]
struct TrieNode {
    children: HashMap<u8, TrieNode>,
    value: Option<i32>,
}

/// Byte-level prefix trie over the punctuation table.
pub struct PunctTrie {
    root: TrieNode,
}

impl PunctTrie {
    fn new(entries: &[(&str, i32)]) -> Self {
        let mut root = TrieNode::default();
        for &(pattern, code) in entries {
            let mut node = &mut root;
            for &b in pattern.as_bytes() {
                node = node.children.entry(b).or_default();
            }
            node.value = Some(code);
        }
        Self { root }
    }

    /// Longest entry matching a prefix of `bytes`, as `(byte_len, code)`.
    pub fn longest_match(&self, bytes: &[u8]) -> Option<(usize, i32)> {
        let mut node = &self.root;
        let mut best = None;
        for (i, &b) in bytes.iter().enumerate() {
            match node.children.get(&b) {
                Some(child) => {
                    node = child;
                    if let Some(code) = node.value {
                        best = Some((i + 1, code));
                    }
                }
                None => break,
            }
        }
        best
    }
}

lazy_static! {
    static ref PUNCT_TRIE: PunctTrie = PunctTrie::new(TRIE_ENTRIES);
}

/// Visible length: every character counts as one unit, independent of byte
/// width.
pub(crate) fn visible_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into sentence pieces of visible length above `min_len`
/// (the final piece may be shorter). Splitter punctuation stays attached to
/// the piece it terminates.
pub fn split_sentences(text: &str, min_len: usize) -> Vec<String> {
    let bytes = text.as_bytes();
    let n = bytes.len();
    let mut sentences: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut i = 0;
    while i < n {
        let Some((len, code)) = PUNCT_TRIE.longest_match(&bytes[i..]) else {
            let ch_len = char_len(bytes[i]);
            buf.push_str(&text[i..i + ch_len]);
            i += ch_len;
            continue;
        };
        let b = bytes[i];
        if (b == b',' || b == b'.')
            && i > 0
            && i + 1 < n
            && bytes[i - 1].is_ascii_digit()
            && bytes[i + 1].is_ascii_digit()
        {
            // decimal point inside a numeric literal, kept for number
            // normalization
            if b == b'.' {
                buf.push('.');
            }
            i += len;
        } else if b == b'.' && bytes[i + 1..].starts_with(b"com") {
            // domain names such as example.com
            buf.push('.');
            i += len;
        } else if is_splitter(code) {
            buf.push(code as u8 as char);
            sentences.push(std::mem::take(&mut buf));
            i += len;
        } else if code == CODE_SPACE || code == CODE_DROP {
            // keep a space so English word boundaries survive
            buf.push(' ');
            i += len;
        } else {
            buf.push(code as u8 as char);
            i += len;
        }
    }
    if !buf.is_empty() {
        sentences.push(buf);
    }
    merge_short_sentences(sentences, min_len)
}

/// Length in bytes of the UTF-8 character starting with `first_byte`.
fn char_len(first_byte: u8) -> usize {
    match first_byte {
        b if b & 0x80 == 0x00 => 1,
        b if b & 0xE0 == 0xC0 => 2,
        b if b & 0xF0 == 0xE0 => 3,
        _ => 4,
    }
}

/// Accumulate pieces into buckets whose visible length exceeds `min_len`,
/// flushing the last bucket unconditionally. A trailing bucket of visible
/// length ≤ 2 is merged into its predecessor.
fn merge_short_sentences(sentences: Vec<String>, min_len: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let mut bucket = String::new();
    let mut count = 0usize;
    let m = sentences.len();
    for (i, sentence) in sentences.iter().enumerate() {
        bucket.push_str(sentence);
        bucket.push(' ');
        count += visible_len(sentence);
        if count > min_len || i == m - 1 {
            if bucket.ends_with(' ') {
                bucket.pop();
            }
            if bucket.chars().all(|c| c == ' ') {
                bucket.clear();
            } else {
                merged.push(std::mem::take(&mut bucket));
            }
            count = 0;
        }
    }
    if merged.len() >= 2 {
        let tail_len = merged.last().map(|s| visible_len(s)).unwrap_or(0);
        if tail_len <= 2 {
            if let Some(tail) = merged.pop() {
                if let Some(prev) = merged.last_mut() {
                    prev.push_str(&tail);
                }
            }
        }
    }
    merged
}
