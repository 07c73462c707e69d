//! Word segmentation and POS tagging on top of jieba-rs.

use jieba_rs::Jieba;
use lazy_static::lazy_static;

/// Wrapper around the jieba segmenter used for tagging and for the
/// sub-word splits the tone sandhi rules need.
pub struct Segmenter {
    jieba: Jieba,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// Segment a sentence into `(word, pos_tag)` pairs.
    pub fn tag(&self, text: &str) -> Vec<(String, String)> {
        self.jieba
            .tag(text, false)
            .into_iter()
            .map(|t| (t.word.to_string(), t.tag.to_string()))
            .collect()
    }

    /// Character length of the first sub-word the search-mode cut finds
    /// inside `word`, or 0 when the word is not split further.
    ///
    /// The sandhi rules use this to decide 2+1 vs 1+2 readings of
    /// three-character words.
    pub fn split_word(&self, word: &str) -> usize {
        let pieces = self.jieba.cut_for_search(word, false);
        let Some(first) = pieces.first() else {
            return 0;
        };
        let offset = word.find(first).unwrap_or(0);
        if offset == 0 {
            let first_chars = first.chars().count();
            if first_chars != word.chars().count() {
                first_chars
            } else {
                0
            }
        } else {
            word[..offset].chars().count()
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// Shared segmenter instance; the dictionary load is expensive.
    pub static ref GLOBAL_SEGMENTER: Segmenter = Segmenter::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_basic_sentence() {
        let tags = GLOBAL_SEGMENTER.tag("我喜欢北京");
        assert!(!tags.is_empty());
        let joined: String = tags.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(joined, "我喜欢北京");
    }

    #[test]
    fn split_word_unsplit_single() {
        assert_eq!(GLOBAL_SEGMENTER.split_word("好"), 0);
    }

    #[test]
    fn split_word_length_bounded() {
        let n = GLOBAL_SEGMENTER.split_word("蒙古包");
        assert!(n < 3);
    }
}
