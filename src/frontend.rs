//! End-to-end front-end orchestration.
//!
//! One [`TtsFrontend`] holds the language module for a configured language
//! and turns whole texts into per-sentence assembled sequences. Sentences
//! that fail on a collaborator are logged and skipped so one bad word never
//! kills a whole request.

use log::warn;

use crate::config::FrontendConfig;
use crate::error::Result;
use crate::text::sentence::split_sentences;
use crate::text::sequence::{cleaned_text_to_sequence, AssembledSequence};
use crate::text::symbols::Language;
use crate::text::{ChineseMix, English, LanguageModule};
use crate::SubwordTokenizer;

/// One processed sentence: the normalized text (callers align BERT
/// features against it via `word2ph`) and the assembled sequences.
#[derive(Debug, Clone)]
pub struct SentenceUnit {
    pub text: String,
    pub sequence: AssembledSequence,
}

pub struct TtsFrontend {
    module: Box<dyn LanguageModule>,
    min_sentence_len: usize,
}

impl TtsFrontend {
    /// Build a front-end for the configured language, loading the static
    /// tables from the configured data directory.
    pub fn new(config: &FrontendConfig) -> Result<Self> {
        let module: Box<dyn LanguageModule> = match config.language()? {
            Language::Zh => Box::new(ChineseMix::new(&config.data_dir)?),
            Language::En => Box::new(English::new(&config.data_dir)?),
        };
        Ok(Self {
            module,
            min_sentence_len: config.min_sentence_len,
        })
    }

    /// Build a front-end around an existing language module.
    pub fn with_module(module: Box<dyn LanguageModule>, min_sentence_len: usize) -> Self {
        Self {
            module,
            min_sentence_len,
        }
    }

    pub fn language(&self) -> Language {
        self.module.language()
    }

    /// Process a whole text into per-sentence sequences.
    ///
    /// English text is normalized before sentence splitting (abbreviation
    /// periods must not end sentences); Chinese sentence by sentence after
    /// it. Collaborator failures skip the affected sentence; unmapped
    /// symbols and unknown languages abort the request.
    pub fn process(
        &self,
        text: &str,
        tokenizer: &dyn SubwordTokenizer,
    ) -> Result<Vec<SentenceUnit>> {
        let language = self.module.language();
        let prepared = match language {
            Language::En => self.module.text_normalize(text),
            Language::Zh => text.to_string(),
        };
        let mut units = Vec::new();
        for sentence in split_sentences(&prepared, self.min_sentence_len) {
            let sentence = match language {
                Language::Zh => self.module.text_normalize(&sentence),
                Language::En => sentence,
            };
            if sentence.trim().is_empty() {
                continue;
            }
            let run = match self.module.g2p(&sentence, tokenizer) {
                Ok(run) => run,
                Err(err) => {
                    warn!("skipping sentence {sentence:?}: {err}");
                    continue;
                }
            };
            let sequence = cleaned_text_to_sequence(self.module.as_ref(), &run)?;
            units.push(SentenceUnit {
                text: sentence,
                sequence,
            });
        }
        Ok(units)
    }
}
