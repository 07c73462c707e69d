//! Final sequence assembly for the acoustic model.
//!
//! The model expects a blank between every phoneme (`add_blank=True` in the
//! upstream configs): for n phonemes the output arrays have length 2n+1
//! with id/tone/language 0 at every even index. word2ph counts are doubled,
//! with the first entry absorbing the leading blank.

use crate::error::Result;
use crate::text::{LanguageModule, PhonemeRun};

/// Integer sequences ready for synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledSequence {
    pub phones: Vec<i64>,
    pub tones: Vec<i64>,
    pub lang_ids: Vec<i64>,
    pub word2ph: Vec<i32>,
}

/// Map a phoneme run to id sequences with interspersed blanks.
///
/// Unmapped symbols are hard errors; the run must already be made of
/// symbols from `module`'s table.
pub fn cleaned_text_to_sequence(
    module: &dyn LanguageModule,
    run: &PhonemeRun,
) -> Result<AssembledSequence> {
    debug_assert_eq!(run.phones.len(), run.tones.len());
    let n = run.phones.len();
    let language = module.language();
    let mut phones = vec![0i64; 2 * n + 1];
    let mut tones = vec![0i64; 2 * n + 1];
    let mut lang_ids = vec![0i64; 2 * n + 1];
    for (i, (symbol, &tone)) in run.phones.iter().zip(run.tones.iter()).enumerate() {
        let j = 2 * i + 1;
        phones[j] = module.symbol_to_id(symbol)?;
        tones[j] = tone + language.tone_start();
        lang_ids[j] = language.id();
    }
    let mut word2ph: Vec<i32> = run.word2ph.iter().map(|&w| w * 2).collect();
    if let Some(first) = word2ph.first_mut() {
        *first += 1;
    }
    Ok(AssembledSequence {
        phones,
        tones,
        lang_ids,
        word2ph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::text::symbols::{self, Language};
    use crate::SubwordTokenizer;

    struct ZhStub;

    impl LanguageModule for ZhStub {
        fn g2p(&self, _: &str, _: &dyn SubwordTokenizer) -> Result<PhonemeRun> {
            unreachable!("not used by the assembler")
        }

        fn text_normalize(&self, text: &str) -> String {
            text.to_string()
        }

        fn symbol_to_id(&self, symbol: &str) -> Result<i64> {
            symbols::symbol_to_id(Language::Zh, symbol)
        }

        fn language(&self) -> Language {
            Language::Zh
        }
    }

    fn sample_run() -> PhonemeRun {
        PhonemeRun {
            phones: ["_", "n", "i", "h", "ao", "_"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tones: vec![0, 2, 2, 3, 3, 0],
            word2ph: vec![1, 2, 2, 1],
        }
    }

    #[test]
    fn blank_interspersion_shape() {
        let seq = cleaned_text_to_sequence(&ZhStub, &sample_run()).unwrap();
        let n = sample_run().phones.len();
        assert_eq!(seq.phones.len(), 2 * n + 1);
        assert_eq!(seq.tones.len(), 2 * n + 1);
        assert_eq!(seq.lang_ids.len(), 2 * n + 1);
        for j in (0..seq.phones.len()).step_by(2) {
            assert_eq!(seq.phones[j], 0);
            assert_eq!(seq.tones[j], 0);
            assert_eq!(seq.lang_ids[j], 0);
        }
    }

    #[test]
    fn word2ph_sums_to_length() {
        let seq = cleaned_text_to_sequence(&ZhStub, &sample_run()).unwrap();
        assert_eq!(
            seq.word2ph.iter().sum::<i32>() as usize,
            seq.phones.len()
        );
    }

    #[test]
    fn odd_slots_carry_symbols() {
        let seq = cleaned_text_to_sequence(&ZhStub, &sample_run()).unwrap();
        // "n" is id 62 in the ZH table, and every odd slot is language 3
        assert_eq!(seq.phones[3], 62);
        assert!(seq
            .lang_ids
            .iter()
            .skip(1)
            .step_by(2)
            .all(|&id| id == Language::Zh.id()));
    }

    #[test]
    fn unmapped_symbol_is_fatal() {
        let run = PhonemeRun {
            phones: vec!["bogus".to_string()],
            tones: vec![0],
            word2ph: vec![1],
        };
        assert!(cleaned_text_to_sequence(&ZhStub, &run).is_err());
    }

    #[test]
    fn empty_run_yields_single_blank_slot() {
        let run = PhonemeRun::default();
        let seq = cleaned_text_to_sequence(&ZhStub, &run).unwrap();
        assert_eq!(seq.phones, vec![0]);
        assert!(seq.word2ph.is_empty());
    }
}
