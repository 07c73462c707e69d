//! Dump the front-end output for a piece of text as JSON, one line per
//! sentence. Useful for eyeballing phoneme sequences against the Python
//! reference.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use melotts_text::{FrontendConfig, SubwordTokenizer, TtsFrontend};

#[derive(Parser)]
#[command(about = "Run the TTS text front-end and print assembled sequences")]
struct Args {
    /// Input text
    text: String,

    /// Language: ZH (Mandarin with embedded English) or EN
    #[arg(long, default_value = "ZH")]
    language: String,

    /// Directory holding opencpop-strict.txt and cmudict_cache.txt
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Minimum visible length of a merged sentence piece
    #[arg(long, default_value_t = 10)]
    min_sentence_len: usize,
}

/// Whitespace stand-in for the BERT subword tokenizer. Real deployments
/// wire in the model tokenizer instead.
struct WhitespaceTokenizer;

impl SubwordTokenizer for WhitespaceTokenizer {
    fn word_segment(&self, text: &str) -> melotts_text::Result<Vec<String>> {
        Ok(text.split_whitespace().map(|s| s.to_string()).collect())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = FrontendConfig {
        data_dir: args.data_dir,
        language: args.language,
        min_sentence_len: args.min_sentence_len,
    };
    let frontend = TtsFrontend::new(&config)?;
    for unit in frontend.process(&args.text, &WhitespaceTokenizer)? {
        println!(
            "{}",
            serde_json::json!({
                "text": unit.text,
                "phones": unit.sequence.phones,
                "tones": unit.sequence.tones,
                "lang_ids": unit.sequence.lang_ids,
                "word2ph": unit.sequence.word2ph,
            })
        );
    }
    Ok(())
}
