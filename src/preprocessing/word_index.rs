//! Frequency-ranked word index.
//!
//! Index `0` is never assigned to a word so it can serve as padding, index
//! `1` is the out-of-vocabulary bucket and words follow from `2` in order of
//! descending frequency (ties keep first-occurrence order). Only indices
//! below `num_words` are used when encoding; rarer words fall into the OOV
//! bucket.

use crate::core::SentimentError;
use crate::utils::artifacts::{load_json, save_json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokenizers::Tokenizer;

pub const PAD_TOKEN: &str = "<pad>";
pub const PAD_ID: u32 = 0;
pub const OOV_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct WordIndex {
    num_words: usize,
    oov_token: String,
    /// Words ranked by frequency with their counts; `ranked[i]` has index `i + 2`.
    ranked: Vec<(String, u64)>,
    index: HashMap<String, u32>,
}

#[derive(Serialize, Deserialize)]
struct StoredWordIndex {
    num_words: usize,
    oov_token: String,
    words: Vec<(String, u64)>,
}

impl WordIndex {
    pub fn fit<D: AsRef<[String]>>(
        docs: &[D],
        num_words: usize,
        oov_token: &str,
    ) -> Result<Self, SentimentError> {
        if oov_token == PAD_TOKEN {
            return Err(SentimentError::InvalidConfig(format!(
                "oov_token cannot be the padding token {PAD_TOKEN}"
            )));
        }

        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, u64)> = Vec::new();
        for word in docs.iter().flat_map(|d| d.as_ref()) {
            if word == oov_token {
                continue;
            }
            match position.get(word.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    position.insert(word.as_str(), counts.len());
                    counts.push((word.as_str(), 1));
                }
            }
        }
        if counts.is_empty() {
            return Err(SentimentError::EmptyVocabulary);
        }

        // Stable sort keeps first-occurrence order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let ranked = counts
            .into_iter()
            .map(|(word, count)| (word.to_string(), count))
            .collect();

        Ok(Self::from_ranked(num_words, oov_token.to_string(), ranked))
    }

    fn from_ranked(num_words: usize, oov_token: String, ranked: Vec<(String, u64)>) -> Self {
        let index = ranked
            .iter()
            .enumerate()
            .map(|(i, (word, _))| (word.clone(), i as u32 + 2))
            .collect();
        Self {
            num_words,
            oov_token,
            ranked,
            index,
        }
    }

    pub fn num_words(&self) -> usize {
        self.num_words
    }

    pub fn oov_token(&self) -> &str {
        &self.oov_token
    }

    /// Number of distinct words seen while fitting (the cap is not applied).
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Index of `word` in the full index, ignoring `num_words`.
    pub fn get(&self, word: &str) -> Option<u32> {
        if word == self.oov_token {
            return Some(OOV_ID);
        }
        self.index.get(word).copied()
    }

    pub fn count(&self, word: &str) -> Option<u64> {
        let idx = self.index.get(word)?;
        self.ranked.get(*idx as usize - 2).map(|(_, c)| *c)
    }

    /// The `n` most frequent words with their indices.
    pub fn top(&self, n: usize) -> Vec<(&str, u32)> {
        self.ranked
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, (word, _))| (word.as_str(), i as u32 + 2))
            .collect()
    }

    pub fn encode_word(&self, word: &str) -> u32 {
        match self.index.get(word) {
            Some(&idx) if (idx as usize) < self.num_words => idx,
            _ => OOV_ID,
        }
    }

    pub fn texts_to_sequences<D: AsRef<[String]>>(&self, docs: &[D]) -> Vec<Vec<u32>> {
        docs.iter()
            .map(|doc| doc.as_ref().iter().map(|w| self.encode_word(w)).collect())
            .collect()
    }

    /// Size of the id space the encoder produces (padding included).
    pub fn effective_vocab_size(&self) -> usize {
        self.num_words.min(self.ranked.len() + 2)
    }

    /// Word-level tokenizer that maps whitespace-separated cleaned words to
    /// the same ids as [`WordIndex::texts_to_sequences`].
    pub fn to_tokenizer(&self) -> Result<Tokenizer, SentimentError> {
        let mut vocab = serde_json::Map::new();
        vocab.insert(PAD_TOKEN.to_string(), PAD_ID.into());
        vocab.insert(self.oov_token.clone(), OOV_ID.into());
        for (word, idx) in self.top(self.num_words.saturating_sub(2)) {
            vocab.insert(word.to_string(), idx.into());
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": self.oov_token,
            },
        });
        Tokenizer::from_bytes(tokenizer_json.to_string().as_bytes())
            .map_err(|e| SentimentError::Tokenizer(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let stored = StoredWordIndex {
            num_words: self.num_words,
            oov_token: self.oov_token.clone(),
            words: self.ranked.clone(),
        };
        save_json(path, &stored)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let stored: StoredWordIndex = load_json(path)?;
        Ok(Self::from_ranked(
            stored.num_words,
            stored.oov_token,
            stored.words,
        ))
    }
}

/// Encodes an already cleaned review with a saved word-level tokenizer.
pub fn encode_words(tokenizer: &Tokenizer, words: &[String]) -> Result<Vec<u32>, SentimentError> {
    if words.is_empty() {
        return Ok(Vec::new());
    }
    let encoding = tokenizer
        .encode(words.join(" "), false)
        .map_err(|e| SentimentError::Tokenizer(e.to_string()))?;
    Ok(encoding.get_ids().to_vec())
}
