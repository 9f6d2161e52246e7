// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// A deterministic word → index mapping for one task.
//
//   index 0             nil / padding
//   1 ..= W             corpus words, in sorted order
//   W+1 ..= W+M         time tokens "time1" .. "timeM"
//
// time{k} marks the sentence that is k-th from the end of the
// story (k = 1 is the most recent), so recency becomes part of
// every memory slot.

use std::collections::{BTreeSet, HashMap};

use crate::domain::example::QaExample;

pub const NIL_INDEX: usize = 0;

#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// tokens[i] has index i + 1
    tokens:      Vec<String>,
    index:       HashMap<String, usize>,
    word_count:  usize,
    time_tokens: usize,
}

impl Vocabulary {
    /// Build the vocabulary of `examples`, followed by `time_tokens` time words.
    pub fn build<'a>(examples: impl IntoIterator<Item = &'a QaExample>, time_tokens: usize) -> Self {
        let words: BTreeSet<&str> = examples.into_iter().flat_map(QaExample::tokens).collect();
        let word_count = words.len();

        let tokens: Vec<String> = words
            .into_iter()
            .map(String::from)
            .chain((1..=time_tokens).map(|k| format!("time{k}")))
            .collect();

        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i + 1))
            .collect();

        Self { tokens, index, word_count, time_tokens }
    }

    /// Total number of indices, nil and time tokens included
    pub fn len(&self) -> usize {
        self.tokens.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn time_token_count(&self) -> usize {
        self.time_tokens
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Index of the time token for the sentence `k` places from the end (1-based)
    pub fn time_index(&self, k: usize) -> usize {
        self.word_count + k
    }

    /// Token text for an index; None for nil and out-of-range indices
    pub fn token(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }

    /// Decode ids back to text, skipping nil padding
    pub fn decode(&self, ids: &[i32]) -> String {
        ids.iter()
            .filter_map(|&id| usize::try_from(id).ok())
            .filter_map(|id| self.token(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<QaExample> {
        vec![
            QaExample::new(
                vec![vec!["mary".into(), "moved".into()]],
                vec!["where".into(), "mary".into()],
                "kitchen",
            ),
            QaExample::new(vec![vec!["john".into()]], vec!["where".into()], "garden"),
        ]
    }

    #[test]
    fn test_words_are_sorted_from_one() {
        let vocab = Vocabulary::build(&corpus(), 0);
        assert_eq!(vocab.index_of("garden"), Some(1));
        assert_eq!(vocab.index_of("john"), Some(2));
        assert_eq!(vocab.index_of("where"), Some(6));
        assert_eq!(vocab.word_count(), 6);
        assert_eq!(vocab.len(), 7);
    }

    #[test]
    fn test_time_tokens_follow_words() {
        let vocab = Vocabulary::build(&corpus(), 3);
        assert_eq!(vocab.len(), 1 + 6 + 3);
        assert_eq!(vocab.time_index(1), 7);
        assert_eq!(vocab.token(7), Some("time1"));
        assert_eq!(vocab.index_of("time3"), Some(9));
        assert_eq!(vocab.time_token_count(), 3);
    }

    #[test]
    fn test_nil_has_no_token() {
        let vocab = Vocabulary::build(&corpus(), 1);
        assert_eq!(vocab.token(NIL_INDEX), None);
        assert_eq!(vocab.token(vocab.len()), None);
        assert_eq!(vocab.decode(&[0, 0, 4, 5, 0]), "mary moved");
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Vocabulary::build(&corpus(), 2);
        let b = Vocabulary::build(corpus().iter().rev(), 2);
        for i in 0..a.len() {
            assert_eq!(a.token(i), b.token(i));
        }
    }
}
