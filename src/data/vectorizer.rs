// ============================================================
// Layer 4 — Vectorizer
// ============================================================
// Encodes QaExamples as fixed-shape integer arrays.
//
// Story (memory_size = 4, sentence_size = 5, two sentences):
//
//   [ 0  0  0  0  0 ]   ← padding rows come first
//   [ 0  0  0  0  0 ]
//   [ 0 12  7  3 t2 ]   ← older sentence, time token "time2"
//   [ 0  0  9  4 t1 ]   ← most recent sentence, "time1"
//
//   - only the last memory_size sentences are kept
//   - words are left-padded with nil, the last slot is the time token
//
// Query:  word ids, right-padded with nil to sentence_size
// Answer: one-hot over the whole vocabulary

use crate::data::dataset::VectorizedSet;
use crate::data::vocabulary::{Vocabulary, NIL_INDEX};
use crate::domain::example::{QaExample, VectorizedItem};

pub struct Vectorizer<'a> {
    vocab:         &'a Vocabulary,
    sentence_size: usize,
    memory_size:   usize,
}

impl<'a> Vectorizer<'a> {
    pub fn new(vocab: &'a Vocabulary, sentence_size: usize, memory_size: usize) -> Self {
        Self { vocab, sentence_size, memory_size }
    }

    fn id(&self, token: &str) -> i32 {
        self.vocab.index_of(token).unwrap_or(NIL_INDEX) as i32
    }

    pub fn vectorize(&self, example: &QaExample) -> VectorizedItem {
        let s = self.sentence_size;
        let m = self.memory_size;

        // Most recent context wins
        let kept = &example.story[example.story.len().saturating_sub(m)..];
        let mut story = vec![0i32; m * s];

        if s > 0 {
            let first_row = m - kept.len();
            for (j, sentence) in kept.iter().enumerate() {
                let row = &mut story[(first_row + j) * s..(first_row + j + 1) * s];

                let words = &sentence[..sentence.len().min(s - 1)];
                let offset = s - 1 - words.len();
                for (slot, word) in row[offset..s - 1].iter_mut().zip(words) {
                    *slot = self.id(word);
                }
                row[s - 1] = self.vocab.time_index(kept.len() - j) as i32;
            }
        }

        let mut query = vec![0i32; s];
        for (slot, word) in query.iter_mut().zip(&example.query) {
            *slot = self.id(word);
        }

        let label = self.vocab.index_of(&example.answer).unwrap_or(NIL_INDEX);
        let mut answer = vec![0i32; self.vocab.len()];
        answer[label] = 1;

        VectorizedItem { story, query, answer, label }
    }

    pub fn vectorize_all<'e>(&self, examples: impl IntoIterator<Item = &'e QaExample>) -> VectorizedSet {
        let items = examples.into_iter().map(|ex| self.vectorize(ex)).collect();
        VectorizedSet::new(items, self.memory_size, self.sentence_size, self.vocab.len())
    }
}
