// ============================================================
// Layer 4 — Corpus Statistics
// ============================================================
// Measures the corpus once so every example can be encoded
// with the same fixed shapes:
//
//   sentence_size = max(longest sentence, longest query) + 1
//                   (the extra slot carries the time token)
//   memory_size   = min(requested memory size, longest story)

use serde::{Deserialize, Serialize};

use crate::domain::example::QaExample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Number of sentences in the longest story
    pub max_story_size:    usize,
    /// Mean story length, truncated to an integer
    pub mean_story_size:   usize,
    /// Tokens in the longest story sentence
    pub max_sentence_size: usize,
    /// Tokens in the longest question
    pub max_query_size:    usize,
}

impl CorpusStats {
    pub fn from_examples<'a>(examples: impl IntoIterator<Item = &'a QaExample>) -> Self {
        let mut stats = Self::default();
        let mut total_story = 0usize;
        let mut count = 0usize;

        for ex in examples {
            stats.max_story_size = stats.max_story_size.max(ex.story.len());
            stats.max_query_size = stats.max_query_size.max(ex.query.len());
            if let Some(longest) = ex.story.iter().map(Vec::len).max() {
                stats.max_sentence_size = stats.max_sentence_size.max(longest);
            }
            total_story += ex.story.len();
            count += 1;
        }

        if count > 0 {
            stats.mean_story_size = total_story / count;
        }
        stats
    }

    /// Width of every encoded sentence and query, time slot included
    pub fn sentence_size(&self) -> usize {
        self.max_sentence_size.max(self.max_query_size) + 1
    }

    /// Number of memory slots actually needed for a requested size
    pub fn memory_size(&self, requested: usize) -> usize {
        requested.min(self.max_story_size)
    }
}
