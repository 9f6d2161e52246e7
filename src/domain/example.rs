// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// A bAbI example is a short story (a list of sentences), a
// question about it, and a single-word answer:
//
//   story:    [["mary", "moved", "to", "the", "bathroom"],
//              ["john", "went", "to", "the", "hallway"]]
//   query:    ["where", "is", "mary"]
//   answer:   "bathroom"
//
// Once vectorised, the same example becomes three fixed-size
// integer arrays plus the index of the answer word.

use serde::{Deserialize, Serialize};

/// One story / question / answer triple, already tokenised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExample {
    /// Ordered sentences, oldest first
    pub story: Vec<Vec<String>>,

    /// Question tokens, without the trailing "?"
    pub query: Vec<String>,

    /// The answer is always a single vocabulary entry,
    /// even for list answers such as "n,w"
    pub answer: String,
}

impl QaExample {
    pub fn new(story: Vec<Vec<String>>, query: Vec<String>, answer: impl Into<String>) -> Self {
        Self {
            story,
            query,
            answer: answer.into(),
        }
    }

    /// Every token that appears anywhere in the example
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.story
            .iter()
            .flatten()
            .chain(self.query.iter())
            .map(String::as_str)
            .chain(std::iter::once(self.answer.as_str()))
    }
}

/// A vectorised example with fixed shapes.
///
/// `story` is stored row-major: memory_size rows of sentence_size ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizedItem {
    pub story:  Vec<i32>,
    pub query:  Vec<i32>,
    pub answer: Vec<i32>,
    pub label:  usize,
}
