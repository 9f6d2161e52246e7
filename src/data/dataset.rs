use std::ops::Range;

use crate::domain::example::VectorizedItem;

/// A vectorised split (train, validation or test).
///
/// Every item has the same shapes:
///   story  [memory_size × sentence_size]
///   query  [sentence_size]
///   answer [vocab_size]
#[derive(Debug, Clone, Default)]
pub struct VectorizedSet {
    items:         Vec<VectorizedItem>,
    memory_size:   usize,
    sentence_size: usize,
    vocab_size:    usize,
}

impl VectorizedSet {
    pub fn new(
        items:         Vec<VectorizedItem>,
        memory_size:   usize,
        sentence_size: usize,
        vocab_size:    usize,
    ) -> Self {
        Self { items, memory_size, sentence_size, vocab_size }
    }

    /// Same shapes, different items (used after splitting)
    pub fn with_items(&self, items: Vec<VectorizedItem>) -> Self {
        Self { items, ..*self }
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn items(&self) -> &[VectorizedItem] { &self.items }

    pub fn batch(&self, range: Range<usize>) -> &[VectorizedItem] {
        &self.items[range]
    }

    /// Ground-truth answer indices, i.e. the argmax of every answer row
    pub fn labels(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.label).collect()
    }

    pub fn memory_size(&self) -> usize { self.memory_size }

    pub fn sentence_size(&self) -> usize { self.sentence_size }

    pub fn vocab_size(&self) -> usize { self.vocab_size }

    pub fn story_shape(&self) -> [usize; 3] {
        [self.len(), self.memory_size, self.sentence_size]
    }

    pub fn query_shape(&self) -> [usize; 2] {
        [self.len(), self.sentence_size]
    }

    pub fn answer_shape(&self) -> [usize; 2] {
        [self.len(), self.vocab_size]
    }
}
