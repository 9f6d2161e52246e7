// ============================================================
// Layer 4 — Batches and the MemN2N Batcher
// ============================================================
// Two pieces:
//
//   batch_ranges()  — the fixed list of mini-batch index ranges
//                     over the training set. Only full batches,
//                     and the final full batch is left out when
//                     n is an exact multiple of batch_size.
//
//   MemBatcher      — Burn Batcher that stacks VectorizedItems
//                     into tensors:
//                       stories [batch, memory_size, sentence_size] Int
//                       queries [batch, sentence_size]              Int
//                       answers [batch, vocab_size]                 Float

use std::ops::Range;

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::example::VectorizedItem;

/// Start/end pairs (0, b), (b, 2b), ... while end < n.
pub fn batch_ranges(n: usize, batch_size: usize) -> Vec<Range<usize>> {
    if batch_size == 0 {
        return Vec::new();
    }
    (0..n)
        .step_by(batch_size)
        .map(|start| start..start + batch_size)
        .take_while(|range| range.end < n)
        .collect()
}

/// A batch of vectorised examples, ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct MemBatch<B: Backend> {
    pub stories: Tensor<B, 3, Int>,
    pub queries: Tensor<B, 2, Int>,
    pub answers: Tensor<B, 2>,
}

/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct MemBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> MemBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<VectorizedItem, MemBatch<B>> for MemBatcher<B> {
    fn batch(&self, items: Vec<VectorizedItem>) -> MemBatch<B> {
        let batch_size    = items.len();
        let sentence_size = items[0].query.len();
        let memory_size   = items[0].story.len() / sentence_size.max(1);
        let vocab_size    = items[0].answer.len();

        let story_flat: Vec<i32> = items.iter().flat_map(|i| i.story.iter().copied()).collect();
        let query_flat: Vec<i32> = items.iter().flat_map(|i| i.query.iter().copied()).collect();
        let answer_flat: Vec<f32> = items
            .iter()
            .flat_map(|i| i.answer.iter().map(|&v| v as f32))
            .collect();

        let stories = Tensor::<B, 1, Int>::from_ints(story_flat.as_slice(), &self.device)
            .reshape([batch_size, memory_size, sentence_size]);

        let queries = Tensor::<B, 1, Int>::from_ints(query_flat.as_slice(), &self.device)
            .reshape([batch_size, sentence_size]);

        let answers = Tensor::<B, 1>::from_floats(answer_flat.as_slice(), &self.device)
            .reshape([batch_size, vocab_size]);

        MemBatch { stories, queries, answers }
    }
}
